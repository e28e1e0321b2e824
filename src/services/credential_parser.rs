//! Cookie 解析 - 业务能力层
//!
//! 把浏览器中取得的原始 cookie 文本和来源 URL 解析成 `SessionCredential`。
//! 字段不全不是错误：返回的凭据照常保存，`valid` 只是软性判断

use phf::phf_map;
use tracing::debug;
use url::Url;

use crate::error::CredentialError;
use crate::models::SessionCredential;

/// 评测服务所在的域名
pub const GRADING_DOMAIN: &str = "7fa4.cn";

/// 来源主机 → 评测主机
static KNOWN_HOSTS: phf::Map<&'static str, &'static str> = phf_map! {
    "oj.7fa4.cn" => "oj.7fa4.cn",
    "jx.7fa4.cn" => "jx.7fa4.cn:8888",
    "in.7fa4.cn" => "in.7fa4.cn:8888",
};

const LOGIN_KEYS: [&str; 1] = ["login"];
const SID_KEYS: [&str; 2] = ["connect.sid", "sid"];
const CHOST_KEY: &str = "chost";

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCredential {
    pub credential: SessionCredential,
    /// login 与 sid 都存在，且来源属于评测域名或带有主机覆盖
    pub valid: bool,
}

/// 解析 cookie 文本
///
/// # 参数
/// - `raw`: `key=value; key=value` 形式的 cookie 文本
/// - `origin`: 取得 cookie 的页面 URL
///
/// # 返回
/// 结构化凭据；只有 cookie 文本本身无法解析时才返回错误，
/// 此时调用方应原样保存 cookie 和来源
pub fn parse_cookie(raw: &str, origin: &str) -> Result<ParsedCredential, CredentialError> {
    if raw.chars().any(|c| c.is_control() && c != '\t') {
        return Err(CredentialError::MalformedCookie);
    }

    // 来源无法解析或没有主机时只视为不在评测域名下
    let origin_host = Url::parse(origin.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase));

    let pairs = split_pairs(raw);
    let lookup = |keys: &[&str]| {
        keys.iter().find_map(|key| {
            pairs
                .iter()
                .find(|(k, v)| k == key && !v.is_empty())
                .map(|(_, v)| v.clone())
        })
    };

    let explicit_chost = lookup(&[CHOST_KEY]);
    let chost = explicit_chost
        .clone()
        .or_else(|| {
            origin_host
                .as_deref()
                .and_then(|h| KNOWN_HOSTS.get(h))
                .map(|h| h.to_string())
        });

    let credential = SessionCredential {
        login: lookup(&LOGIN_KEYS),
        sid: lookup(&SID_KEYS),
        chost,
    };

    let on_grading_domain = origin_host.as_deref().is_some_and(is_grading_host);
    let valid = credential.is_complete() && (on_grading_domain || explicit_chost.is_some());

    debug!(
        "cookie 解析完成: {} 个字段, 来源 {}, valid={}",
        pairs.len(),
        origin_host.as_deref().unwrap_or("-"),
        valid
    );

    Ok(ParsedCredential { credential, valid })
}

/// 评测域名本身或其子域名
pub fn is_grading_host(host: &str) -> bool {
    host == GRADING_DOMAIN
        || host
            .strip_suffix(GRADING_DOMAIN)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// 按 `;` 拆分，再按第一个 `=` 拆出键值；值两侧的引号去掉
fn split_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_credential_on_grading_domain() {
        let parsed = parse_cookie(
            "login=abc123; connect.sid=s%3Axyz.sig; theme=dark",
            "http://jx.7fa4.cn:8888/problem/1",
        )
        .unwrap();

        assert!(parsed.valid);
        assert_eq!(parsed.credential.login.as_deref(), Some("abc123"));
        // 值保持原样，便于原样回传
        assert_eq!(parsed.credential.sid.as_deref(), Some("s%3Axyz.sig"));
        assert_eq!(parsed.credential.chost.as_deref(), Some("jx.7fa4.cn:8888"));
    }

    #[test]
    fn test_missing_token_is_invalid_but_structured() {
        let parsed = parse_cookie("login=abc123", "http://oj.7fa4.cn/").unwrap();
        assert!(!parsed.valid);
        assert_eq!(parsed.credential.login.as_deref(), Some("abc123"));
        assert!(parsed.credential.sid.is_none());

        let parsed = parse_cookie("sid=only", "http://oj.7fa4.cn/").unwrap();
        assert!(!parsed.valid);
        assert!(parsed.credential.login.is_none());
    }

    #[test]
    fn test_foreign_origin_needs_explicit_host() {
        let parsed = parse_cookie("login=a; sid=b", "https://example.com/").unwrap();
        assert!(!parsed.valid);
        assert!(parsed.credential.chost.is_none());

        let parsed =
            parse_cookie("login=a; sid=b; chost=grader.local:8080", "https://example.com/").unwrap();
        assert!(parsed.valid);
        assert_eq!(parsed.credential.chost.as_deref(), Some("grader.local:8080"));
    }

    #[test]
    fn test_explicit_host_overrides_table() {
        let parsed = parse_cookie("login=a; sid=b; chost=\"in.7fa4.cn:8888\"", "http://oj.7fa4.cn/")
            .unwrap();
        assert_eq!(parsed.credential.chost.as_deref(), Some("in.7fa4.cn:8888"));
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert_eq!(
            parse_cookie("login=a;\nsid=b", "http://oj.7fa4.cn/"),
            Err(CredentialError::MalformedCookie)
        );
    }

    #[test]
    fn test_origin_without_host_is_soft() {
        for origin in ["about:blank", "", "file:///tmp/x.html", "not a url"] {
            let parsed = parse_cookie("login=L; sid=S; chost=h:1", origin).unwrap();
            assert!(parsed.valid, "origin {origin:?}");
            assert_eq!(parsed.credential.chost.as_deref(), Some("h:1"));

            let parsed = parse_cookie("login=L; sid=S", origin).unwrap();
            assert!(!parsed.valid);
            assert!(parsed.credential.chost.is_none());
        }
    }

    #[test]
    fn test_grading_host_rule() {
        assert!(is_grading_host("7fa4.cn"));
        assert!(is_grading_host("jx.7fa4.cn"));
        assert!(!is_grading_host("evil7fa4.cn"));
        assert!(!is_grading_host("7fa4.cn.example.com"));
    }

    #[test]
    fn test_pairs_without_value_are_ignored() {
        let parsed = parse_cookie(" ; =x; login=; login=L ;sid = S ", "http://oj.7fa4.cn/").unwrap();
        assert_eq!(parsed.credential.login.as_deref(), Some("L"));
        assert_eq!(parsed.credential.sid.as_deref(), Some("S"));
        assert!(parsed.valid);
    }
}
