//! 请求构建 - 业务能力层
//!
//! 提交记录 + 会话凭据 + 比赛标志 → 发往评测服务的 `OutboundRequest`

use reqwest::header::HeaderValue;
use reqwest::Method;
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::Config;
use crate::error::RequestBuildError;
use crate::models::{OutboundRequest, SessionCredential, SubmissionRecord};

/// 请求构建器
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    scheme: String,
    default_host: String,
    endpoint_path: String,
}

impl RequestBuilder {
    /// 从配置创建
    pub fn new(config: &Config) -> Self {
        Self {
            scheme: config.scheme.clone(),
            default_host: config.grading_host.clone(),
            endpoint_path: config.endpoint_path.clone(),
        }
    }

    /// 构建提交请求
    ///
    /// # 参数
    /// - `record`: 提交记录，序列化后作为请求体
    /// - `credential`: 会话凭据，决定目标主机和 Cookie
    /// - `in_contest`: 写入请求体的 `in_contest` 字段
    ///
    /// # 返回
    /// 每次调用都生成新的请求；记录无法序列化或 URL / 请求头非法时返回错误
    pub fn build(
        &self,
        record: &SubmissionRecord,
        credential: &SessionCredential,
        in_contest: bool,
    ) -> Result<OutboundRequest, RequestBuildError> {
        let mut body = serde_json::to_value(record)
            .map_err(|e| RequestBuildError::NotSerializable(e.to_string()))?;
        match body.as_object_mut() {
            Some(fields) => {
                fields.insert("in_contest".to_string(), JsonValue::Bool(in_contest));
            }
            None => return Err(RequestBuildError::NotAnObject),
        }

        let url = self.endpoint_url(credential)?;
        let mut request = OutboundRequest::new(Method::POST, url, body);
        request.set_header("Content-Type", "application/json");

        let cookie = cookie_header(credential);
        HeaderValue::from_str(&cookie).map_err(|_| RequestBuildError::InvalidHeader("Cookie".into()))?;
        request.set_header("Cookie", cookie);

        Ok(request)
    }

    fn endpoint_url(&self, credential: &SessionCredential) -> Result<String, RequestBuildError> {
        let host = credential.host_or(&self.default_host);
        let path = if self.endpoint_path.starts_with('/') {
            self.endpoint_path.clone()
        } else {
            format!("/{}", self.endpoint_path)
        };
        let url = format!("{}://{}{}", self.scheme, host, path);

        Url::parse(&url).map_err(|e| RequestBuildError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        Ok(url)
    }
}

/// `login=<login>; sid=<sid>` 或只有 `login=<login>`；没有 login 时为空串
fn cookie_header(credential: &SessionCredential) -> String {
    let login = credential.login.as_deref().filter(|v| !v.is_empty());
    let sid = credential.sid.as_deref().filter(|v| !v.is_empty());

    match (login, sid) {
        (Some(login), Some(sid)) => format!("login={login}; sid={sid}"),
        (Some(login), None) => format!("login={login}"),
        (None, _) => String::new(),
    }
}
