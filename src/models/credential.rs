//! 评测服务会话凭据

use serde::{Deserialize, Serialize};

/// 结构化的会话凭据
///
/// `login` 和 `sid` 都存在时才能通过评测服务的鉴权；
/// `chost` 缺省时使用配置里的默认评测主机
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chost: Option<String>,
}

impl SessionCredential {
    pub fn is_complete(&self) -> bool {
        non_empty(&self.login) && non_empty(&self.sid)
    }

    /// 评测主机：优先使用 `chost`
    pub fn host_or<'a>(&'a self, default_host: &'a str) -> &'a str {
        match self.chost.as_deref() {
            Some(host) if !host.trim().is_empty() => host.trim(),
            _ => default_host,
        }
    }
}

fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// 持久化的凭据槽内容
///
/// 解析失败时原样保存 cookie 与来源，避免数据丢失
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredCredential {
    Raw {
        raw_cookie: String,
        raw_origin: String,
    },
    Parsed(SessionCredential),
}

impl StoredCredential {
    /// 可用于构建请求的凭据（原始备份不可用）
    pub fn session(&self) -> Option<&SessionCredential> {
        match self {
            StoredCredential::Parsed(credential) => Some(credential),
            StoredCredential::Raw { .. } => None,
        }
    }
}
