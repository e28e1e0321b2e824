//! 出站请求与结果信封
//!
//! 三层成功模型：提取 / 传输 / 业务，任一层的失败都要能和其他层区分开

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::TransportError;
use crate::models::ExtractionResult;

/// 发往评测服务的请求，每次提交单独构建
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub url: String,
    pub method: Method,
    /// 有序且键唯一（不区分大小写）
    pub headers: Vec<(String, String)>,
    pub body: JsonValue,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>, body: JsonValue) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Vec::new(),
            body,
        }
    }

    /// 设置请求头，同名时覆盖原值并保留原位置
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// 传输层拿到的原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// 分发结果
///
/// `business_ok` 只在 `transport_ok` 为真时有意义
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub transport_ok: bool,
    pub business_ok: bool,
    pub status_code: Option<u16>,
    /// 响应体无法解析为 JSON 时为 `None`
    pub response_body: Option<JsonValue>,
    pub error: Option<TransportError>,
}

impl DispatchResult {
    pub fn delivered(status: u16, body: Option<JsonValue>) -> Self {
        let business_ok = body
            .as_ref()
            .and_then(|b| b.get("success"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        Self {
            transport_ok: true,
            business_ok,
            status_code: Some(status),
            response_body: body,
            error: None,
        }
    }

    pub fn transport_failed(error: TransportError) -> Self {
        Self {
            transport_ok: false,
            business_ok: false,
            status_code: None,
            response_body: None,
            error: Some(error),
        }
    }
}

/// 错误分类，端到端保持可区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    CredentialParse,
    NoCredential,
    ExtractionNoMatch,
    ExtractionPartial,
    RequestBuild,
    TransportTimeout,
    Transport,
    BusinessRejected,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::CredentialParse => "credential_parse",
            FailureKind::NoCredential => "no_credential",
            FailureKind::ExtractionNoMatch => "extraction_no_match",
            FailureKind::ExtractionPartial => "extraction_partial",
            FailureKind::RequestBuild => "request_build",
            FailureKind::TransportTimeout => "transport_timeout",
            FailureKind::Transport => "transport",
            FailureKind::BusinessRejected => "business_rejected",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 返回给界面层的结果信封
///
/// - `ok:false` 且无 `resp`：传输前或传输中失败
/// - `ok:true` 且 `business_success:false`：送达但被评测服务拒绝
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    /// `Some(Null)` 表示响应已送达但无法解析
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resp: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<ExtractionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ResultEnvelope {
    pub fn failure(kind: FailureKind, err: impl Into<String>) -> Self {
        Self {
            ok: false,
            err: Some(err.into()),
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn with_parsed(mut self, parsed: ExtractionResult) -> Self {
        self.parsed = Some(parsed);
        self
    }

    /// 由分发结果生成信封
    pub fn from_dispatch(dispatch: DispatchResult, parsed: ExtractionResult) -> Self {
        if !dispatch.transport_ok {
            let error = dispatch
                .error
                .unwrap_or_else(|| TransportError::Network("unknown transport failure".into()));
            let kind = if error.is_timeout() {
                FailureKind::TransportTimeout
            } else {
                FailureKind::Transport
            };
            return Self::failure(kind, error.to_string()).with_parsed(parsed);
        }

        let (err, kind) = if dispatch.business_ok {
            (None, None)
        } else {
            (
                Some(rejection_message(dispatch.response_body.as_ref())),
                Some(FailureKind::BusinessRejected),
            )
        };

        Self {
            ok: true,
            err,
            kind,
            resp: Some(dispatch.response_body.unwrap_or(JsonValue::Null)),
            parsed: Some(parsed),
            business_success: Some(dispatch.business_ok),
            status_code: dispatch.status_code,
        }
    }
}

/// 评测服务给出的拒绝原因字段
const REASON_FIELDS: [&str; 4] = ["message", "msg", "error", "reason"];

fn rejection_message(body: Option<&JsonValue>) -> String {
    let reason = body.and_then(|b| {
        REASON_FIELDS
            .iter()
            .filter_map(|field| b.get(*field))
            .find_map(|v| match v {
                JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
                JsonValue::Null => None,
                other => Some(other.to_string()),
            })
    });
    match reason {
        Some(reason) => format!("rejected by grading service: {reason}"),
        None => "rejected by grading service".to_string(),
    }
}
