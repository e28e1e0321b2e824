//! 登录凭据捕获流程 - 流程层
//!
//! cookie 文本 → 解析 → 写入凭据槽。
//! 解析失败时把原始 cookie 和来源原样写入凭据槽，结果单独报告

use tracing::{info, warn};

use crate::error::CredentialError;
use crate::infrastructure::CredentialSlot;
use crate::models::{FailureKind, ResultEnvelope, SessionCredential, StoredCredential};
use crate::services::parse_cookie;

/// 捕获结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// 解析成功（字段可能不全）
    Parsed {
        credential: SessionCredential,
        valid: bool,
    },
    /// 解析失败，已保存原始 cookie
    ParseFailed { error: CredentialError },
}

impl CaptureOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, CaptureOutcome::Parsed { valid: true, .. })
    }

    /// 转换为结果信封：解析失败单独归类，凭据不完整只是警告
    pub fn to_envelope(&self) -> ResultEnvelope {
        match self {
            CaptureOutcome::Parsed { valid: true, .. } => ResultEnvelope {
                ok: true,
                ..Default::default()
            },
            CaptureOutcome::Parsed { valid: false, .. } => ResultEnvelope {
                ok: true,
                err: Some("credential incomplete".to_string()),
                ..Default::default()
            },
            CaptureOutcome::ParseFailed { error } => {
                ResultEnvelope::failure(FailureKind::CredentialParse, error.to_string())
            }
        }
    }
}

/// 登录凭据捕获流程
#[derive(Debug, Default, Clone, Copy)]
pub struct LoginFlow;

impl LoginFlow {
    pub fn new() -> Self {
        Self
    }

    /// 解析 cookie 并替换凭据槽中的内容
    ///
    /// # 参数
    /// - `raw_cookie`: 浏览器中读取的 cookie 文本
    /// - `origin`: cookie 所属页面的 URL
    /// - `slot`: 凭据槽，每次调用整体替换
    pub fn capture(&self, raw_cookie: &str, origin: &str, slot: &CredentialSlot) -> CaptureOutcome {
        match parse_cookie(raw_cookie, origin) {
            Ok(parsed) => {
                if parsed.valid {
                    info!("[登录] ✓ 凭据有效, 评测主机 {:?}", parsed.credential.chost);
                } else {
                    warn!(
                        "[登录] ⚠️ 凭据不完整 (login: {}, sid: {}, 来源 {})",
                        parsed.credential.login.is_some(),
                        parsed.credential.sid.is_some(),
                        origin
                    );
                }
                slot.replace(StoredCredential::Parsed(parsed.credential.clone()));
                CaptureOutcome::Parsed {
                    credential: parsed.credential,
                    valid: parsed.valid,
                }
            }
            Err(error) => {
                warn!("[登录] ⚠️ cookie 解析失败，原样保存: {}", error);
                slot.replace(StoredCredential::Raw {
                    raw_cookie: raw_cookie.to_string(),
                    raw_origin: origin.to_string(),
                });
                CaptureOutcome::ParseFailed { error }
            }
        }
    }
}
