//! 提取结果

use serde::{Deserialize, Serialize};

use crate::models::SubmissionRecord;

/// 没有提取器匹配时的错误文本
pub const NO_EXTRACTOR_MATCHED: &str = "no extractor matched";

/// 一次提取的结果
///
/// 成功时 `record` 为完整记录；失败时 `partial` 可能携带部分字段用于诊断。
/// 只通过构造函数创建，保证两种形态互斥
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<SubmissionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial: Option<SubmissionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 匹配到的提取器名称
    pub extractor: Option<String>,
}

impl ExtractionResult {
    pub fn complete(extractor: &str, record: SubmissionRecord) -> Self {
        Self {
            success: true,
            record: Some(record),
            partial: None,
            error: None,
            extractor: Some(extractor.to_string()),
        }
    }

    pub fn failed(
        extractor: &str,
        error: impl Into<String>,
        partial: Option<SubmissionRecord>,
    ) -> Self {
        Self {
            success: false,
            record: None,
            partial,
            error: Some(error.into()),
            extractor: Some(extractor.to_string()),
        }
    }

    pub fn no_match() -> Self {
        Self {
            success: false,
            record: None,
            partial: None,
            error: Some(NO_EXTRACTOR_MATCHED.to_string()),
            extractor: None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        !self.success && self.extractor.is_none()
    }

    pub fn extractor_name(&self) -> Option<&str> {
        self.extractor.as_deref()
    }
}
