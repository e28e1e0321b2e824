//! 评测站点提取器
//!
//! 每个站点一个提取器，按注册顺序（站点专用在前，聚合站点在后）
//! 由 `ExtractorRegistry` 选择，新增站点只需增加一个实现

mod html;
pub mod luogu;
pub mod registry;
pub mod vjudge;
pub mod xinyoudui;

pub use luogu::LuoguExtractor;
pub use registry::ExtractorRegistry;
pub use vjudge::VjudgeExtractor;
pub use xinyoudui::XinyouduiExtractor;

use crate::error::{ExtractError, ExtractErrorKind};
use crate::models::SubmissionRecord;

/// 提取器
pub trait Extractor: Send + Sync {
    /// 提取器名称，聚合站点映射依据名称识别
    fn name(&self) -> &'static str;

    /// 是否能处理该 URL
    fn can_handle(&self, url: &str) -> bool;

    /// 解析提交记录页面
    fn extract(&self, url: &str, html: &str) -> Result<SubmissionRecord, ExtractError>;
}

/// 空页面直接失败，不附带部分结果
pub(crate) fn ensure_content(html: &str) -> Result<(), ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::new(ExtractErrorKind::EmptyContent));
    }
    Ok(())
}

/// 检查必需字段，缺失时携带部分结果返回
pub(crate) fn validate(record: SubmissionRecord) -> Result<SubmissionRecord, ExtractError> {
    let missing = if record.problem_id.is_empty() {
        Some("problemId")
    } else if record.run_id.is_empty() {
        Some("runId")
    } else if !record.has_code() {
        Some("code")
    } else {
        None
    };

    match missing {
        Some(field) => Err(ExtractError::with_partial(
            ExtractErrorKind::MissingField(field),
            record,
        )),
        None => Ok(record),
    }
}
