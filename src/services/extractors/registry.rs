//! 提取器注册表 - 业务能力层
//!
//! 职责：
//! - 按固定优先级保存提取器（站点专用在前，聚合站点在后）
//! - 每个 (url, html) 只选出一个提取器，先匹配者胜出
//! - 提取器内部 panic 在这里被捕获并转成失败结果

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use super::{Extractor, LuoguExtractor, VjudgeExtractor, XinyouduiExtractor};
use crate::error::{ExtractError, ExtractErrorKind};
use crate::models::ExtractionResult;

/// 提取器注册表
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// 空注册表
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// 内置提取器：洛谷、信友队、VJudge（聚合站点最后）
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(LuoguExtractor));
        registry.register(Box::new(XinyouduiExtractor));
        registry.register(Box::new(VjudgeExtractor));
        registry
    }

    /// 追加到优先级末尾
    pub fn register(&mut self, extractor: Box<dyn Extractor>) {
        self.extractors.push(extractor);
    }

    /// 按注册顺序的提取器名称
    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// 第一个能处理该 URL 的提取器
    pub fn select(&self, url: &str) -> Option<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.can_handle(url))
            .map(|e| &**e)
    }

    /// 选择提取器并执行提取
    pub fn dispatch(&self, url: &str, html: &str) -> ExtractionResult {
        let Some(extractor) = self.select(url) else {
            debug!("没有提取器匹配: {}", url);
            return ExtractionResult::no_match();
        };
        let name = extractor.name();
        debug!("使用提取器 {} 处理 {}", name, url);

        match panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(url, html))) {
            Ok(Ok(record)) => match record.missing_field() {
                None => ExtractionResult::complete(name, record),
                Some(field) => Self::incomplete(
                    name,
                    ExtractError::with_partial(ExtractErrorKind::MissingField(field), record),
                ),
            },
            Ok(Err(err)) => Self::incomplete(name, err),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("⚠️ 提取器 {} 内部错误: {}", name, message);
                ExtractionResult::failed(name, format!("extractor {name} crashed: {message}"), None)
            }
        }
    }

    fn incomplete(name: &'static str, err: ExtractError) -> ExtractionResult {
        debug!("提取器 {} 未能得到完整记录: {}", name, err);
        ExtractionResult::failed(name, err.to_string(), err.partial.map(|p| *p))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// panic 负载中的文本
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
