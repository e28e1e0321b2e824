//! VJudge 提取器
//!
//! VJudge 是聚合站点，提交实际转交给其他 OJ 评测。
//! 这里按 VJudge 自身的编号输出记录，同时保留真实 OJ 名称和远程提交编号，
//! 供 `SubmissionMapper` 映射回真实 OJ

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::html::{first_text, selector, table_value, text_of};
use super::{ensure_content, validate, Extractor};
use crate::error::ExtractError;
use crate::models::{SubmissionLanguage, SubmissionRecord, SubmissionStatus};
use crate::utils::{parse_mem_to_kb, parse_time_to_ms};

// 提交记录链接
static SOLUTION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https://vjudge\.net)?/solution/(\d+)").expect("valid solution regex")
});

// 题目链接
static PROBLEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/problem/([^/?#]+)").expect("valid problem regex"));

// 远程提交编号
static REMOTE_RUN_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_-]+").expect("valid remote run id regex"));

const INFO_ROWS: &str = "#info-panel table tbody tr";

/// VJudge 提取器
#[derive(Debug, Default)]
pub struct VjudgeExtractor;

impl VjudgeExtractor {
    fn extract_code(document: &Html) -> Option<String> {
        first_text(document, "pre code")
            .or_else(|| first_text(document, "pre"))
            .filter(|code| !code.is_empty())
    }

    /// 模态框标题中的题目链接
    fn extract_pid(document: &Html) -> String {
        let Some(sel) = selector(".modal-title a[href]") else {
            return String::new();
        };
        document
            .select(&sel)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| {
                PROBLEM_REGEX
                    .captures(href)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .unwrap_or_default()
    }

    /// 依次尝试 URL、模态框标题链接、带数字 id 的表格行
    fn extract_rid(url: &str, document: &Html) -> String {
        let capture = |text: &str| {
            SOLUTION_REGEX
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
        };

        if let Some(rid) = capture(url) {
            return rid;
        }

        let from_title = selector(".modal-title a[href]").and_then(|sel| {
            document
                .select(&sel)
                .filter_map(|a| a.value().attr("href"))
                .find_map(capture)
        });
        if let Some(rid) = from_title {
            return rid;
        }

        selector("tr[id]")
            .and_then(|sel| {
                document
                    .select(&sel)
                    .filter_map(|row| row.value().attr("id"))
                    .find(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    fn extract_remote_run_id(document: &Html) -> Option<String> {
        let text = first_text(document, ".remote-run-id a")
            .or_else(|| first_text(document, ".remote-run-id"))?;
        REMOTE_RUN_ID_REGEX
            .find(&text)
            .map(|m| m.as_str().to_string())
    }

    fn extract_language(document: &Html) -> SubmissionLanguage {
        if let Some(text) = table_value(document, INFO_ROWS, "语言") {
            return SubmissionLanguage::parse_lossy(&text);
        }

        // 备用: 语言列的 tooltip
        selector(".language div[data-original-title]")
            .and_then(|sel| {
                document
                    .select(&sel)
                    .next()
                    .and_then(|div| div.value().attr("data-original-title"))
                    .map(SubmissionLanguage::parse_lossy)
            })
            .unwrap_or_default()
    }

    fn extract_status(document: &Html) -> SubmissionStatus {
        first_text(document, ".status .view-solution")
            .or_else(|| table_value(document, INFO_ROWS, "评测结果"))
            .map(|text| SubmissionStatus::parse_lossy(&text))
            .unwrap_or_default()
    }

    /// 列表中的 `.runtime` / `.memory` 优先，其次是信息面板
    fn extract_time_and_memory(document: &Html) -> (Option<i32>, Option<i32>) {
        let total_time = first_text(document, ".runtime")
            .and_then(|t| parse_time_to_ms(&t))
            .or_else(|| {
                table_value(document, INFO_ROWS, "耗时").and_then(|t| parse_time_to_ms(&t))
            });
        let max_memory = first_text(document, ".memory")
            .and_then(|t| parse_mem_to_kb(&t))
            .or_else(|| {
                table_value(document, INFO_ROWS, "内存消耗").and_then(|t| parse_mem_to_kb(&t))
            });
        (total_time, max_memory)
    }

    fn score_for(status: SubmissionStatus) -> i32 {
        match status {
            SubmissionStatus::Accepted => 100,
            SubmissionStatus::PartiallyCorrect => 50,
            _ => 0,
        }
    }

    fn extract_origin_judge(document: &Html) -> Option<String> {
        selector(".oj").and_then(|sel| {
            document
                .select(&sel)
                .map(text_of)
                .find(|oj| !oj.is_empty())
        })
    }
}

impl Extractor for VjudgeExtractor {
    fn name(&self) -> &'static str {
        "vjudge"
    }

    /// 聚合站点的匹配较宽：URL 中出现 vjudge 即可
    fn can_handle(&self, url: &str) -> bool {
        url.to_lowercase().contains("vjudge")
    }

    fn extract(&self, url: &str, html: &str) -> Result<SubmissionRecord, ExtractError> {
        ensure_content(html)?;
        let document = Html::parse_document(html);

        let status = Self::extract_status(&document);
        let (total_time, max_memory) = Self::extract_time_and_memory(&document);

        let record = SubmissionRecord {
            judge: self.name().to_string(),
            problem_id: Self::extract_pid(&document),
            run_id: Self::extract_rid(url, &document),
            code: Self::extract_code(&document),
            language: Some(Self::extract_language(&document)),
            status: Some(status),
            total_time,
            max_memory,
            score: Some(Self::score_for(status)),
            origin_judge: Self::extract_origin_judge(&document),
            remote_run_id: Self::extract_remote_run_id(&document),
        };

        validate(record)
    }
}
