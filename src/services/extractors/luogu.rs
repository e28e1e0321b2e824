//! 洛谷提取器

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

use super::html::{host_matches, selector, text_of};
use super::{ensure_content, validate, Extractor};
use crate::error::ExtractError;
use crate::models::{SubmissionLanguage, SubmissionRecord, SubmissionStatus};
use crate::utils::{parse_mem_to_kb, parse_time_to_ms};

// 题目链接，如 P1001 / CF1A / AT_abc123_a
static PROBLEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/problem/((?:[A-Z]+_?)?[a-z]*\d[A-Za-z0-9_]*)").expect("valid problem regex")
});

// 提交记录链接
static RECORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://(?:www\.)?luogu\.com\.cn)?/record/(\d+)").expect("valid record regex")
});

static SCORE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid score regex"));

/// 洛谷提取器
#[derive(Debug, Default)]
pub struct LuoguExtractor;

impl LuoguExtractor {
    /// 统计栏：(语言, 用时, 内存)
    fn extract_basic_info(document: &Html) -> (Option<String>, Option<i32>, Option<i32>) {
        let mut language = None;
        let mut total_time = None;
        let mut max_memory = None;

        let (Some(field_sel), Some(key_sel), Some(value_sel)) = (
            selector(".stat.color-inverse .field"),
            selector(".key"),
            selector(".value"),
        ) else {
            return (language, total_time, max_memory);
        };

        for field in document.select(&field_sel) {
            let key = field.select(&key_sel).next().map(text_of).unwrap_or_default();
            let value = field.select(&value_sel).next().map(text_of).unwrap_or_default();

            match key.as_str() {
                "编程语言" => language = Some(value),
                "用时" => total_time = parse_time_to_ms(&value),
                "内存" => max_memory = parse_mem_to_kb(&value),
                _ => {}
            }
        }

        (language, total_time, max_memory)
    }

    fn extract_code(document: &Html) -> Option<String> {
        let highlighted = selector("code[class*='language-']")
            .and_then(|sel| document.select(&sel).next().map(text_of));
        let plain = || {
            ["code", "pre"].iter().find_map(|css| {
                selector(css).and_then(|sel| document.select(&sel).next().map(text_of))
            })
        };
        highlighted.or_else(plain).filter(|code| !code.is_empty())
    }

    fn extract_pid(document: &Html) -> String {
        let Some(a_sel) = selector("a[href]") else {
            return String::new();
        };
        document
            .select(&a_sel)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| {
                PROBLEM_REGEX
                    .captures(href)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .unwrap_or_default()
    }

    fn extract_status_and_score(document: &Html) -> (Option<SubmissionStatus>, Option<i32>) {
        let mut status = None;
        let mut score = None;

        let Some(rows_sel) = selector(".info-rows div") else {
            return (status, score);
        };

        for row in document.select(&rows_sel) {
            let row_text = row.text().collect::<String>();

            if let Some(rest) = row_text.split("评测状态").nth(1) {
                if let Some(line) = rest.lines().map(str::trim).find(|l| !l.is_empty()) {
                    status = Some(SubmissionStatus::parse_lossy(line));
                }
            }

            if let Some(rest) = row_text.split("评测分数").nth(1) {
                score = SCORE_REGEX
                    .captures(rest)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse().ok());
            }
        }

        (status, score)
    }

    fn extract_rid(url: &str) -> String {
        RECORD_REGEX
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

impl Extractor for LuoguExtractor {
    fn name(&self) -> &'static str {
        "luogu"
    }

    fn can_handle(&self, url: &str) -> bool {
        host_matches(url, "luogu.com.cn")
    }

    fn extract(&self, url: &str, html: &str) -> Result<SubmissionRecord, ExtractError> {
        ensure_content(html)?;
        let document = Html::parse_document(html);

        let (language_text, total_time, max_memory) = Self::extract_basic_info(&document);
        let (status, score) = Self::extract_status_and_score(&document);

        let record = SubmissionRecord {
            judge: self.name().to_string(),
            problem_id: Self::extract_pid(&document),
            run_id: Self::extract_rid(url),
            code: Self::extract_code(&document),
            language: Some(
                language_text
                    .as_deref()
                    .map(SubmissionLanguage::parse_lossy)
                    .unwrap_or_default(),
            ),
            status,
            total_time,
            max_memory,
            score,
            ..Default::default()
        };

        validate(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractErrorKind;

    const RECORD_PAGE: &str = r#"
        <div class="stat color-inverse">
            <div class="field"><span class="key">编程语言</span><span class="value">C++14 (GCC 9)</span></div>
            <div class="field"><span class="key">用时</span><span class="value">1.02s</span></div>
            <div class="field"><span class="key">内存</span><span class="value">3.52MB</span></div>
        </div>
        <div class="info-rows">
            <div><span>所属题目</span><a href="/problem/P1001">P1001 A+B Problem</a></div>
            <div><span>评测状态</span>
                <span>Wrong Answer</span></div>
            <div><span>评测分数</span><span>60</span></div>
        </div>
        <pre><code class="language-cpp">#include &lt;cstdio&gt;
int main() { return 0; }</code></pre>
    "#;

    #[test]
    fn test_extract_record_page() {
        let record = LuoguExtractor
            .extract("https://www.luogu.com.cn/record/123456", RECORD_PAGE)
            .unwrap();

        assert_eq!(record.judge, "luogu");
        assert_eq!(record.problem_id, "P1001");
        assert_eq!(record.run_id, "123456");
        assert_eq!(record.language, Some(SubmissionLanguage::Cpp14));
        assert_eq!(record.status, Some(SubmissionStatus::WrongAnswer));
        assert_eq!(record.score, Some(60));
        assert_eq!(record.total_time, Some(1020));
        assert_eq!(record.max_memory, Some(3604));
        assert!(record.code.unwrap().starts_with("#include <cstdio>"));
    }

    #[test]
    fn test_missing_run_id_returns_partial() {
        let err = LuoguExtractor
            .extract("https://www.luogu.com.cn/problem/P1001", RECORD_PAGE)
            .unwrap_err();

        assert_eq!(err.kind, ExtractErrorKind::MissingField("runId"));
        let partial = err.partial.expect("partial record");
        assert_eq!(partial.problem_id, "P1001");
        assert!(partial.run_id.is_empty());
    }

    #[test]
    fn test_empty_page_has_no_partial() {
        let err = LuoguExtractor
            .extract("https://www.luogu.com.cn/record/1", "   ")
            .unwrap_err();
        assert_eq!(err.kind, ExtractErrorKind::EmptyContent);
        assert!(err.partial.is_none());
    }

    #[test]
    fn test_problem_regex_skips_listing_links() {
        let html = r#"<a href="/problem/list">题库</a><a href="/problem/CF1A">CF1A</a>
            <pre>int main(){}</pre>"#;
        let record = LuoguExtractor
            .extract("https://www.luogu.com.cn/record/9", html)
            .unwrap();
        assert_eq!(record.problem_id, "CF1A");
    }
}
