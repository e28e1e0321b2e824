//! 信友队提取器

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use super::html::{host_matches, selector, text_of};
use super::{ensure_content, validate, Extractor};
use crate::error::ExtractError;
use crate::models::{SubmissionLanguage, SubmissionRecord, SubmissionStatus};

// 标签中的题目 ID
static PROBLEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"题目ID[：:]\s*(\d+)").expect("valid problem regex"));

// 比赛题目链接
static CONTEST_PROBLEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://(?:www\.)?xinyoudui\.com/ac/contest/[^/]+/problem/(\d+)")
        .expect("valid contest problem regex")
});

// 编译信息中的时间和内存
static TIME_MEM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"time:\s*(\d+)ms,\s*memory:\s*(\d+)kb").expect("valid time/memory regex")
});

static SCORE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*分").expect("valid score regex"));

/// 信友队提取器
///
/// 提交详情来自提交列表中被选中的那一行：
/// 编号 / 语言 / 状态 / 得分
#[derive(Debug, Default)]
pub struct XinyouduiExtractor;

impl XinyouduiExtractor {
    /// 代码编辑器按行渲染
    fn extract_code(document: &Html) -> Option<String> {
        let sel = selector(".cm-line")?;
        let lines: Vec<String> = document
            .select(&sel)
            .map(|line| line.text().collect::<String>().trim_end().to_string())
            .collect();

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n") + "\n")
        }
    }

    /// 页面标签优先，其次是 URL
    fn extract_pid(url: &str, document: &Html) -> String {
        let from_page = selector(".ac-ant-tag").and_then(|sel| {
            document.select(&sel).find_map(|tag| {
                let text = tag.text().collect::<String>();
                PROBLEM_REGEX
                    .captures(&text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
        });

        from_page
            .or_else(|| {
                CONTEST_PROBLEM_REGEX
                    .captures(url)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
            .unwrap_or_default()
    }

    /// 被选中提交行的各列文本
    fn selected_row_cells(document: &Html) -> Vec<String> {
        let (Some(row_sel), Some(td_sel)) =
            (selector("tr.ac-ant-table-row-selected"), selector("td"))
        else {
            return Vec::new();
        };

        document
            .select(&row_sel)
            .next()
            .map(|row: ElementRef<'_>| row.select(&td_sel).map(text_of).collect())
            .unwrap_or_default()
    }

    fn extract_time_and_memory(document: &Html) -> (Option<i32>, Option<i32>) {
        let Some(sel) = selector("[class*='_compilation_']") else {
            return (None, None);
        };

        let Some(text) = document
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>())
        else {
            return (None, None);
        };

        match TIME_MEM_REGEX.captures(&text) {
            Some(caps) => (
                caps.get(1).and_then(|m| m.as_str().parse().ok()),
                caps.get(2).and_then(|m| m.as_str().parse().ok()),
            ),
            None => (None, None),
        }
    }
}

impl Extractor for XinyouduiExtractor {
    fn name(&self) -> &'static str {
        "xyd"
    }

    fn can_handle(&self, url: &str) -> bool {
        host_matches(url, "xinyoudui.com")
    }

    fn extract(&self, url: &str, html: &str) -> Result<SubmissionRecord, ExtractError> {
        ensure_content(html)?;
        let document = Html::parse_document(html);

        let cells = Self::selected_row_cells(&document);
        let cell = |i: usize| cells.get(i).filter(|c| !c.is_empty());
        let (total_time, max_memory) = Self::extract_time_and_memory(&document);

        let record = SubmissionRecord {
            judge: self.name().to_string(),
            problem_id: Self::extract_pid(url, &document),
            run_id: cell(0).cloned().unwrap_or_default(),
            code: Self::extract_code(&document),
            language: Some(
                cell(1)
                    .map(|c| SubmissionLanguage::parse_lossy(c))
                    .unwrap_or_default(),
            ),
            status: cell(2).map(|c| SubmissionStatus::parse_lossy(c)),
            score: cell(3).and_then(|c| {
                SCORE_REGEX
                    .captures(c)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse().ok())
            }),
            total_time,
            max_memory,
            ..Default::default()
        };

        validate(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractErrorKind;

    const URL: &str = "https://www.xinyoudui.com/ac/contest/74700B6AA0008E906FED34/problem/15569";

    const SUBMISSION_PANEL: &str = r#"
        <div id="rc-tabs-0-panel-submissions">
            <div class="_tags_10upj_68 print-hide">
                <span class="ac-ant-tag css-oxq8ps">题目ID：23051</span>
                <span class="ac-ant-tag ac-ant-tag-blue css-oxq8ps">必做题</span>
            </div>
            <table>
                <tbody>
                    <tr class="ac-ant-table-row ac-ant-table-row-selected">
                        <td>2542938</td>
                        <td>C++17</td>
                        <td>Accepted</td>
                        <td><strong>100 分</strong></td>
                    </tr>
                </tbody>
            </table>
            <div class="cm-content">
                <div class="cm-line">#include &lt;bits/stdc++.h&gt;</div>
                <div class="cm-line">int main() {</div>
                <div class="cm-line">    return 0;</div>
                <div class="cm-line">}</div>
            </div>
            <div class="_compilation_1f8cm_53">
                time: 350ms, memory: 141628kb, score: 100, status: Accepted
            </div>
        </div>
    "#;

    #[test]
    fn test_extract_selected_submission() {
        let record = XinyouduiExtractor.extract(URL, SUBMISSION_PANEL).unwrap();

        assert_eq!(record.judge, "xyd");
        assert_eq!(record.problem_id, "23051");
        assert_eq!(record.run_id, "2542938");
        assert_eq!(record.language, Some(SubmissionLanguage::Cpp17));
        assert_eq!(record.status, Some(SubmissionStatus::Accepted));
        assert_eq!(record.score, Some(100));
        assert_eq!(record.total_time, Some(350));
        assert_eq!(record.max_memory, Some(141628));
        assert_eq!(
            record.code.as_deref(),
            Some("#include <bits/stdc++.h>\nint main() {\n    return 0;\n}\n")
        );
    }

    #[test]
    fn test_pid_falls_back_to_url() {
        let html = SUBMISSION_PANEL.replace("题目ID：23051", "必做题");
        let record = XinyouduiExtractor.extract(URL, &html).unwrap();
        assert_eq!(record.problem_id, "15569");
    }

    #[test]
    fn test_no_selected_row_is_partial() {
        let html = SUBMISSION_PANEL.replace("ac-ant-table-row-selected", "");
        let err = XinyouduiExtractor.extract(URL, &html).unwrap_err();
        assert_eq!(err.kind, ExtractErrorKind::MissingField("runId"));
        assert_eq!(err.partial.unwrap().problem_id, "23051");
    }
}
