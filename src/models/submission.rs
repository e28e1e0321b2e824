//! 提交记录模型
//!
//! 所有提取器都输出同一种 `SubmissionRecord`，评测服务按此格式接收

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 统一的提交记录
///
/// `judge` / `problem_id` / `run_id` 三项都非空时才算完整，
/// 其余字段是各评测站点可选的附加信息，缺省时不参与序列化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub judge: String,
    pub problem_id: String,
    pub run_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<SubmissionLanguage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
    /// 毫秒
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<i32>,
    /// KB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_memory: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,

    /// 聚合站点（VJudge）页面上显示的真实 OJ 名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_judge: Option<String>,
    /// 聚合站点转交到真实 OJ 后的提交编号
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_run_id: Option<String>,
}

impl SubmissionRecord {
    /// 仅包含三元组的记录
    pub fn new(
        judge: impl Into<String>,
        problem_id: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            judge: judge.into(),
            problem_id: problem_id.into(),
            run_id: run_id.into(),
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    /// 第一个为空的必填字段（按线上字段名）
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("judge", &self.judge),
            ("problemId", &self.problem_id),
            ("runId", &self.run_id),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }

    /// 源代码是否已提取
    pub fn has_code(&self) -> bool {
        self.code.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// 评测结果
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Unknown,
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    #[serde(rename = "Partially Correct")]
    PartiallyCorrect,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Compile Error")]
    CompileError,
    #[serde(rename = "Time Limit Exceeded")]
    TimeLimitExceeded,
    #[serde(rename = "Memory Limit Exceeded")]
    MemoryLimitExceeded,
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let txt = s.replace(' ', "").to_lowercase();
        match txt.as_str() {
            "unknown" => Ok(SubmissionStatus::Unknown),
            "accepted" | "ac" => Ok(SubmissionStatus::Accepted),
            "wronganswer" | "wa" => Ok(SubmissionStatus::WrongAnswer),
            "partiallycorrect" => Ok(SubmissionStatus::PartiallyCorrect),
            "runtimeerror" | "re" => Ok(SubmissionStatus::RuntimeError),
            "compileerror" | "ce" => Ok(SubmissionStatus::CompileError),
            "timelimitexceeded" | "tle" => Ok(SubmissionStatus::TimeLimitExceeded),
            "memorylimitexceeded" | "mle" => Ok(SubmissionStatus::MemoryLimitExceeded),
            other => Err(format!("unknown submission status: {other}")),
        }
    }
}

impl SubmissionStatus {
    /// 解析失败时退回 `Unknown`
    pub fn parse_lossy(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }
}

/// 提交语言（评测服务的语言代码）
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionLanguage {
    #[serde(rename = "cpp14")]
    Cpp14,
    #[default]
    #[serde(rename = "cpp17")]
    Cpp17,
    #[serde(rename = "cpp11")]
    Cpp11,
    #[serde(rename = "cpp")]
    Cpp,
    #[serde(rename = "cpp-noilinux")]
    CppNoiLinux,
    #[serde(rename = "cpp11-noilinux")]
    Cpp11NoiLinux,
    #[serde(rename = "cpp11-clang")]
    Cpp11Clang,
    #[serde(rename = "cpp17-clang")]
    Cpp17Clang,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c-noilinux")]
    CNoiLinux,
}

impl FromStr for SubmissionLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let txt = s.trim().to_lowercase();
        if txt.is_empty() {
            return Err("empty language".to_string());
        }

        let has_clang = txt.contains("clang");
        let has_noilinux = txt.contains("noi") && txt.contains("linux");

        if txt.contains("c++") || txt.contains("cpp") {
            let lang = match (has_clang, has_noilinux) {
                (true, _) if txt.contains("17") => SubmissionLanguage::Cpp17Clang,
                (true, _) => SubmissionLanguage::Cpp11Clang,
                (false, true) if txt.contains("11") => SubmissionLanguage::Cpp11NoiLinux,
                (false, true) => SubmissionLanguage::CppNoiLinux,
                (false, false) if txt.contains("17") => SubmissionLanguage::Cpp17,
                (false, false) if txt.contains("14") => SubmissionLanguage::Cpp14,
                (false, false) if txt.contains("11") => SubmissionLanguage::Cpp11,
                (false, false) => SubmissionLanguage::Cpp,
            };
            Ok(lang)
        } else if txt.contains('c') && !txt.contains("c#") && !txt.contains("cs") {
            if has_noilinux {
                Ok(SubmissionLanguage::CNoiLinux)
            } else {
                Ok(SubmissionLanguage::C)
            }
        } else {
            // 评测服务只接受 C/C++，其余一律按默认语言提交
            Ok(SubmissionLanguage::Cpp17)
        }
    }
}

impl SubmissionLanguage {
    /// 空文本或无法识别时退回默认语言
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_language_parsing() {
        assert_eq!("C++".parse(), Ok(SubmissionLanguage::Cpp));
        assert_eq!("C++17 O2".parse(), Ok(SubmissionLanguage::Cpp17));
        assert_eq!("C++14 (GCC 9)".parse(), Ok(SubmissionLanguage::Cpp14));
        assert_eq!("c++11".parse(), Ok(SubmissionLanguage::Cpp11));
        assert_eq!("C++17 Clang".parse(), Ok(SubmissionLanguage::Cpp17Clang));
        assert_eq!("cpp clang".parse(), Ok(SubmissionLanguage::Cpp11Clang));
        assert_eq!(
            "C++11 NOI Linux".parse(),
            Ok(SubmissionLanguage::Cpp11NoiLinux)
        );
        assert_eq!("C++ NOI Linux".parse(), Ok(SubmissionLanguage::CppNoiLinux));
        assert_eq!("C".parse(), Ok(SubmissionLanguage::C));
        assert_eq!("C NOI Linux".parse(), Ok(SubmissionLanguage::CNoiLinux));
        assert_eq!("C#".parse(), Ok(SubmissionLanguage::Cpp17));
        assert_eq!("CSharp".parse(), Ok(SubmissionLanguage::Cpp17));
        assert!("   ".parse::<SubmissionLanguage>().is_err());
        assert_eq!(SubmissionLanguage::parse_lossy(""), SubmissionLanguage::Cpp17);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("Accepted".parse(), Ok(SubmissionStatus::Accepted));
        assert_eq!("Wrong Answer".parse(), Ok(SubmissionStatus::WrongAnswer));
        assert_eq!(
            "time limit exceeded".parse(),
            Ok(SubmissionStatus::TimeLimitExceeded)
        );
        assert!("Judging".parse::<SubmissionStatus>().is_err());
        assert_eq!(SubmissionStatus::parse_lossy("Judging"), SubmissionStatus::Unknown);
    }

    #[test]
    fn test_minimal_record_serializes_only_the_triple() {
        let record = SubmissionRecord::new("luogu", "P1001", "123");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"judge": "luogu", "problemId": "P1001", "runId": "123"})
        );
    }

    #[test]
    fn test_completeness() {
        assert!(SubmissionRecord::new("luogu", "P1001", "123").is_complete());
        assert!(!SubmissionRecord::new("luogu", "", "123").is_complete());
        assert!(!SubmissionRecord::new("", "P1001", "123").is_complete());
        assert!(!SubmissionRecord::default().has_code());
    }

    #[test]
    fn test_metadata_wire_names() {
        let record = SubmissionRecord {
            language: Some(SubmissionLanguage::Cpp11NoiLinux),
            status: Some(SubmissionStatus::WrongAnswer),
            total_time: Some(350),
            ..SubmissionRecord::new("xyd", "1", "2")
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["language"], "cpp11-noilinux");
        assert_eq!(value["status"], "Wrong Answer");
        assert_eq!(value["totalTime"], 350);
    }
}
