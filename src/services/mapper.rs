//! 聚合站点映射 - 业务能力层
//!
//! VJudge 之类的聚合站点把提交转交给真实 OJ。
//! 开启映射后，记录的 (judge, problemId, runId) 换成真实 OJ 的编号。
//! 映射只是增强：任何失败都保留原记录

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::models::SubmissionRecord;
use crate::services::extractors::registry::panic_message;

/// 题号中 OJ 与编号之间的分隔符，按顺序尝试
const SEPARATORS: [char; 4] = ['-', '/', '_', ':'];

/// 聚合站点提取器名称特征
const AGGREGATOR_PATTERN: &str = "vj";

/// 映射后的三元组 (judge, problemId, runId)
pub type MappedIds = (String, String, String);

/// 聚合站点映射器
#[derive(Debug, Default, Clone, Copy)]
pub struct SubmissionMapper;

impl SubmissionMapper {
    pub fn new() -> Self {
        Self
    }

    /// 提取器名称是否表示聚合站点
    pub fn is_aggregator(extractor_name: &str) -> bool {
        extractor_name.to_lowercase().contains(AGGREGATOR_PATTERN)
    }

    /// 计算映射后的三元组
    ///
    /// 题号形如 `OJ-123`，也接受 `/` `_` `:` 分隔；
    /// 题号里拆不出 OJ 名称时退回页面上的 `originJudge`
    pub fn map(&self, record: &SubmissionRecord, extractor_name: &str) -> Option<MappedIds> {
        if !Self::is_aggregator(extractor_name) {
            return None;
        }

        let pid = record.problem_id.trim();
        let (judge, problem) = SEPARATORS
            .iter()
            .find_map(|sep| pid.split_once(*sep))
            .filter(|(oj, rest)| !oj.is_empty() && !rest.is_empty())
            .map(|(oj, rest)| (oj.to_string(), rest.to_string()))
            .or_else(|| {
                let origin = record.origin_judge.as_deref()?.trim();
                (!origin.is_empty() && !pid.is_empty()).then(|| (origin.to_string(), pid.to_string()))
            })?;

        let run_id = record
            .remote_run_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&record.run_id)
            .to_string();
        if run_id.is_empty() {
            return None;
        }

        Some((judge.to_lowercase(), problem, run_id))
    }

    /// 按开关应用映射
    ///
    /// 关闭时原样返回；映射失败（包括内部 panic）时也原样返回
    pub fn apply(
        &self,
        mut record: SubmissionRecord,
        extractor_name: &str,
        enabled: bool,
    ) -> SubmissionRecord {
        if !enabled || !Self::is_aggregator(extractor_name) {
            return record;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.map(&record, extractor_name))) {
            Ok(Some((judge, problem_id, run_id))) => {
                debug!(
                    "聚合站点映射: {}/{}/{} → {}/{}/{}",
                    record.judge, record.problem_id, record.run_id, judge, problem_id, run_id
                );
                record.judge = judge;
                record.problem_id = problem_id;
                record.run_id = run_id;
                record
            }
            Ok(None) => {
                debug!("题号 {} 无法映射，保留原记录", record.problem_id);
                record
            }
            Err(payload) => {
                warn!("⚠️ 映射出错，保留原记录: {}", panic_message(payload.as_ref()));
                record
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vjudge_record(pid: &str) -> SubmissionRecord {
        SubmissionRecord {
            origin_judge: Some("UESTC".to_string()),
            remote_run_id: Some("4438712".to_string()),
            code: Some("int main(){}".to_string()),
            ..SubmissionRecord::new("vjudge", pid, "65377961")
        }
    }

    #[test]
    fn test_is_aggregator() {
        assert!(SubmissionMapper::is_aggregator("vjudge"));
        assert!(SubmissionMapper::is_aggregator("VJudge-Mirror"));
        assert!(!SubmissionMapper::is_aggregator("luogu"));
    }

    #[test]
    fn test_map_splits_problem_id() {
        let mapper = SubmissionMapper::new();
        assert_eq!(
            mapper.map(&vjudge_record("UESTC-126"), "vjudge"),
            Some(("uestc".to_string(), "126".to_string(), "4438712".to_string()))
        );
        assert_eq!(
            mapper.map(&vjudge_record("CodeForces/1A"), "vjudge"),
            Some(("codeforces".to_string(), "1A".to_string(), "4438712".to_string()))
        );
    }

    #[test]
    fn test_map_falls_back_to_origin_judge_and_run_id() {
        let record = SubmissionRecord {
            remote_run_id: None,
            ..vjudge_record("126")
        };
        assert_eq!(
            SubmissionMapper::new().map(&record, "vjudge"),
            Some(("uestc".to_string(), "126".to_string(), "65377961".to_string()))
        );
    }

    #[test]
    fn test_apply_disabled_is_noop() {
        let record = vjudge_record("UESTC-126");
        let mapper = SubmissionMapper::new();
        assert_eq!(mapper.apply(record.clone(), "vjudge", false), record);
        assert_eq!(mapper.apply(record.clone(), "luogu", true), record);
    }

    #[test]
    fn test_apply_rewrites_only_identifiers() {
        let mapped = SubmissionMapper::new().apply(vjudge_record("UESTC-126"), "vjudge", true);
        assert_eq!(mapped.judge, "uestc");
        assert_eq!(mapped.problem_id, "126");
        assert_eq!(mapped.run_id, "4438712");
        assert_eq!(mapped.code.as_deref(), Some("int main(){}"));
    }

    #[test]
    fn test_unmappable_record_is_kept() {
        let record = SubmissionRecord::new("vjudge", "126", "1");
        assert_eq!(SubmissionMapper::new().apply(record.clone(), "vjudge", true), record);
    }
}
