//! 提交流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取凭据（观察模式跳过）
//! 2. 提取器注册表 → 提交记录
//! 3. 聚合站点映射（可选）
//! 4. 构建请求 → 分发 → 结果信封
//!
//! 每一步的失败都转换成 `ResultEnvelope` 中对应的 `FailureKind`

use std::fmt::Display;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::infrastructure::CredentialSlot;
use crate::models::{ExtractionResult, FailureKind, ResultEnvelope, SessionCredential};
use crate::services::{
    Dispatcher, ExtractorRegistry, RequestBuilder, SubmissionMapper, Transport,
};

/// 没有可用凭据时的错误文本
pub const NO_CREDENTIAL: &str = "no credential";

/// 运行模式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitMode {
    /// 提取并提交
    #[default]
    Submit,
    /// 只提取，不提交
    Observe,
}

/// 提交上下文
///
/// 一次提交所需的全部输入
#[derive(Debug, Clone)]
pub struct SubmitCtx {
    pub url: String,
    pub html: String,
    pub in_contest: bool,
    pub mode: SubmitMode,
    /// 是否把聚合站点的提交映射回真实 OJ
    pub map_aggregator: bool,
}

impl SubmitCtx {
    /// 使用配置中的默认开关
    pub fn new(url: impl Into<String>, html: impl Into<String>, config: &Config) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            in_contest: config.in_contest,
            mode: if config.observe_only {
                SubmitMode::Observe
            } else {
                SubmitMode::Submit
            },
            map_aggregator: config.map_aggregator,
        }
    }

    pub fn with_mode(mut self, mode: SubmitMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Display for SubmitCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[提交 {:?}] {}", self.mode, self.url)
    }
}

/// 提交流程
///
/// - 编排完整的提交流程
/// - 不持有页面资源，页面内容由上下文传入
/// - 凭据槽由调用方注入
pub struct SubmitFlow<T: Transport> {
    registry: ExtractorRegistry,
    mapper: SubmissionMapper,
    builder: RequestBuilder,
    dispatcher: Dispatcher<T>,
}

impl<T: Transport> SubmitFlow<T> {
    /// 使用内置提取器创建
    pub fn new(config: &Config, transport: T) -> Self {
        Self::with_registry(config, transport, ExtractorRegistry::with_defaults())
    }

    pub fn with_registry(config: &Config, transport: T, registry: ExtractorRegistry) -> Self {
        Self {
            registry,
            mapper: SubmissionMapper::new(),
            builder: RequestBuilder::new(config),
            dispatcher: Dispatcher::new(transport, config.dispatch_timeout_ms),
        }
    }

    pub async fn run(&self, ctx: &SubmitCtx, slot: &CredentialSlot) -> ResultEnvelope {
        info!("{} 开始处理", ctx);

        // ========== 步骤 1: 凭据 ==========
        let credential = match ctx.mode {
            SubmitMode::Observe => None,
            SubmitMode::Submit => match Self::load_credential(slot) {
                Some(credential) => Some(credential),
                None => {
                    warn!("{} ❌ 没有可用凭据，请先登录", ctx);
                    return ResultEnvelope::failure(FailureKind::NoCredential, NO_CREDENTIAL);
                }
            },
        };

        // ========== 步骤 2: 提取 ==========
        let mut parsed = self.registry.dispatch(&ctx.url, &ctx.html);
        let Some(record) = parsed.record.take().filter(|_| parsed.success) else {
            return Self::extraction_failure(ctx, parsed);
        };
        let extractor = parsed.extractor.clone().unwrap_or_default();
        info!(
            "{} ✓ 提取完成 ({}): {}/{}/{}",
            ctx, extractor, record.judge, record.problem_id, record.run_id
        );

        // ========== 步骤 3: 聚合站点映射 ==========
        let record = self.mapper.apply(record, &extractor, ctx.map_aggregator);
        parsed.record = Some(record.clone());

        let Some(credential) = credential else {
            info!("{} 观察模式，不提交", ctx);
            return ResultEnvelope {
                ok: parsed.success,
                ..Default::default()
            }
            .with_parsed(parsed);
        };

        // ========== 步骤 4: 构建请求 ==========
        let request = match self.builder.build(&record, &credential, ctx.in_contest) {
            Ok(request) => request,
            Err(e) => {
                warn!("{} ❌ 无法构建请求: {}", ctx, e);
                return ResultEnvelope::failure(
                    FailureKind::RequestBuild,
                    format!("cannot build request: {e}"),
                )
                .with_parsed(parsed);
            }
        };
        debug!("{} 请求体: {}", ctx, request.body);

        // ========== 步骤 5: 分发 ==========
        let dispatch = self.dispatcher.send(&request).await;
        let envelope = ResultEnvelope::from_dispatch(dispatch, parsed);
        match (envelope.ok, envelope.business_success) {
            (true, Some(true)) => info!("{} ✅ 评测服务已接收", ctx),
            (true, _) => warn!("{} ⚠️ {}", ctx, envelope.err.as_deref().unwrap_or("-")),
            (false, _) => warn!("{} ❌ {}", ctx, envelope.err.as_deref().unwrap_or("-")),
        }
        envelope
    }

    /// 传输层
    pub fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    /// 原始备份不能用于提交，等同于没有凭据
    fn load_credential(slot: &CredentialSlot) -> Option<SessionCredential> {
        slot.load().and_then(|stored| stored.session().cloned())
    }

    fn extraction_failure(ctx: &SubmitCtx, parsed: ExtractionResult) -> ResultEnvelope {
        let kind = if parsed.is_no_match() {
            FailureKind::ExtractionNoMatch
        } else {
            FailureKind::ExtractionPartial
        };
        let err = parsed
            .error
            .clone()
            .unwrap_or_else(|| "extraction failed".to_string());
        warn!("{} ❌ 提取失败: {}", ctx, err);
        ResultEnvelope::failure(kind, err).with_parsed(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::models::{OutboundRequest, RawResponse, StoredCredential};
    use std::sync::Mutex;

    /// 记录收到的请求并返回固定响应
    struct Recording {
        response: Result<RawResponse, TransportError>,
        seen: Mutex<Vec<OutboundRequest>>,
    }

    impl Recording {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Recording {
        async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            self.response.clone()
        }
    }

    const VJUDGE_URL: &str = "https://vjudge.net/solution/65377961";
    const VJUDGE_PAGE: &str = r#"
        <h5 class="modal-title"><a href="/problem/UESTC-126">UESTC-126</a></h5>
        <span class="oj">UESTC</span>
        <span class="remote-run-id"><a>4438712</a></span>
        <pre><code>int main() {}</code></pre>
    "#;

    fn slot_with_login() -> CredentialSlot {
        CredentialSlot::with(StoredCredential::Parsed(SessionCredential {
            login: Some("L".to_string()),
            sid: Some("S".to_string()),
            chost: None,
        }))
    }

    fn ctx(map_aggregator: bool) -> SubmitCtx {
        SubmitCtx {
            url: VJUDGE_URL.to_string(),
            html: VJUDGE_PAGE.to_string(),
            in_contest: false,
            mode: SubmitMode::Submit,
            map_aggregator,
        }
    }

    #[tokio::test]
    async fn test_mapping_changes_request_body() {
        let flow = SubmitFlow::new(&Config::default(), Recording::new(200, r#"{"success":true}"#));
        let envelope = flow.run(&ctx(true), &slot_with_login()).await;

        assert!(envelope.ok);
        assert_eq!(envelope.business_success, Some(true));
        let seen = flow.transport().seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].body["judge"], "uestc");
        assert_eq!(seen[0].body["problemId"], "126");
        assert_eq!(seen[0].body["runId"], "4438712");
    }

    #[tokio::test]
    async fn test_mapping_disabled_keeps_vjudge_ids() {
        let flow = SubmitFlow::new(&Config::default(), Recording::new(200, r#"{"success":true}"#));
        flow.run(&ctx(false), &slot_with_login()).await;

        let seen = flow.transport().seen.lock().unwrap().clone();
        assert_eq!(seen[0].body["judge"], "vjudge");
        assert_eq!(seen[0].body["runId"], "65377961");
    }

    #[tokio::test]
    async fn test_raw_credential_counts_as_missing() {
        let slot = CredentialSlot::with(StoredCredential::Raw {
            raw_cookie: "x".to_string(),
            raw_origin: "y".to_string(),
        });
        let flow = SubmitFlow::new(&Config::default(), Recording::new(200, "{}"));
        let envelope = flow.run(&ctx(false), &slot).await;

        assert!(!envelope.ok);
        assert_eq!(envelope.kind, Some(FailureKind::NoCredential));
        assert!(envelope.parsed.is_none());
    }

    #[tokio::test]
    async fn test_partial_extraction_is_reported() {
        let flow = SubmitFlow::new(&Config::default(), Recording::new(200, "{}"));
        let ctx = SubmitCtx {
            html: VJUDGE_PAGE.replace("<pre><code>int main() {}</code></pre>", ""),
            ..ctx(false)
        };
        let envelope = flow.run(&ctx, &slot_with_login()).await;

        assert!(!envelope.ok);
        assert_eq!(envelope.kind, Some(FailureKind::ExtractionPartial));
        let parsed = envelope.parsed.unwrap();
        assert_eq!(parsed.partial.unwrap().problem_id, "UESTC-126");
        assert!(flow.transport().seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bad_host_is_request_build_failure() {
        let config = Config {
            grading_host: "bad host".to_string(),
            ..Config::default()
        };
        let flow = SubmitFlow::new(&config, Recording::new(200, "{}"));
        let envelope = flow.run(&ctx(false), &slot_with_login()).await;

        assert!(!envelope.ok);
        assert_eq!(envelope.kind, Some(FailureKind::RequestBuild));
        assert!(envelope.resp.is_none());
        assert!(envelope.parsed.unwrap().success);
    }
}
