//! 请求分发 - 业务能力层
//!
//! 在截止时间内执行请求，并把结果分成传输层和业务层两级。
//! 截止时间到达时正在进行的请求被丢弃（取消），计时器随之释放

use std::future::Future;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::models::{DispatchResult, OutboundRequest, RawResponse};
use crate::utils::truncate_text;

/// 默认截止时间（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

/// 传输层
///
/// 只负责把请求送出去并取回状态码和响应文本
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: &OutboundRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// 基于 reqwest 的传输层
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: &OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            // 空 Cookie 不发送
            if value.is_empty() {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body.to_string()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// 请求分发器
pub struct Dispatcher<T: Transport = ReqwestTransport> {
    transport: T,
    deadline: Duration,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T, timeout_ms: u64) -> Self {
        Self {
            transport,
            deadline: Duration::from_millis(timeout_ms),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timeout_ms(&self) -> u64 {
        self.deadline.as_millis() as u64
    }

    /// 发送请求
    ///
    /// 响应、超时、其他网络错误三者只会报告其一
    pub async fn send(&self, request: &OutboundRequest) -> DispatchResult {
        let started = Instant::now();
        debug!("📡 POST {} (截止 {} ms)", request.url, self.timeout_ms());

        match timeout(self.deadline, self.transport.execute(request)).await {
            Ok(Ok(raw)) => {
                let body = serde_json::from_str::<JsonValue>(&raw.body).ok();
                if body.is_none() {
                    warn!(
                        "⚠️ 响应无法解析为 JSON (HTTP {}): {}",
                        raw.status,
                        truncate_text(&raw.body, 120)
                    );
                }
                debug!(
                    "收到响应 HTTP {}，耗时 {} ms",
                    raw.status,
                    started.elapsed().as_millis()
                );
                DispatchResult::delivered(raw.status, body)
            }
            Ok(Err(TransportError::Timeout { .. })) => {
                DispatchResult::transport_failed(self.timeout_error())
            }
            Ok(Err(err)) => {
                warn!("❌ 请求失败: {}", err);
                DispatchResult::transport_failed(err)
            }
            Err(_) => {
                warn!("❌ 请求超时 ({} ms)", self.timeout_ms());
                DispatchResult::transport_failed(self.timeout_error())
            }
        }
    }

    fn timeout_error(&self) -> TransportError {
        TransportError::Timeout {
            after_ms: self.timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// 被丢弃时置位
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    /// 延迟后返回固定响应
    struct Delayed {
        delay: Duration,
        result: Result<RawResponse, TransportError>,
        dropped: Arc<AtomicBool>,
        completed: Arc<AtomicBool>,
    }

    impl Delayed {
        fn ok(delay_ms: u64, status: u16, body: &str) -> Self {
            Self {
                delay: Duration::from_millis(delay_ms),
                result: Ok(RawResponse {
                    status,
                    body: body.to_string(),
                }),
                dropped: Arc::new(AtomicBool::new(false)),
                completed: Arc::new(AtomicBool::new(false)),
            }
        }

        fn err(error: TransportError) -> Self {
            Self {
                result: Err(error),
                ..Self::ok(0, 0, "")
            }
        }
    }

    impl Transport for Delayed {
        async fn execute(&self, _request: &OutboundRequest) -> Result<RawResponse, TransportError> {
            let _guard = DropFlag(self.dropped.clone());
            tokio::time::sleep(self.delay).await;
            self.completed.store(true, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn request() -> OutboundRequest {
        OutboundRequest::new(Method::POST, "http://oj.7fa4.cn/foreign_oj", json!({}))
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_just_before_deadline() {
        let dispatcher = Dispatcher::new(Delayed::ok(7999, 200, r#"{"success":true}"#), 8000);
        let result = dispatcher.send(&request()).await;

        assert!(result.transport_ok);
        assert!(result.business_ok);
        assert_eq!(result.status_code, Some(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_response_by_deadline_is_timeout() {
        let transport = Delayed::ok(8001, 200, r#"{"success":true}"#);
        let (dropped, completed) = (transport.dropped.clone(), transport.completed.clone());
        let dispatcher = Dispatcher::new(transport, DEFAULT_TIMEOUT_MS);

        let result = dispatcher.send(&request()).await;
        assert!(!result.transport_ok);
        assert!(!result.business_ok);
        assert_eq!(result.error, Some(TransportError::Timeout { after_ms: 8000 }));
        assert!(dropped.load(Ordering::SeqCst));

        // 请求已被取消，之后不会再完成
        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert!(!completed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unparseable_body_still_delivered() {
        let dispatcher = Dispatcher::new(Delayed::ok(0, 502, "<html>Bad Gateway</html>"), 8000);
        let result = dispatcher.send(&request()).await;

        assert!(result.transport_ok);
        assert!(!result.business_ok);
        assert_eq!(result.status_code, Some(502));
        assert!(result.response_body.is_none());
    }

    #[tokio::test]
    async fn test_network_error_is_not_timeout() {
        let dispatcher = Dispatcher::new(
            Delayed::err(TransportError::Network("connection refused".into())),
            8000,
        );
        let result = dispatcher.send(&request()).await;

        assert!(!result.transport_ok);
        let error = result.error.unwrap();
        assert!(!error.is_timeout());
        assert_eq!(error.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_transport_timeout_reports_deadline() {
        let dispatcher = Dispatcher::new(Delayed::err(TransportError::Timeout { after_ms: 0 }), 8000);
        let result = dispatcher.send(&request()).await;
        assert_eq!(result.error, Some(TransportError::Timeout { after_ms: 8000 }));
    }
}
