//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"读取页面"的能力

use anyhow::{Context, Result};
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::utils::truncate_text;

/// 页面快照：提取器的输入
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
}

/// 页面 cookie 与来源
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieCapture {
    pub cookie: String,
    pub origin: String,
}

const SNAPSHOT_SCRIPT: &str = r#"
    (() => ({
        url: location.href,
        html: document.documentElement ? document.documentElement.outerHTML : ""
    }))()
"#;

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 和页面读取能力
/// - 不认识提交记录和凭据格式
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    ///
    /// # 参数
    /// - `js_code`: 要执行的 JavaScript 代码
    ///
    /// # 返回
    /// 返回 JSON 值
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 读取当前页面的 URL 和完整 HTML
    pub async fn snapshot(&self) -> Result<PageSnapshot> {
        let snapshot: PageSnapshot = self
            .eval_as(SNAPSHOT_SCRIPT)
            .await
            .context("读取页面内容失败")?;
        debug!(
            "页面快照: {} ({} 字节) {}",
            snapshot.url,
            snapshot.html.len(),
            truncate_text(snapshot.html.trim(), 40)
        );
        Ok(snapshot)
    }

    /// 读取当前页面的 cookie（含 HttpOnly）和来源 URL
    pub async fn read_cookie(&self) -> Result<CookieCapture> {
        let origin = self
            .page
            .url()
            .await
            .context("读取页面 URL 失败")?
            .unwrap_or_default();
        let cookies = self.page.get_cookies().await.context("读取 cookie 失败")?;

        let cookie = cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ");
        debug!("读取到 {} 个 cookie, 来源 {}", cookies.len(), origin);

        Ok(CookieCapture { cookie, origin })
    }
}
