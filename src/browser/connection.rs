use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, BrowserError};

/// 通过调试端口连接到已打开的浏览器
pub async fn connect_to_browser(port: u16) -> Result<Browser> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    Ok(browser)
}

/// 查找 URL 满足条件的标签页
///
/// # 参数
/// - `browser`: 已连接的浏览器
/// - `hint`: URL 关键字，非空时优先匹配
/// - `accept`: 没有关键字或关键字未命中时使用的判断条件
///
/// # 返回
/// 第一个匹配的页面；都不匹配时返回 `PageNotFound`
pub async fn find_page<F>(browser: &Browser, hint: &str, accept: F) -> Result<Page>
where
    F: Fn(&str) -> bool,
{
    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    let mut candidates = Vec::with_capacity(pages.len());
    for page in pages {
        if let Ok(Some(url)) = page.url().await {
            debug!("检查页面: {}", url);
            candidates.push((url, page));
        }
    }

    if !hint.is_empty() {
        if let Some((url, page)) = candidates.iter().find(|(url, _)| url.contains(hint)) {
            info!("✓ 找到目标页面: {}", url);
            return Ok(page.clone());
        }
        debug!("没有 URL 包含 '{}' 的页面，按页面类型查找", hint);
    }

    match candidates.into_iter().find(|(url, _)| accept(url)) {
        Some((url, page)) => {
            info!("✓ 找到目标页面: {}", url);
            Ok(page)
        }
        None => Err(AppError::from(BrowserError::PageNotFound {
            hint: if hint.is_empty() { "-".to_string() } else { hint.to_string() },
        })
        .into()),
    }
}
