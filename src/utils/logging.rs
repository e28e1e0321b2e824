/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::ResultEnvelope;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `command`: 本次执行的命令
/// - `host`: 默认评测主机
pub fn log_startup(command: &str, host: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", command);
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📡 默认评测主机: {}", host);
    info!("{}", "=".repeat(60));
}

/// 打印结果信封摘要
pub fn log_envelope(envelope: &ResultEnvelope) {
    info!("\n{}", "─".repeat(60));
    match (envelope.ok, envelope.business_success) {
        (true, Some(true)) => info!("✅ 提交成功 (HTTP {:?})", envelope.status_code),
        (true, Some(false)) => info!(
            "⚠️ 评测服务拒绝: {}",
            envelope.err.as_deref().unwrap_or("-")
        ),
        (true, None) => info!("✓ 提取完成（未提交）"),
        (false, _) => info!(
            "❌ 失败 [{}]: {}",
            envelope.kind.map(|k| k.as_str()).unwrap_or("-"),
            envelope.err.as_deref().unwrap_or("-")
        ),
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
