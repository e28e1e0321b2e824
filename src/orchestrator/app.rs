//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：连接浏览器、从凭据文件恢复凭据槽
//! 2. **命令分派**：login / submit / observe
//! 3. **资源管理**：唯一持有 Browser，按命令选择标签页并创建 JsExecutor
//! 4. **结果输出**：凭据写回文件，结果信封以 JSON 打印

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::{info, warn};
use url::Url;

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{CredentialFile, CredentialSlot, JsExecutor};
use crate::orchestrator::Command;
use crate::services::credential_parser::is_grading_host;
use crate::services::{ExtractorRegistry, ReqwestTransport};
use crate::utils::logging::log_envelope;
use crate::workflow::{CaptureOutcome, LoginFlow, SubmitCtx, SubmitFlow, SubmitMode};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    slot: CredentialSlot,
    credential_file: CredentialFile,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let browser = browser::connect_to_browser(config.browser_debug_port).await?;

        let credential_file = CredentialFile::new(&config.credential_file);
        let slot = CredentialSlot::new();
        match credential_file.load().await {
            Ok(Some(stored)) => {
                info!("✓ 已从 {} 恢复凭据", credential_file.path().display());
                slot.replace(stored);
            }
            Ok(None) => info!("尚未保存凭据"),
            Err(e) => warn!("⚠️ 凭据文件无法读取，忽略: {}", e),
        }

        Ok(Self {
            config,
            browser,
            slot,
            credential_file,
        })
    }

    /// 执行命令
    pub async fn run(&self, command: Command) -> Result<()> {
        match command.submit_mode() {
            None => self.login().await,
            Some(mode) => self.submit(mode).await,
        }
    }

    /// 读取评测服务标签页的 cookie 并保存
    async fn login(&self) -> Result<()> {
        let page = browser::find_page(&self.browser, "", is_grading_page).await?;
        let executor = JsExecutor::new(page);
        let capture = executor.read_cookie().await?;

        let outcome = LoginFlow::new().capture(&capture.cookie, &capture.origin, &self.slot);
        if let Some(stored) = self.slot.load() {
            self.credential_file
                .save(&stored)
                .await
                .context("保存凭据失败")?;
        }

        match &outcome {
            CaptureOutcome::Parsed { valid: true, .. } => info!("✅ 登录凭据已更新"),
            CaptureOutcome::Parsed { valid: false, .. } => {
                warn!("⚠️ 凭据已保存但不完整，提交可能被评测服务拒绝")
            }
            CaptureOutcome::ParseFailed { error } => {
                warn!("⚠️ 凭据解析失败 ({})，已原样保存", error)
            }
        }
        println!("{}", serde_json::to_string_pretty(&outcome.to_envelope())?);
        Ok(())
    }

    /// 从评测站点标签页提取并（按模式）提交
    async fn submit(&self, mode: SubmitMode) -> Result<()> {
        let registry = ExtractorRegistry::with_defaults();
        let page = browser::find_page(&self.browser, &self.config.judge_tab_hint, |url| {
            registry.select(url).is_some()
        })
        .await?;
        let snapshot = JsExecutor::new(page).snapshot().await?;

        let flow = SubmitFlow::with_registry(&self.config, ReqwestTransport::new(), registry);
        let ctx = SubmitCtx::new(snapshot.url, snapshot.html, &self.config).with_mode(mode);
        let envelope = flow.run(&ctx, &self.slot).await;

        log_envelope(&envelope);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        Ok(())
    }
}

/// 评测服务域名下的页面
fn is_grading_page(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(is_grading_host))
        .unwrap_or(false)
}
