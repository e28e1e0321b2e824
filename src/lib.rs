//! # OJ Submit
//!
//! 从评测站点的提交记录页面提取统一的提交记录，附上会话凭据后转交评测服务
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `JsExecutor` - 唯一的 page owner，读取页面快照和 cookie
//! - `CredentialSlot` - 单槽凭据存储，整体替换
//! - `CredentialFile` - 凭据的 TOML 持久化
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个能力只处理一条输入
//! - `parse_cookie` - cookie → 会话凭据
//! - `ExtractorRegistry` - 按优先级选择站点提取器（洛谷 / 信友队 / VJudge）
//! - `SubmissionMapper` - 聚合站点提交映射回真实 OJ
//! - `RequestBuilder` - 记录 + 凭据 → 出站请求
//! - `Dispatcher` - 带截止时间的请求分发
//!
//! ### ③ 流程层（Workflow）
//! - `LoginFlow` - cookie 捕获（解析失败时原样保存）
//! - `SubmitFlow` - 凭据 → 提取 → 映射 → 构建 → 分发 → 结果信封
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 连接浏览器、选择标签页、执行命令
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{CredentialFile, CredentialSlot, JsExecutor};
pub use models::{ExtractionResult, ResultEnvelope, SessionCredential, SubmissionRecord};
pub use orchestrator::{App, Command};
pub use workflow::{LoginFlow, SubmitCtx, SubmitFlow, SubmitMode};
