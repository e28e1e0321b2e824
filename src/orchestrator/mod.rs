//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责命令分派和资源管理，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 持有 Browser，按命令选择标签页
//! - 持有凭据槽和凭据文件
//!
//! ### `command` - 命令解析
//! - login / submit / observe
//!
//! ## 层次关系
//!
//! ```text
//! app (处理一条命令)
//!     ↓
//! workflow::LoginFlow / SubmitFlow (处理一次登录 / 提交)
//!     ↓
//! services (能力层：cookie 解析 / 提取 / 映射 / 请求构建 / 分发)
//!     ↓
//! infrastructure (基础设施：JsExecutor / CredentialSlot / CredentialFile)
//! ```

pub mod app;
pub mod command;

pub use app::App;
pub use command::Command;
