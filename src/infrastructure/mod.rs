//! 基础设施层：持有稀缺资源（Page、凭据槽、凭据文件），只暴露能力

pub mod credential_file;
pub mod credential_slot;
pub mod js_executor;

pub use credential_file::CredentialFile;
pub use credential_slot::CredentialSlot;
pub use js_executor::{CookieCapture, JsExecutor, PageSnapshot};
