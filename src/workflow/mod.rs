pub mod login_flow;
pub mod submit_flow;

pub use login_flow::{CaptureOutcome, LoginFlow};
pub use submit_flow::{SubmitCtx, SubmitFlow, SubmitMode, NO_CREDENTIAL};
