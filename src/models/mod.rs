pub mod credential;
pub mod envelope;
pub mod extraction;
pub mod submission;

pub use credential::{SessionCredential, StoredCredential};
pub use envelope::{DispatchResult, FailureKind, OutboundRequest, RawResponse, ResultEnvelope};
pub use extraction::{ExtractionResult, NO_EXTRACTOR_MATCHED};
pub use submission::{SubmissionLanguage, SubmissionRecord, SubmissionStatus};
