pub mod credential_parser;
pub mod dispatcher;
pub mod extractors;
pub mod mapper;
pub mod request_builder;

pub use credential_parser::{parse_cookie, ParsedCredential};
pub use dispatcher::{Dispatcher, ReqwestTransport, Transport};
pub use extractors::{Extractor, ExtractorRegistry};
pub use mapper::SubmissionMapper;
pub use request_builder::RequestBuilder;
