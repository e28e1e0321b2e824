pub mod logging;
pub mod units;

pub use logging::truncate_text;
pub use units::{parse_mem_to_kb, parse_time_to_ms};
