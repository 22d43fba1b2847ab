//! Recording helpers for tests.
//!
//! Available behind the `test-utils` feature flag.

mod call_log;

pub use call_log::{CallLog, RecordedCall};
