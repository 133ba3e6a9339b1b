//! REST call wrapper - executes HTTP calls for a test suite and feeds the documentation context
//!
//! A [`Call`] is built per request, sent with a request [`Context`] and a
//! [`DocContext`](crate::doc::DocContext). Unexpected status codes, transport
//! and decoding failures come back as errors.

pub mod call;
pub mod context;
pub mod path;

pub use call::Call;
pub use context::{create_client, AuthType, Context};
pub use path::{header_values, prepare_request_path, substitute_version, Payload};
