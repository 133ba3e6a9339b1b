//! Library constants
//!
//! Centralized location for reserved markers and configuration defaults.

/// Leading character of an `#[api("...")]` description that marks the field optional
pub const OPTIONAL_PREFIX: char = '?';

/// Placeholder for the API version number in request paths
pub const VERSION_PLACEHOLDER: &str = "{apiVersion}";

/// API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "v1";

/// Port the documentation preview listens on
pub const DEFAULT_PREVIEW_PORT: u16 = 16100;

/// Default timeout for requests made by the REST wrapper
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header values longer than this are truncated in the preview
pub const MAX_PREVIEW_HEADER_LEN: usize = 50;

/// Width of the separator lines framing diagnostics and progress output
pub const SEPARATOR_WIDTH: usize = 120;

/// Name prefix of functions that run a test suite
pub const TEST_SUITE_PREFIX: &str = "ts_";

/// Name prefix of functions that run a test case
pub const TEST_CASE_PREFIX: &str = "tc_";

/// Name prefix of functions that document the API
pub const TEST_DOCUMENTATION_PREFIX: &str = "td_";
