//! # Oxyde
//!
//! REST API test helpers that document the API while the test suite runs.
//!
//! ## Features
//! - Field trees of request and response types (`#[derive(ApiType)]`)
//! - Documentation context recording endpoints, usage examples and role access
//! - REST call wrapper feeding the context on every call
//! - HTML preview with an access matrix, served by axum
//! - Assertions and progress output for suite drivers
//!
//! ## Architecture
//! - Doc Layer - field extraction and the collecting state machine
//! - REST Layer - reqwest calls, path preparation, documentation hand-off
//! - Preview Layer - model built once, rendered with handlebars

extern crate self as oxyde;

pub mod assert;
pub mod config;
pub mod constants;
pub mod doc;
pub mod error;
pub mod logging;
pub mod preview;
pub mod report;
pub mod rest;

// Re-export commonly used types
pub use config::{Config, LogConfig};
pub use doc::{
    parse_fields, parse_type, parse_value, Access, ApiType, CollectMode, DocContext, Endpoint,
    Exchange, Field, Header, JsonType, Kind, Member, TypeInfo, Usage,
};
pub use error::{Error, Result};
pub use oxyde_derive::ApiType;
pub use preview::{start_preview, PreviewModel, PreviewServer};
pub use rest::{AuthType, Call, Context};
