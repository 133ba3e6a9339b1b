//! Error type shared by the whole library
//!
//! Every failure is returned to the suite driver, which decides whether to stop
//! the process (see [`crate::report::finish`]).

use std::fmt;

use crate::constants::SEPARATOR_WIDTH;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A documented type contains a member whose kind has no JSON counterpart.
    #[error("unsupported type: field `{field}` is a {kind}")]
    UnsupportedKind { field: String, kind: &'static str },

    /// Request parameters must be described by a struct.
    #[error("only struct parameters are allowed, got `{type_name}`")]
    NonStructParameters { type_name: String },

    /// A documented member is absent from the serialized value.
    #[error("member `{member}` of `{type_name}` is missing from the serialized value")]
    MissingMember { type_name: String, member: String },

    #[error("{}", diagnostic("unexpected status code", .expected, .actual))]
    UnexpectedStatus { expected: u16, actual: u16, body: String },

    #[error("{}", diagnostic("assertion error", .expected, .actual))]
    Assertion { expected: String, actual: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn assertion(expected: impl fmt::Debug, actual: impl fmt::Debug) -> Error {
        Error::Assertion {
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }
}

/// Formats the expected/actual block printed for failed checks
fn diagnostic(title: &str, expected: &dyn fmt::Display, actual: &dyn fmt::Display) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    format!(
        "\n{separator}\n>     ERROR: {title}\n>  Expected: {expected}\n>    Actual: {actual}\n{separator}\n"
    )
}
