//! Documentation data model - endpoints, usage examples and access outcomes

use serde::{Deserialize, Serialize};

use crate::doc::field::Field;

/// One documented request/response contract
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Unique endpoint identifier (UUID)
    pub id: String,
    /// Name of the group this endpoint belongs to
    pub group: String,
    /// API version number for the endpoint
    pub version: String,
    /// HTTP method name, like GET, POST, PUT or DELETE
    pub method: String,
    pub root_path: String,
    /// Request path after the root path, `{name}` placeholders left in place
    pub request_path: String,
    pub summary: String,
    pub description: String,
    /// `None` when the documented call had no headers
    pub headers: Option<Vec<Field>>,
    pub parameters: Option<Vec<Field>>,
    pub request_body: Option<Vec<Field>>,
    pub response_body: Option<Vec<Field>>,
    pub usages: Vec<Usage>,
}

impl Endpoint {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        summary: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Endpoint {
            id: uuid::Uuid::new_v4().to_string(),
            group: group.into(),
            version: version.into(),
            summary: summary.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// HTTP header name and value as sent in a usage example
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One concrete recorded request/response example
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub summary: String,
    pub description: String,
    pub method: String,
    pub headers: Vec<Header>,
    /// Full request URL
    pub url: String,
    /// Pretty-printed request body, empty when there was none
    pub request_body: String,
    /// Pretty-printed response body, empty when there was none
    pub response_body: String,
    pub status_code: u16,
}

/// Tested access of a role to an endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Granted,
    Denied,
    /// No call was recorded for the role
    Unknown,
    /// The call ended with a status that is neither a grant nor a denial
    Error,
}

impl Access {
    /// Classifies the status code of a call made with a role
    pub fn from_status(status: u16) -> Access {
        match status {
            200 => Access::Granted,
            401 => Access::Denied,
            _ => Access::Error,
        }
    }

    /// Label shown in the access matrix
    pub fn label(&self) -> &'static str {
        match self {
            Access::Granted => "YES",
            Access::Denied => "NO",
            Access::Unknown => "?",
            Access::Error => "ERR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_endpoint_has_unique_id() {
        let a = Endpoint::new("users", "v1", "List users", "");
        let b = Endpoint::new("users", "v1", "List users", "");
        assert_eq!(a.id.len(), 36);
        assert_ne!(a.id, b.id);
        assert!(a.usages.is_empty());
        assert!(a.headers.is_none());
    }

    #[test]
    fn test_access_from_status() {
        assert_eq!(Access::from_status(200), Access::Granted);
        assert_eq!(Access::from_status(401), Access::Denied);
        assert_eq!(Access::from_status(403), Access::Error);
        assert_eq!(Access::from_status(500), Access::Error);
        assert_eq!(Access::Unknown.label(), "?");
    }
}
