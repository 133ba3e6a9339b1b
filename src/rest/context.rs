//! Request context - target URL, credentials and API version shared by all calls

use std::time::Duration;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::constants::{DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS};

/// Authentication type
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum AuthType {
    #[default]
    None,
    Bearer(String),
    Basic {
        username: String,
        password: String,
    },
}

impl AuthType {
    /// Value of the `Authorization` header, if any
    pub fn header_value(&self) -> Option<String> {
        match self {
            AuthType::None => None,
            AuthType::Bearer(token) => Some(format!("Bearer {}", token)),
            AuthType::Basic { username, password } => {
                let credentials = format!("{}:{}", username, password);
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
        }
    }
}

/// Data required to execute requests against the tested API
#[derive(Clone, Debug)]
pub struct Context {
    /// Root URL of the tested API, request paths are appended to it
    pub url: String,
    pub auth: AuthType,
    /// Name of the authorized user, shown in progress output
    pub user_name: String,
    /// Current role of the authorized user
    pub role_name: String,
    /// Log request and response details at info level instead of debug
    pub verbose: bool,
    /// API version substituted for `{apiVersion}` in request paths
    pub version: String,
    client: reqwest::Client,
}

impl Context {
    pub fn new(url: impl Into<String>) -> Self {
        Context {
            url: url.into(),
            auth: AuthType::None,
            user_name: String::new(),
            role_name: String::new(),
            verbose: false,
            version: String::from(DEFAULT_API_VERSION),
            client: create_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Context {
            url: config.url.clone(),
            auth: config.auth.clone(),
            user_name: config.user_name.clone(),
            role_name: config.role_name.clone(),
            verbose: config.verbose,
            version: config.version.clone(),
            client: create_client(Duration::from_secs(config.timeout_secs)),
        }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Create an HTTP client with the given request timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
