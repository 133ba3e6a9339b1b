//! Documentation context - accumulates endpoint documentation while a test suite runs
//!
//! The REST wrapper hands every finished call to [`DocContext::record`]; what
//! gets kept depends on the current [`CollectMode`].

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_API_VERSION;
use crate::doc::field::{parse_fields, Field, TypeInfo};
use crate::doc::model::{Access, Endpoint, Header, Usage};
use crate::error::Result;

/// Which documentation data is captured from the next call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectMode {
    #[default]
    Nothing,
    Description,
    Usage,
    DescriptionAndUsage,
}

/// Everything the REST wrapper knows about one finished call
#[derive(Clone, Debug)]
pub struct Exchange {
    pub method: String,
    /// Root URL the request path was appended to
    pub root_path: String,
    /// Path template with the API version substituted
    pub path: String,
    /// Path actually requested, parameters filled in
    pub request_path: String,
    pub headers: Option<TypeInfo>,
    /// Header values sent with the request
    pub header_values: Vec<Header>,
    pub params: Option<TypeInfo>,
    pub body: Option<TypeInfo>,
    pub result: Option<TypeInfo>,
    pub request_body: Option<String>,
    pub response_body: Option<String>,
    pub status: u16,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct RoleKey {
    method: String,
    path: String,
    role: String,
}

/// Process-scoped accumulator of documented endpoints and role access
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocContext {
    mode: CollectMode,
    usage_summary: String,
    usage_description: String,
    role_name: String,
    endpoint: Option<Endpoint>,
    endpoints: Vec<Endpoint>,
    role_names: Vec<String>,
    #[serde(with = "role_entries")]
    roles: HashMap<RoleKey, Access>,
}

impl DocContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all collected data and returns to the initial state
    pub fn clear(&mut self) {
        *self = DocContext {
            role_names: std::mem::take(&mut self.role_names),
            ..DocContext::default()
        };
    }

    /// Starts documenting a new endpoint, an unsaved previous one is discarded
    pub fn new_endpoint(&mut self, version: &str, group: &str, summary: &str, description: &str) {
        let version = if version.is_empty() {
            DEFAULT_API_VERSION
        } else {
            version
        };
        if let Some(previous) = &self.endpoint {
            tracing::debug!(id = %previous.id, "Discarding unsaved endpoint");
        }
        self.endpoint = Some(Endpoint::new(
            group,
            version,
            summary.trim(),
            description.trim(),
        ));
    }

    /// Endpoint currently under construction
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn endpoint_mut(&mut self) -> Option<&mut Endpoint> {
        self.endpoint.as_mut()
    }

    pub fn mode(&self) -> CollectMode {
        self.mode
    }

    pub fn collect_description(&mut self) {
        self.mode = CollectMode::Description;
    }

    /// Collects a usage example from the next call
    ///
    /// Ignored when both texts are blank.
    pub fn collect_usage(&mut self, summary: &str, description: &str) {
        let summary = summary.trim();
        let description = description.trim();
        if !summary.is_empty() || !description.is_empty() {
            self.mode = CollectMode::Usage;
            self.usage_summary = summary.to_string();
            self.usage_description = description.to_string();
        }
    }

    pub fn collect_both(&mut self, summary: &str, description: &str) {
        self.mode = CollectMode::DescriptionAndUsage;
        self.usage_summary = summary.to_string();
        self.usage_description = description.to_string();
    }

    /// Sets the role whose access is recorded for the next call
    pub fn collect_role(&mut self, role_name: &str) {
        self.role_name = role_name.to_string();
    }

    pub fn stop_collecting(&mut self) {
        self.mode = CollectMode::Nothing;
        self.usage_summary.clear();
        self.usage_description.clear();
        self.role_name.clear();
    }

    pub fn collect_description_mode(&self) -> bool {
        matches!(
            self.mode,
            CollectMode::Description | CollectMode::DescriptionAndUsage
        )
    }

    pub fn collect_examples_mode(&self) -> bool {
        matches!(
            self.mode,
            CollectMode::Usage | CollectMode::DescriptionAndUsage
        )
    }

    pub fn usage_summary(&self) -> &str {
        &self.usage_summary
    }

    pub fn usage_description(&self) -> &str {
        &self.usage_description
    }

    /// Role names in the order they are displayed in the access matrix
    pub fn set_roles_order(&mut self, role_names: Vec<String>) {
        self.role_names = role_names;
    }

    pub fn role_names(&self) -> &[String] {
        &self.role_names
    }

    /// Records the access outcome of a call for the current role, if one is set
    pub fn save_role(&mut self, method: &str, path: &str, status: u16) {
        if self.role_name.is_empty() {
            return;
        }
        let key = RoleKey {
            method: method.to_string(),
            path: path.to_string(),
            role: self.role_name.clone(),
        };
        let access = Access::from_status(status);
        tracing::debug!(method, path, role = %key.role, ?access, "Recording access");
        self.roles.insert(key, access);
    }

    pub fn access(&self, method: &str, path: &str, role_name: &str) -> Access {
        let key = RoleKey {
            method: method.to_string(),
            path: path.to_string(),
            role: role_name.to_string(),
        };
        self.roles.get(&key).copied().unwrap_or(Access::Unknown)
    }

    /// Moves the endpoint under construction into the finished list
    ///
    /// Usage examples are ordered by ascending status code. Does nothing when
    /// no endpoint is under construction.
    pub fn save_endpoint(&mut self) {
        if let Some(mut endpoint) = self.endpoint.take() {
            endpoint.usages.sort_by_key(|usage| usage.status_code);
            tracing::info!(
                id = %endpoint.id,
                method = %endpoint.method,
                path = %endpoint.request_path,
                usages = endpoint.usages.len(),
                "Endpoint documented"
            );
            self.endpoints.push(endpoint);
        }
    }

    /// Finished endpoints in the order they were saved
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Takes in a finished call according to the current mode
    ///
    /// The access outcome is recorded whatever the mode, and collecting stops
    /// afterwards.
    pub fn record(&mut self, exchange: &Exchange) -> Result<()> {
        let description = if self.endpoint.is_some() && self.collect_description_mode() {
            Some([
                describe(exchange.headers)?,
                describe(exchange.params)?,
                describe(exchange.body)?,
                describe(exchange.result)?,
            ])
        } else {
            None
        };
        let collect_usage = self.collect_examples_mode();

        if let Some(endpoint) = &mut self.endpoint {
            if let Some([headers, parameters, request_body, response_body]) = description {
                endpoint.method = exchange.method.clone();
                endpoint.root_path = exchange.root_path.clone();
                endpoint.request_path = exchange.path.clone();
                endpoint.headers = headers;
                endpoint.parameters = parameters;
                endpoint.request_body = request_body;
                endpoint.response_body = response_body;
            }
            if collect_usage {
                endpoint.usages.push(Usage {
                    summary: self.usage_summary.clone(),
                    description: self.usage_description.clone(),
                    method: exchange.method.clone(),
                    headers: exchange.header_values.clone(),
                    url: format!("{}{}", exchange.root_path, exchange.request_path),
                    request_body: pretty_print(exchange.request_body.as_deref()),
                    response_body: pretty_print(exchange.response_body.as_deref()),
                    status_code: exchange.status,
                });
            }
        }

        self.save_role(&exchange.method, &exchange.path, exchange.status);
        self.stop_collecting();
        Ok(())
    }

    /// Writes the whole context as JSON
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::info!(path = %path.display(), endpoints = self.endpoints.len(), "Documentation saved");
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn describe(info: Option<TypeInfo>) -> Result<Option<Vec<Field>>> {
    info.map(|info| parse_fields(info, "")).transpose()
}

/// Pretty-prints a JSON body, other text is kept as it is
pub(crate) fn pretty_print(body: Option<&str>) -> String {
    let Some(body) = body else {
        return String::new();
    };
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Role map stored as a list, JSON object keys can only be strings
mod role_entries {
    use std::collections::HashMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Access, RoleKey};

    pub fn serialize<S: Serializer>(roles: &HashMap<RoleKey, Access>, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<(&RoleKey, &Access)> = roles.iter().collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashMap<RoleKey, Access>, D::Error> {
        let entries = Vec::<(RoleKey, Access)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::field::JsonType;
    use crate::ApiType;

    #[derive(ApiType)]
    #[allow(dead_code)]
    struct FirstResult {
        #[api("Identifier.")]
        id: String,
    }

    #[derive(ApiType)]
    #[allow(dead_code)]
    struct SecondResult {
        #[api("Identifier.")]
        id: String,
        #[api("?Display name.")]
        name: Option<String>,
    }

    fn exchange(status: u16, result: TypeInfo) -> Exchange {
        Exchange {
            method: "GET".to_string(),
            root_path: "http://localhost:8080".to_string(),
            path: "/v1/users/{userId}".to_string(),
            request_path: "/v1/users/42".to_string(),
            headers: None,
            header_values: vec![Header::new("Authorization", "Bearer abc")],
            params: None,
            body: None,
            result: Some(result),
            request_body: None,
            response_body: Some(r#"{"id":"42"}"#.to_string()),
            status,
        }
    }

    #[test]
    fn test_mode_transitions() {
        let mut dc = DocContext::new();
        assert_eq!(dc.mode(), CollectMode::Nothing);
        assert!(!dc.collect_description_mode());
        assert!(!dc.collect_examples_mode());

        dc.collect_description();
        assert!(dc.collect_description_mode());
        assert!(!dc.collect_examples_mode());

        dc.collect_usage("Read user", "");
        assert_eq!(dc.mode(), CollectMode::Usage);
        assert!(dc.collect_examples_mode());
        assert!(!dc.collect_description_mode());

        dc.collect_both("", "");
        assert!(dc.collect_description_mode());
        assert!(dc.collect_examples_mode());

        dc.stop_collecting();
        assert_eq!(dc.mode(), CollectMode::Nothing);
        assert_eq!(dc.usage_summary(), "");
    }

    #[test]
    fn test_blank_usage_leaves_mode_unchanged() {
        let mut dc = DocContext::new();
        dc.collect_description();
        dc.collect_usage("  ", "\t");
        assert_eq!(dc.mode(), CollectMode::Description);

        dc.collect_usage("  Summary  ", " Details ");
        assert_eq!(dc.usage_summary(), "Summary");
        assert_eq!(dc.usage_description(), "Details");
    }

    #[test]
    fn test_new_endpoint_defaults() {
        let mut dc = DocContext::new();
        dc.new_endpoint("", "users", "  Read user ", " Reads one user. ");
        let endpoint = dc.endpoint().unwrap();
        assert_eq!(endpoint.version, "v1");
        assert_eq!(endpoint.group, "users");
        assert_eq!(endpoint.summary, "Read user");
        assert_eq!(endpoint.description, "Reads one user.");
    }

    #[test]
    fn test_new_endpoint_discards_unsaved() {
        let mut dc = DocContext::new();
        dc.new_endpoint("v1", "users", "first", "");
        let first_id = dc.endpoint().unwrap().id.clone();
        dc.new_endpoint("v1", "users", "second", "");
        assert_ne!(dc.endpoint().unwrap().id, first_id);
        dc.save_endpoint();
        assert_eq!(dc.endpoints().len(), 1);
        assert_eq!(dc.endpoints()[0].summary, "second");
    }

    #[test]
    fn test_save_endpoint_twice_is_noop() {
        let mut dc = DocContext::new();
        dc.new_endpoint("v1", "users", "List", "");
        dc.save_endpoint();
        dc.save_endpoint();
        assert_eq!(dc.endpoints().len(), 1);
        assert!(dc.endpoint().is_none());
    }

    #[test]
    fn test_two_calls_collecting_both() {
        let mut dc = DocContext::new();
        dc.new_endpoint("v1", "users", "Read user", "");

        dc.collect_both("Not found", "");
        dc.record(&exchange(404, FirstResult::type_info())).unwrap();
        assert_eq!(dc.mode(), CollectMode::Nothing);

        dc.collect_both("Found", "");
        dc.record(&exchange(200, SecondResult::type_info())).unwrap();
        dc.save_endpoint();

        let endpoint = &dc.endpoints()[0];
        assert_eq!(endpoint.usages.len(), 2);
        assert_eq!(endpoint.usages[0].status_code, 200);
        assert_eq!(endpoint.usages[0].summary, "Found");
        assert_eq!(endpoint.usages[1].status_code, 404);
        assert_eq!(endpoint.usages[0].url, "http://localhost:8080/v1/users/42");
        assert_eq!(endpoint.usages[0].response_body, "{\n  \"id\": \"42\"\n}");

        let response = endpoint.response_body.as_ref().unwrap();
        assert_eq!(response.len(), 2);
        assert_eq!(response[1].json_name, "name");
        assert_eq!(response[1].json_type, JsonType::String);
        assert!(endpoint.headers.is_none());
        assert_eq!(endpoint.request_path, "/v1/users/{userId}");
        assert_eq!(endpoint.method, "GET");
    }

    #[test]
    fn test_usage_mode_keeps_description_untouched() {
        let mut dc = DocContext::new();
        dc.new_endpoint("v1", "users", "Read user", "");
        dc.collect_usage("Read", "");
        dc.record(&exchange(200, FirstResult::type_info())).unwrap();
        let endpoint = dc.endpoint().unwrap();
        assert!(endpoint.response_body.is_none());
        assert_eq!(endpoint.method, "");
        assert_eq!(endpoint.usages.len(), 1);
    }

    #[test]
    fn test_record_without_endpoint_still_saves_role() {
        let mut dc = DocContext::new();
        dc.collect_role("admin");
        dc.collect_both("summary", "");
        dc.record(&exchange(401, FirstResult::type_info())).unwrap();
        assert_eq!(dc.access("GET", "/v1/users/{userId}", "admin"), Access::Denied);
        assert!(dc.endpoints().is_empty());
    }

    #[test]
    fn test_access_matrix() {
        let mut dc = DocContext::new();
        dc.save_role("GET", "/x", 200);
        assert_eq!(dc.access("GET", "/x", ""), Access::Unknown);

        dc.collect_role("admin");
        dc.save_role("GET", "/x", 200);
        assert_eq!(dc.access("GET", "/x", "admin"), Access::Granted);
        assert_eq!(dc.access("GET", "/x", "guest"), Access::Unknown);
        assert_eq!(dc.access("POST", "/x", "admin"), Access::Unknown);

        dc.save_role("GET", "/x", 500);
        assert_eq!(dc.access("GET", "/x", "admin"), Access::Error);
    }

    #[test]
    fn test_clear_keeps_role_order() {
        let mut dc = DocContext::new();
        dc.set_roles_order(vec!["admin".into(), "guest".into()]);
        dc.new_endpoint("v1", "users", "List", "");
        dc.save_endpoint();
        dc.clear();
        assert!(dc.endpoints().is_empty());
        assert_eq!(dc.role_names().len(), 2);
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let mut dc = DocContext::new();
        dc.set_roles_order(vec!["admin".into()]);
        dc.collect_role("admin");
        dc.new_endpoint("v1", "users", "Read user", "");
        dc.collect_both("Found", "");
        dc.record(&exchange(200, SecondResult::type_info())).unwrap();
        dc.save_endpoint();
        dc.save_json(&path).unwrap();

        let loaded = DocContext::load_json(&path).unwrap();
        assert_eq!(loaded.endpoints(), dc.endpoints());
        assert_eq!(loaded.access("GET", "/v1/users/{userId}", "admin"), Access::Granted);
    }

    #[test]
    fn test_pretty_print_keeps_plain_text() {
        assert_eq!(pretty_print(None), "");
        assert_eq!(pretty_print(Some("plain")), "plain");
        assert_eq!(pretty_print(Some(r#"{"b":1,"a":2}"#)), "{\n  \"b\": 1,\n  \"a\": 2\n}");
    }
}
