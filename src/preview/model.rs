//! Preview model - a finished documentation context shaped for rendering

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::MAX_PREVIEW_HEADER_LEN;
use crate::doc::context::DocContext;
use crate::doc::field::Field;
use crate::doc::model::{Header, Usage};

const INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

/// All documented endpoints, grouped, plus the access matrix
#[derive(Clone, Debug, Default, Serialize)]
pub struct PreviewModel {
    pub groups: Vec<PreviewGroup>,
    pub endpoints: Vec<PreviewEndpoint>,
    /// Column headers of the access matrix
    pub role_names: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PreviewGroup {
    /// Group name in upper-case
    pub name: String,
    pub endpoints: Vec<PreviewEndpoint>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PreviewEndpoint {
    pub id: String,
    pub method_up: String,
    pub method_lo: String,
    pub url_root: String,
    pub url_path: String,
    pub group: String,
    pub summary: String,
    pub description: String,
    pub headers: Option<Vec<PreviewField>>,
    pub parameters: Option<Vec<PreviewField>>,
    pub request_body: Option<Vec<PreviewField>>,
    pub response_body: Option<Vec<PreviewField>>,
    pub usages: Vec<PreviewUsage>,
    /// Access label per role, in role order
    pub access: Vec<&'static str>,
}

/// One row of a field table, nested fields flattened below their parent
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewField {
    /// `&nbsp;` run marking the nesting depth, rendered unescaped
    pub indent: String,
    pub name: String,
    pub json_type: String,
    pub mandatory: &'static str,
    pub mandatory_lo: &'static str,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PreviewHeader {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct PreviewUsage {
    pub summary: String,
    pub description: String,
    pub method_up: String,
    pub method_lo: String,
    pub url: String,
    pub headers: Vec<PreviewHeader>,
    pub request_body: String,
    pub response_body: String,
    pub status_code: u16,
}

impl PreviewModel {
    pub fn from_context(dc: &DocContext) -> Self {
        let role_names = dc.role_names().to_vec();
        let endpoints: Vec<PreviewEndpoint> = dc
            .endpoints()
            .iter()
            .map(|endpoint| PreviewEndpoint {
                id: endpoint.id.clone(),
                method_up: endpoint.method.to_uppercase(),
                method_lo: endpoint.method.to_lowercase(),
                url_root: endpoint.root_path.clone(),
                url_path: endpoint.request_path.clone(),
                group: endpoint.group.clone(),
                summary: endpoint.summary.clone(),
                description: endpoint.description.clone(),
                headers: prepare_fields(endpoint.headers.as_deref()),
                parameters: prepare_fields(endpoint.parameters.as_deref()),
                request_body: prepare_fields(endpoint.request_body.as_deref()),
                response_body: prepare_fields(endpoint.response_body.as_deref()),
                usages: prepare_usages(&endpoint.usages),
                access: role_names
                    .iter()
                    .map(|role| {
                        dc.access(&endpoint.method, &endpoint.request_path, role)
                            .label()
                    })
                    .collect(),
            })
            .collect();

        PreviewModel {
            groups: create_groups(&endpoints),
            endpoints,
            role_names,
        }
    }

    pub fn find_endpoint(&self, id: &str) -> Option<&PreviewEndpoint> {
        self.endpoints.iter().find(|endpoint| endpoint.id == id)
    }
}

/// Groups sorted by name, endpoints inside ordered by method then path length
fn create_groups(endpoints: &[PreviewEndpoint]) -> Vec<PreviewGroup> {
    let mut groups: BTreeMap<&str, Vec<PreviewEndpoint>> = BTreeMap::new();
    for endpoint in endpoints {
        groups
            .entry(endpoint.group.as_str())
            .or_default()
            .push(endpoint.clone());
    }
    groups
        .into_iter()
        .map(|(name, mut endpoints)| {
            endpoints.sort_by_key(|e| (method_rank(&e.method_up), e.url_path.len()));
            PreviewGroup {
                name: name.to_uppercase(),
                endpoints,
            }
        })
        .collect()
}

fn method_rank(method: &str) -> u8 {
    match method {
        "POST" => 1,
        "PUT" => 2,
        "GET" => 3,
        "DELETE" => 4,
        _ => 5,
    }
}

fn prepare_fields(fields: Option<&[Field]>) -> Option<Vec<PreviewField>> {
    fields.map(|fields| {
        let mut rows = Vec::new();
        traverse_fields(fields, 0, &mut rows);
        rows
    })
}

fn traverse_fields(fields: &[Field], level: usize, rows: &mut Vec<PreviewField>) {
    for field in fields {
        let (mandatory, mandatory_lo) = if field.mandatory {
            ("Yes", "yes")
        } else {
            ("No", "no")
        };
        rows.push(PreviewField {
            indent: INDENT.repeat(level),
            name: field.json_name.clone(),
            json_type: field.json_type.to_string(),
            mandatory,
            mandatory_lo,
            description: field.description.clone(),
        });
        traverse_fields(&field.children, level + 1, rows);
    }
}

fn prepare_usages(usages: &[Usage]) -> Vec<PreviewUsage> {
    let mut usages: Vec<PreviewUsage> = usages
        .iter()
        .map(|usage| PreviewUsage {
            summary: usage.summary.clone(),
            description: usage.description.clone(),
            method_up: usage.method.to_uppercase(),
            method_lo: usage.method.to_lowercase(),
            url: usage.url.clone(),
            headers: usage.headers.iter().map(prepare_header).collect(),
            request_body: usage.request_body.clone(),
            response_body: usage.response_body.clone(),
            status_code: usage.status_code,
        })
        .collect();
    usages.sort_by_key(|usage| usage.status_code);
    usages
}

/// Long header values are cut and suffixed with their full length
fn prepare_header(header: &Header) -> PreviewHeader {
    let length = header.value.chars().count();
    let value = if length > MAX_PREVIEW_HEADER_LEN {
        let head: String = header.value.chars().take(MAX_PREVIEW_HEADER_LEN).collect();
        format!("{}[...]({})", head, length)
    } else {
        header.value.clone()
    };
    PreviewHeader {
        name: header.name.clone(),
        value,
    }
}
