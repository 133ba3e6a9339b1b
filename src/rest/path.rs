//! Request path preparation and header extraction

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

use crate::constants::VERSION_PLACEHOLDER;
use crate::doc::field::{ApiType, Kind, TypeInfo};
use crate::doc::model::Header;
use crate::error::{Error, Result};

/// Characters escaped in a path segment: everything except unreserved
/// characters and the sub-delimiters allowed inside a segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'=')
    .remove(b':')
    .remove(b'@');

/// A value sent with a request together with the description of its type
#[derive(Clone, Debug)]
pub struct Payload {
    pub info: TypeInfo,
    pub value: Value,
}

impl Payload {
    /// Captures `value`, `None` when it serializes to null
    pub fn of<T: ApiType + Serialize + ?Sized>(value: &T) -> Result<Option<Payload>> {
        let value = serde_json::to_value(value)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(Payload {
            info: T::type_info(),
            value,
        }))
    }

    /// Member values in declaration order, null values skipped
    ///
    /// Only optional members may be left out of the serialized object,
    /// any other documented member must be there under its JSON name.
    fn member_values(&self) -> Result<Vec<(&'static str, Kind, &Value)>> {
        let info = self.info.resolve();
        let Some(object) = self.value.as_object() else {
            return Ok(Vec::new());
        };
        let mut values = Vec::new();
        for member in info.members() {
            let member_info = member.type_info();
            let value = match object.get(member.json_name) {
                Some(value) => value,
                None if member_info.kind() == Kind::Indirect => continue,
                None => {
                    return Err(Error::MissingMember {
                        type_name: info.name().to_string(),
                        member: member.json_name.to_string(),
                    })
                }
            };
            if !value.is_null() {
                values.push((member.json_name, member_info.resolve().kind(), value));
            }
        }
        Ok(values)
    }
}

/// Replaces the API version placeholder
pub fn substitute_version(path: &str, version: &str) -> String {
    if version.is_empty() {
        return path.to_string();
    }
    path.replace(VERSION_PLACEHOLDER, version)
}

/// Builds the request path from a path template and request parameters
///
/// Each parameter fills every `{jsonName}` placeholder of the template. A
/// parameter without a placeholder is appended to the query string, in
/// declaration order.
pub fn prepare_request_path(path: &str, version: &str, params: Option<&Payload>) -> Result<String> {
    let mut path = substitute_version(path, version);
    let Some(params) = params else {
        return Ok(path);
    };
    let info = params.info.resolve();
    if info.kind() != Kind::Struct {
        return Err(Error::NonStructParameters {
            type_name: describe_kind(info),
        });
    }

    let mut first_parameter = true;
    for (name, _, value) in params.member_values()? {
        let text = value_text(value);
        let escaped = utf8_percent_encode(&text, PATH_SEGMENT).to_string();
        let placeholder = format!("{{{}}}", name);
        if path.contains(&placeholder) {
            path = path.replace(&placeholder, &escaped);
        } else {
            path.push(if first_parameter { '?' } else { '&' });
            path.push_str(name);
            path.push('=');
            path.push_str(&escaped);
            first_parameter = false;
        }
    }

    Ok(path)
}

/// Header names and values from a headers struct
///
/// Only string members with a value are sent, other members are ignored.
pub fn header_values(headers: &Payload) -> Result<Vec<Header>> {
    Ok(headers
        .member_values()?
        .into_iter()
        .filter(|(_, kind, _)| *kind == Kind::String)
        .filter_map(|(name, _, value)| value.as_str().map(|v| Header::new(name, v)))
        .collect())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn describe_kind(info: TypeInfo) -> String {
    match info.kind() {
        Kind::Sequence => String::from("sequence"),
        Kind::Unsupported(kind) => kind.to_string(),
        _ => info.name().to_string(),
    }
}
