//! Field extractor - turns the static shape of a type into a documented field tree
//!
//! Types describe themselves through [`ApiType`], usually derived with
//! `#[derive(ApiType)]`. The extractor walks those descriptions in member
//! declaration order and classifies every member into one of the JSON types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::OPTIONAL_PREFIX;
use crate::error::{Error, Result};

/// A type that can describe its own JSON shape
pub trait ApiType {
    fn type_info() -> TypeInfo;
}

/// Shape category of a described type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Struct,
    Sequence,
    String,
    Boolean,
    Number,
    /// Pointer-like wrapper, documented as the type it points to
    Indirect,
    /// No JSON counterpart, carries a human readable kind name
    Unsupported(&'static str),
}

/// Static description of a type, cheap to copy
///
/// Members and inner types are produced lazily so that self-referential
/// types can be described without infinite expansion.
#[derive(Clone, Copy)]
pub struct TypeInfo {
    kind: Kind,
    name: &'static str,
    /// Identity used to detect cycles, includes generic arguments
    key: &'static str,
    members: fn() -> Vec<Member>,
    inner: Option<fn() -> TypeInfo>,
}

fn no_members() -> Vec<Member> {
    Vec::new()
}

impl TypeInfo {
    pub fn structure(name: &'static str, members: fn() -> Vec<Member>) -> TypeInfo {
        TypeInfo {
            kind: Kind::Struct,
            name,
            key: name,
            members,
            inner: None,
        }
    }

    pub fn string(name: &'static str) -> TypeInfo {
        TypeInfo::scalar(Kind::String, name)
    }

    pub fn boolean(name: &'static str) -> TypeInfo {
        TypeInfo::scalar(Kind::Boolean, name)
    }

    pub fn number(name: &'static str) -> TypeInfo {
        TypeInfo::scalar(Kind::Number, name)
    }

    pub fn sequence(element: fn() -> TypeInfo) -> TypeInfo {
        TypeInfo {
            kind: Kind::Sequence,
            name: "",
            key: "",
            members: no_members,
            inner: Some(element),
        }
    }

    pub fn indirect(target: fn() -> TypeInfo) -> TypeInfo {
        TypeInfo {
            kind: Kind::Indirect,
            name: "",
            key: "",
            members: no_members,
            inner: Some(target),
        }
    }

    pub fn unsupported(kind: &'static str) -> TypeInfo {
        TypeInfo::scalar(Kind::Unsupported(kind), "")
    }

    fn scalar(kind: Kind, name: &'static str) -> TypeInfo {
        TypeInfo {
            kind,
            name,
            key: name,
            members: no_members,
            inner: None,
        }
    }

    /// Replaces the identity of the type, `name` stays the displayed one
    ///
    /// Derived descriptions pass `std::any::type_name::<Self>()` so that
    /// `Page<User>` and `Page<Page<User>>` are told apart.
    pub fn keyed(mut self, key: &'static str) -> TypeInfo {
        self.key = key;
        self
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Declared type name, empty for anonymous shapes such as sequences
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Struct members in declaration order
    pub fn members(&self) -> Vec<Member> {
        (self.members)()
    }

    /// Element type of a sequence or target of an indirection
    pub fn inner(&self) -> Option<TypeInfo> {
        self.inner.map(|inner| inner())
    }

    /// Follows indirections down to the described type
    pub fn resolve(self) -> TypeInfo {
        let mut info = self;
        while info.kind == Kind::Indirect {
            match info.inner() {
                Some(target) => info = target,
                None => break,
            }
        }
        info
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .finish()
    }
}

/// One declared member of a struct
#[derive(Clone, Copy, Debug)]
pub struct Member {
    pub field_name: &'static str,
    pub json_name: &'static str,
    /// Raw description text, may start with the optional marker
    pub description: &'static str,
    type_info: fn() -> TypeInfo,
}

impl Member {
    pub fn new(
        field_name: &'static str,
        json_name: &'static str,
        description: &'static str,
        type_info: fn() -> TypeInfo,
    ) -> Member {
        Member {
            field_name,
            json_name,
            description,
            type_info,
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }
}

/// JSON type of a documented field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Object,
    Array,
    String,
    Boolean,
    Number,
}

impl JsonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::String => "string",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A struct member documented as API data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Member name in the Rust struct
    pub field_name: String,
    /// Declared type name, element type name for arrays
    pub field_type: String,
    pub json_name: String,
    pub json_type: JsonType,
    pub mandatory: bool,
    /// Set when descending would repeat the enclosing type, children stay empty
    pub recursive: bool,
    pub description: String,
    pub children: Vec<Field>,
}

/// Extracts the field tree of `T`
///
/// Types other than structs (after following indirections) have no fields.
pub fn parse_type<T: ApiType + ?Sized>() -> Result<Vec<Field>> {
    parse_fields(T::type_info(), "")
}

/// Extracts the field tree of the type of `value`
pub fn parse_value<T: ApiType + ?Sized>(_value: &T) -> Result<Vec<Field>> {
    parse_type::<T>()
}

/// Extracts the fields of `info`, `parent_type` being the key of the struct
/// whose member led here (empty at the top level)
pub fn parse_fields(info: TypeInfo, parent_type: &str) -> Result<Vec<Field>> {
    let mut ancestors = Vec::new();
    walk(info, parent_type, &mut ancestors)
}

fn walk(info: TypeInfo, parent_type: &str, ancestors: &mut Vec<&'static str>) -> Result<Vec<Field>> {
    let info = info.resolve();
    if info.kind != Kind::Struct {
        return Ok(Vec::new());
    }

    let type_key = info.key;
    ancestors.push(type_key);
    let mut fields = Vec::new();
    for member in info.members() {
        let member_info = member.type_info();
        let mut field = create_field(&member, member_info)?;
        let descend_into = match field.json_type {
            JsonType::Object => Some(member_info),
            JsonType::Array => member_info.resolve().inner(),
            _ => None,
        };
        if let Some(child) = descend_into {
            let field_key = child.resolve().key;
            if is_recursive(parent_type, type_key, field_key, ancestors) {
                field.recursive = true;
            } else {
                field.children = walk(child, type_key, ancestors)?;
            }
        }
        fields.push(field);
    }
    ancestors.pop();

    Ok(fields)
}

/// A member repeats its enclosing type when the enclosing struct was itself
/// reached through a member of the same type. Types alternating with each
/// other are cut once a type shows up twice in the chain of ancestors.
fn is_recursive(parent_key: &str, type_key: &str, field_key: &str, ancestors: &[&str]) -> bool {
    if parent_key == type_key && type_key == field_key {
        return true;
    }
    !field_key.is_empty() && ancestors.iter().filter(|a| **a == field_key).count() >= 2
}

fn create_field(member: &Member, info: TypeInfo) -> Result<Field> {
    let (json_type, field_type) = classify(info).map_err(|kind| Error::UnsupportedKind {
        field: member.field_name.to_string(),
        kind,
    })?;
    let (mandatory, description) = match member.description.strip_prefix(OPTIONAL_PREFIX) {
        Some(rest) => (false, rest),
        None => (true, member.description),
    };

    Ok(Field {
        field_name: member.field_name.to_string(),
        field_type: field_type.to_string(),
        json_name: member.json_name.to_string(),
        json_type,
        mandatory,
        recursive: false,
        description: description.to_string(),
        children: Vec::new(),
    })
}

/// JSON type and comparable type name of a member, or the unsupported kind
fn classify(info: TypeInfo) -> std::result::Result<(JsonType, &'static str), &'static str> {
    let info = info.resolve();
    match info.kind {
        Kind::Struct => Ok((JsonType::Object, info.name)),
        Kind::Sequence => {
            let element = info.inner().map(|e| e.resolve().name).unwrap_or("");
            Ok((JsonType::Array, element))
        }
        Kind::String => Ok((JsonType::String, info.name)),
        Kind::Boolean => Ok((JsonType::Boolean, info.name)),
        Kind::Number => Ok((JsonType::Number, info.name)),
        Kind::Unsupported(kind) => Err(kind),
        Kind::Indirect => Err("dangling pointer"),
    }
}

// ============================================================================
// Built-in descriptions
// ============================================================================

macro_rules! impl_number {
    ($($ty:ty),*) => {
        $(
            impl ApiType for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::number(stringify!($ty))
                }
            }
        )*
    };
}

impl_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl ApiType for String {
    fn type_info() -> TypeInfo {
        TypeInfo::string("String")
    }
}

impl ApiType for str {
    fn type_info() -> TypeInfo {
        TypeInfo::string("str")
    }
}

impl ApiType for char {
    fn type_info() -> TypeInfo {
        TypeInfo::string("char")
    }
}

impl ApiType for bool {
    fn type_info() -> TypeInfo {
        TypeInfo::boolean("bool")
    }
}

impl<T: ApiType> ApiType for Vec<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence(T::type_info)
    }
}

impl<T: ApiType> ApiType for VecDeque<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence(T::type_info)
    }
}

impl<T: ApiType> ApiType for [T] {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence(T::type_info)
    }
}

impl<T: ApiType, const N: usize> ApiType for [T; N] {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence(T::type_info)
    }
}

impl<T: ApiType, S> ApiType for HashSet<T, S> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence(T::type_info)
    }
}

impl<T: ApiType> ApiType for BTreeSet<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::sequence(T::type_info)
    }
}

impl<T: ApiType> ApiType for Option<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::indirect(T::type_info)
    }
}

impl<T: ApiType + ?Sized> ApiType for Box<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::indirect(T::type_info)
    }
}

impl<T: ApiType + ?Sized> ApiType for Rc<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::indirect(T::type_info)
    }
}

impl<T: ApiType + ?Sized> ApiType for Arc<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::indirect(T::type_info)
    }
}

impl<T: ApiType + ?Sized> ApiType for &T {
    fn type_info() -> TypeInfo {
        TypeInfo::indirect(T::type_info)
    }
}

impl<T: ApiType + ?Sized> ApiType for &mut T {
    fn type_info() -> TypeInfo {
        TypeInfo::indirect(T::type_info)
    }
}

impl<K, V, S> ApiType for HashMap<K, V, S> {
    fn type_info() -> TypeInfo {
        TypeInfo::unsupported("map")
    }
}

impl<K, V> ApiType for BTreeMap<K, V> {
    fn type_info() -> TypeInfo {
        TypeInfo::unsupported("map")
    }
}

impl ApiType for serde_json::Value {
    fn type_info() -> TypeInfo {
        TypeInfo::unsupported("dynamic value")
    }
}

impl ApiType for () {
    fn type_info() -> TypeInfo {
        TypeInfo::unsupported("unit")
    }
}
