//! Documentation layer - field trees, endpoint model and the collecting context

pub mod context;
pub mod field;
pub mod model;

pub use context::{CollectMode, DocContext, Exchange};
pub use field::{parse_fields, parse_type, parse_value, ApiType, Field, JsonType, Kind, Member, TypeInfo};
pub use model::{Access, Endpoint, Header, Usage};
