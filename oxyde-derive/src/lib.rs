//! # oxyde-derive
//!
//! `#[derive(ApiType)]` for the `oxyde` crate.
//!
//! The derive describes the JSON shape of a type so the documentation
//! collector can turn parameters, headers and bodies into field trees
//! without runtime reflection.
//!
//! ```ignore
//! #[derive(Serialize, ApiType)]
//! #[serde(rename_all = "camelCase")]
//! struct CreateUser {
//!     #[api("Login name of the new user.")]
//!     login: String,
//!     #[api("?Display name, login is used when absent.")]
//!     display_name: Option<String>,
//! }
//! ```

use proc_macro::TokenStream;

mod api_type;
mod attrs;

/// Derives `oxyde::ApiType` for structs with named fields and unit-only enums.
///
/// Field attributes:
/// - `#[api("description")]`: description text, a leading `?` marks the field optional
/// - `#[serde(rename = "...")]`, `#[serde(skip)]` are honoured, the JSON name always
///   matches what serde writes
/// - `#[serde(flatten)]` is rejected
///
/// Container attributes:
/// - `#[serde(rename_all = "...")]` is honoured for field names
#[proc_macro_derive(ApiType, attributes(api))]
pub fn api_type_derive(input: TokenStream) -> TokenStream {
    api_type::derive_api_type_impl(input)
}
