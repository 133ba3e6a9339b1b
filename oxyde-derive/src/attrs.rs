//! Attribute parsing for `#[api(...)]` and the subset of `#[serde(...)]` that affects JSON names

use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitStr, Token};

/// Settings collected from the attributes of one field
#[derive(Default)]
pub struct FieldAttrs {
    pub description: Option<String>,
    pub serde_rename: Option<String>,
    pub skip: bool,
}

/// Settings collected from the attributes of the container
#[derive(Default)]
pub struct ContainerAttrs {
    pub rename_all: Option<RenameRule>,
}

/// One argument of `#[api(...)]`: a bare description or `key = "value"`
enum ApiArg {
    Description(LitStr),
    Named(Ident, LitStr),
}

impl Parse for ApiArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(ApiArg::Description(input.parse()?));
        }
        let key: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        let value: LitStr = input.parse()?;
        Ok(ApiArg::Named(key, value))
    }
}

pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();

    for attr in attrs {
        if attr.path().is_ident("api") {
            let args = attr.parse_args_with(Punctuated::<ApiArg, Token![,]>::parse_terminated)?;
            for arg in args {
                match arg {
                    ApiArg::Description(text) => out.description = Some(text.value()),
                    ApiArg::Named(key, _) if key == "name" => {
                        return Err(syn::Error::new_spanned(
                            key,
                            "the JSON name comes from serde, use `#[serde(rename = \"..\")]`",
                        ))
                    }
                    ApiArg::Named(key, value) if key == "description" => {
                        out.description = Some(value.value())
                    }
                    ApiArg::Named(key, _) => {
                        return Err(syn::Error::new_spanned(
                            key,
                            "unknown api attribute, expected `description`",
                        ))
                    }
                }
            }
        } else if attr.path().is_ident("serde") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    // `rename(serialize = "..")` is left to serde
                    if meta.input.peek(Token![=]) {
                        let value: LitStr = meta.value()?.parse()?;
                        out.serde_rename = Some(value.value());
                    } else {
                        skip_meta(&meta)?;
                    }
                } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    out.skip = true;
                } else if meta.path.is_ident("flatten") {
                    return Err(meta.error("flattened members cannot be documented by ApiType"));
                } else {
                    skip_meta(&meta)?;
                }
                Ok(())
            })?;
        }
    }

    Ok(out)
}

pub fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") && meta.input.peek(Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                let rule = RenameRule::parse(&value.value())
                    .ok_or_else(|| meta.error("unsupported rename_all rule"))?;
                out.rename_all = Some(rule);
            } else {
                skip_meta(&meta)?;
            }
            Ok(())
        })?;
    }

    Ok(out)
}

/// Consumes the value of a serde meta item we do not interpret
fn skip_meta(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

/// Serde `rename_all` rules applied to snake_case field identifiers
#[derive(Clone, Copy)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn parse(rule: &str) -> Option<RenameRule> {
        match rule {
            "lowercase" => Some(RenameRule::Lower),
            "UPPERCASE" => Some(RenameRule::Upper),
            "PascalCase" => Some(RenameRule::Pascal),
            "camelCase" => Some(RenameRule::Camel),
            "snake_case" => Some(RenameRule::Snake),
            "SCREAMING_SNAKE_CASE" => Some(RenameRule::ScreamingSnake),
            "kebab-case" => Some(RenameRule::Kebab),
            "SCREAMING-KEBAB-CASE" => Some(RenameRule::ScreamingKebab),
            _ => None,
        }
    }

    pub fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Lower | RenameRule::Snake => field.to_ascii_lowercase(),
            RenameRule::Upper | RenameRule::ScreamingSnake => field.to_ascii_uppercase(),
            RenameRule::Pascal => pascal_case(field),
            RenameRule::Camel => {
                let pascal = pascal_case(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            RenameRule::Kebab => field.replace('_', "-"),
            RenameRule::ScreamingKebab => field.replace('_', "-").to_ascii_uppercase(),
        }
    }
}

fn pascal_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut capitalize = true;
    for c in field.chars() {
        if c == '_' {
            capitalize = true;
        } else if capitalize {
            out.push(c.to_ascii_uppercase());
            capitalize = false;
        } else {
            out.push(c);
        }
    }
    out
}
