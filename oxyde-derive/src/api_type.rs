use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields};

use crate::attrs::{parse_container_attrs, parse_field_attrs};

pub fn derive_api_type_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(mut input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let type_name = name.unraw().to_string();

    let body = match &input.data {
        Data::Struct(data) => {
            let fields = match &data.fields {
                Fields::Named(named) => &named.named,
                _ => {
                    return Err(syn::Error::new_spanned(
                        name,
                        "ApiType can only be derived for structs with named fields",
                    ))
                }
            };
            let container = parse_container_attrs(&input.attrs)?;

            let mut members = Vec::with_capacity(fields.len());
            for field in fields {
                let attrs = parse_field_attrs(&field.attrs)?;
                if attrs.skip {
                    continue;
                }
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let field_name = ident.unraw().to_string();
                // Serde decides the wire name, the docs follow it
                let json_name = attrs.serde_rename.unwrap_or_else(|| match container.rename_all {
                    Some(rule) => rule.apply(&field_name),
                    None => field_name.clone(),
                });
                let description = attrs.description.unwrap_or_default();
                let ty = &field.ty;
                members.push(quote! {
                    ::oxyde::Member::new(
                        #field_name,
                        #json_name,
                        #description,
                        <#ty as ::oxyde::ApiType>::type_info,
                    )
                });
            }

            quote! {
                ::oxyde::TypeInfo::structure(#type_name, || ::std::vec![#(#members),*])
                    .keyed(::std::any::type_name::<Self>())
            }
        }
        Data::Enum(data) => {
            if let Some(variant) = data.variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "ApiType can only be derived for enums whose variants are all unit variants",
                ));
            }
            quote! {
                ::oxyde::TypeInfo::string(#type_name)
            }
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "ApiType cannot be derived for unions",
            ))
        }
    };

    // Every type parameter must itself describe its JSON shape
    let params: Vec<_> = input.generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = input.generics.make_where_clause();
    for param in params {
        where_clause
            .predicates
            .push(parse_quote!(#param: ::oxyde::ApiType));
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::oxyde::ApiType for #name #ty_generics #where_clause {
            fn type_info() -> ::oxyde::TypeInfo {
                #body
            }
        }
    })
}
