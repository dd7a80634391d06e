mod mapped;

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::DeriveInput;

/// Derives `Mapped` for a struct with named fields, or `ToValue` for an enum whose variants are
/// all units.
#[proc_macro_derive(Mapped, attributes(mapjson))]
pub fn derive_mapped(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    mapped::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Describes how a struct is mapped.
struct ClassRepr {
    /// Whether writes rooted at this type deduplicate objects.
    deduplicate: bool,
}

/// Describes how an enum variant is written.
struct VariantRepr {
    /// The name of this variant in JSON.
    name: String,

    /// The position of this variant within the enum.
    index: usize,
}

/// Describes how a field is mapped.
enum FieldRepr {
    /// The field is not written.
    Skipped,

    /// The field holds a map whose entries are appended after the named properties.
    Any,

    /// The field is written as a named property.
    Named {
        /// The name of the property in JSON.
        name: String,

        /// The minimum configured version for which the property is written.
        version: Option<u32>,

        /// If `true`, `null` is written even when nulls are skipped.
        nillable: bool,

        /// Properties of the nested value that are left out.
        ignore_nested: Vec<String>,
    },
}

fn unknown_attribute(meta: &syn::meta::ParseNestedMeta, kind: &str) -> syn::Error {
    let path = meta.path.to_token_stream().to_string().replace(' ', "");
    meta.error(format_args!("unknown mapjson {} attribute `{}`", kind, path))
}

impl ClassRepr {
    /// Gets the representation for a struct with the given attributes.
    pub fn get(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut deduplicate = false;
        for attr in attrs.iter() {
            if attr.path().is_ident("mapjson") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("deduplicate") {
                        deduplicate = true;
                    } else {
                        return Err(unknown_attribute(&meta, "struct"));
                    }
                    Ok(())
                })?;
            }
        }
        Ok(ClassRepr { deduplicate })
    }
}

impl VariantRepr {
    /// Gets the representation for the given variant.
    pub fn get(variant: &syn::Variant, index: usize) -> syn::Result<Self> {
        let mut rename = None;
        for attr in variant.attrs.iter() {
            if attr.path().is_ident("mapjson") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        let lit: syn::LitStr = meta.value()?.parse()?;
                        rename = Some(lit.value());
                    } else {
                        return Err(unknown_attribute(&meta, "variant"));
                    }
                    Ok(())
                })?;
            }
        }
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Mapped enums may only have unit variants",
            ));
        }
        Ok(VariantRepr {
            name: rename.unwrap_or_else(|| variant.ident.to_string()),
            index,
        })
    }
}

impl FieldRepr {
    /// Gets the representation for the given named field.
    pub fn get(field: &syn::Field, ident: &syn::Ident) -> syn::Result<Self> {
        let mut skip = false;
        let mut any = false;
        let mut rename = None;
        let mut version = None;
        let mut nillable = false;
        let mut ignore_nested = Vec::new();
        for attr in field.attrs.iter() {
            if attr.path().is_ident("mapjson") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        skip = true;
                    } else if meta.path.is_ident("any") {
                        any = true;
                    } else if meta.path.is_ident("rename") {
                        let lit: syn::LitStr = meta.value()?.parse()?;
                        rename = Some(lit.value());
                    } else if meta.path.is_ident("version") {
                        let lit: syn::LitInt = meta.value()?.parse()?;
                        version = Some(lit.base10_parse()?);
                    } else if meta.path.is_ident("nillable") {
                        nillable = true;
                    } else if meta.path.is_ident("ignore_nested") {
                        let lit: syn::LitStr = meta.value()?.parse()?;
                        ignore_nested.extend(
                            lit.value()
                                .split(',')
                                .map(str::trim)
                                .filter(|name| !name.is_empty())
                                .map(str::to_owned),
                        );
                    } else {
                        return Err(unknown_attribute(&meta, "field"));
                    }
                    Ok(())
                })?;
            }
        }
        Ok(if skip {
            FieldRepr::Skipped
        } else if any {
            FieldRepr::Any
        } else {
            FieldRepr::Named {
                name: rename.unwrap_or_else(|| {
                    let name = ident.to_string();
                    name.strip_prefix("r#").map(str::to_owned).unwrap_or(name)
                }),
                version,
                nillable,
                ignore_nested,
            }
        })
    }
}

/// Builds an empty `where` clause if the input has none.
fn where_clause(generics: &syn::Generics) -> syn::WhereClause {
    generics.where_clause.clone().unwrap_or(syn::WhereClause {
        where_token: Default::default(),
        predicates: syn::punctuated::Punctuated::new(),
    })
}

/// The path to the runtime crate.
fn krate() -> TokenStream {
    quote! { ::mapjson }
}
