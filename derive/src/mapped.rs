use super::*;

/// Generates a `Mapped` implementation for a struct, or a `ToValue` implementation for an enum.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    match &input.data {
        syn::Data::Struct(st) => expand_struct(input, st),
        syn::Data::Enum(en) => expand_enum(input, en),
        syn::Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "Mapped cannot be derived for unions",
        )),
    }
}

fn expand_struct(input: &DeriveInput, st: &syn::DataStruct) -> syn::Result<TokenStream> {
    let mj = krate();
    let syn::Fields::Named(fields) = &st.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Mapped requires a struct with named fields",
        ));
    };
    let class = ClassRepr::get(&input.attrs)?;
    let mut where_clause = where_clause(&input.generics);
    where_clause
        .predicates
        .push(syn::parse_quote! { Self: 'static });

    let mut builder = Vec::new();
    let mut has_any = false;
    for field in fields.named.iter() {
        // Named fields always have an identifier
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        match FieldRepr::get(field, ident)? {
            FieldRepr::Skipped => continue,
            FieldRepr::Any => {
                if has_any {
                    return Err(syn::Error::new_spanned(
                        field,
                        "only one field may be marked `any`",
                    ));
                }
                has_any = true;
                builder.push(quote! {
                    .any_property::<Self>(|this: &Self| #mj::ToValue::to_value(&this.#ident))
                });
            }
            FieldRepr::Named {
                name,
                version,
                nillable,
                ignore_nested,
            } => {
                let mut property = quote! {
                    #mj::Property::of::<Self, #ty>(#name, |this: &Self| &this.#ident)
                };
                if let Some(version) = version {
                    property.extend(quote! { .version(#version) });
                }
                if nillable {
                    property.extend(quote! { .nillable(true) });
                }
                if !ignore_nested.is_empty() {
                    property.extend(quote! { .ignore_nested([#(#ignore_nested),*]) });
                }
                builder.push(quote! { .property(#property) });
            }
        }
        where_clause
            .predicates
            .push(syn::parse_quote! { #ty: #mj::ToValue });
    }
    if class.deduplicate {
        builder.push(quote! { .deduplicate_objects(true) });
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #mj::Mapped for #ident #ty_generics #where_clause {
            fn class_mapping() -> #mj::ClassMapping {
                #mj::ClassMapping::new::<Self>()
                    #(#builder)*
            }
        }
    })
}

fn expand_enum(input: &DeriveInput, en: &syn::DataEnum) -> syn::Result<TokenStream> {
    let mj = krate();
    let variants = en
        .variants
        .iter()
        .enumerate()
        .map(|(index, variant)| VariantRepr::get(variant, index))
        .collect::<syn::Result<Vec<_>>>()?;
    let mut where_clause = where_clause(&input.generics);
    where_clause
        .predicates
        .push(syn::parse_quote! { Self: 'static });

    let variant_ident = en.variants.iter().map(|v| &v.ident);
    let variant_name = variants.iter().map::<&str, _>(|v| v.name.as_ref());
    let variant_index = variants.iter().map(|v| v.index);
    let ident = &input.ident;
    let (impl_generics, ty_generics, _) = input.generics.split_for_impl();
    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #mj::ToValue for #ident #ty_generics #where_clause {
            const KIND: #mj::PropertyKind = #mj::PropertyKind::Object;
            fn to_value(&self) -> #mj::Value {
                let constant = match self {
                    #(
                        Self::#variant_ident =>
                            #mj::EnumConstant::new::<Self>(#variant_name, #variant_index),
                    )*
                };
                #mj::Value::Enum(constant)
            }
        }
    })
}
