//! Implementation of the `#[derive(ActionEnum)]` macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

/// Main implementation of the ActionEnum derive macro.
pub fn action_enum_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let enum_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "ActionEnum cannot be derived for generic enums",
        ));
    }

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(Error::new(
                input.span(),
                "ActionEnum can only be derived for enums",
            ))
        }
    };

    if variants.is_empty() {
        return Err(Error::new(
            input.span(),
            "ActionEnum requires at least one variant",
        ));
    }

    let mut names = Vec::new();
    let mut idents = Vec::new();
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "ActionEnum variants cannot carry fields",
            ));
        }
        names.push(variant.ident.to_string());
        idents.push(&variant.ident);
    }

    let indices: Vec<usize> = (0..idents.len()).collect();

    Ok(quote! {
        impl ::actuate::ActionEnum for #enum_name {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn from_index(index: usize) -> ::core::option::Option<Self> {
                match index {
                    #(#indices => ::core::option::Option::Some(#enum_name::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn index(&self) -> usize {
                match self {
                    #(#enum_name::#idents => #indices,)*
                }
            }
        }

        impl ::actuate::ActionArg for #enum_name {
            const SEMANTIC_TYPE: ::actuate::SemanticType = ::actuate::SemanticType::Enum;

            fn variants() -> &'static [&'static str] {
                <Self as ::actuate::ActionEnum>::VARIANTS
            }

            fn from_value(value: ::actuate::Value) -> ::core::option::Option<Self> {
                ::actuate::__private::enum_from_value(value)
            }

            fn into_value(self) -> ::actuate::Value {
                ::actuate::Value::Enum(
                    ::std::string::ToString::to_string(::actuate::ActionEnum::variant_name(&self)),
                )
            }

            fn parse_arg(raw: &str) -> ::core::option::Option<Self> {
                ::actuate::__private::parse_enum(raw)
            }
        }

        impl ::actuate::ActionOutput for #enum_name {
            fn render_output(&self) -> ::std::string::String {
                ::std::string::ToString::to_string(::actuate::ActionEnum::variant_name(self))
            }
        }
    })
}
