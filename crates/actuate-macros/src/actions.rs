//! `#[actions]` attribute macro.
//!
//! Applied to an inherent `impl` block, it turns every `pub fn` without a
//! receiver into an action and generates two things from the same parsed
//! signatures:
//!
//! 1. `Type::catalog()`, building an `actuate::Catalog` whose invokers unpack
//!    bound values and call the function
//! 2. optionally, a unit struct implementing `actuate::Dispatcher` with one
//!    `match` arm per action, where extraction, coercion and the call are
//!    written out as straight-line code
//!
//! ```rust,ignore
//! #[actions(dispatcher = TextDispatcher)]
//! impl Text {
//!     pub fn cut_string(input: String, max_length: i32, #[param(default = "")] suffix: String) -> String { .. }
//! }
//!
//! // Generates (abridged):
//! // impl Text {
//! //     pub fn catalog() -> Result<actuate::Catalog, actuate::ConfigError> { .. }
//! // }
//! //
//! // pub struct TextDispatcher;
//! // impl actuate::Dispatcher for TextDispatcher {
//! //     fn dispatch(&self, action: &str, args: &Arguments) -> Result<String, DispatchError> {
//! //         match action {
//! //             "CutString" => {
//! //                 let input: String = match lookup(args, "input") { .. };
//! //                 let max_length: i32 = match lookup(args, "maxLength") { .. };
//! //                 let suffix: String = match lookup(args, "suffix") {
//! //                     Some(raw) => ..,
//! //                     None => "".into(),
//! //                 };
//! //                 Ok(render_output(&Text::cut_string(input, max_length, suffix)))
//! //             }
//! //             _ => Err(DispatchError::ActionNotFound(action.to_owned())),
//! //         }
//! //     }
//! // }
//! ```
//!
//! # Naming
//!
//! | Rust | Action / parameter name |
//! |------|-------------------------|
//! | `fn cut_string` | `CutString` |
//! | `max_length: i32` | `maxLength` |
//! | `#[action(name = "X")]` | `X` |
//! | `#[param(name = "x")]` | `x` |

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Meta, Pat, Result,
    ReturnType, Token, Type, UnOp, Visibility,
};

/// Arguments of `#[actions(...)]`.
struct ActionsArgs {
    dispatcher: Option<Ident>,
}

impl Parse for ActionsArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = ActionsArgs { dispatcher: None };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;
        for meta in content {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("dispatcher") => match &nv.value {
                    Expr::Path(p) if p.path.get_ident().is_some() => {
                        args.dispatcher = p.path.get_ident().cloned();
                    }
                    other => return Err(Error::new(other.span(), "expected a type name")),
                },
                other => {
                    return Err(Error::new(
                        other.span(),
                        "unknown attribute, expected `dispatcher = Name`",
                    ))
                }
            }
        }

        Ok(args)
    }
}

/// `#[action(skip)]` / `#[action(name = "X")]`
#[derive(Default)]
struct ActionAttrs {
    skip: bool,
    name: Option<String>,
}

/// `#[param(name = "x", default = expr)]`
#[derive(Default)]
struct ParamAttrs {
    name: Option<String>,
    default: Option<Expr>,
}

struct ParamInfo {
    ident: Ident,
    name: String,
    ty: Type,
    default: Option<Expr>,
}

struct ActionInfo {
    fn_name: Ident,
    name: String,
    params: Vec<ParamInfo>,
    fallible: bool,
}

fn string_value(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            syn::Lit::Str(s) => Ok(s.value()),
            _ => Err(Error::new(expr.span(), "expected string literal")),
        },
        _ => Err(Error::new(expr.span(), "expected string literal")),
    }
}

fn parse_action_attrs(attrs: &[Attribute]) -> Result<ActionAttrs> {
    let mut parsed = ActionAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("action")) {
        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match meta {
                Meta::Path(p) if p.is_ident("skip") => parsed.skip = true,
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    parsed.name = Some(string_value(&nv.value)?);
                }
                other => {
                    return Err(Error::new(
                        other.span(),
                        "unknown attribute, expected `skip` or `name`",
                    ))
                }
            }
        }
    }
    Ok(parsed)
}

fn parse_param_attrs(attrs: &[Attribute]) -> Result<ParamAttrs> {
    let mut parsed = ParamAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("param")) {
        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    parsed.name = Some(string_value(&nv.value)?);
                }
                Meta::NameValue(nv) if nv.path.is_ident("default") => {
                    if !is_constant_default(&nv.value) {
                        return Err(Error::new(
                            nv.value.span(),
                            "parameter defaults must be constant: a literal, a path, or a negated literal",
                        ));
                    }
                    parsed.default = Some(nv.value);
                }
                other => {
                    return Err(Error::new(
                        other.span(),
                        "unknown attribute, expected `name` or `default`",
                    ))
                }
            }
        }
    }
    Ok(parsed)
}

/// Defaults are expanded into both the catalog and every generated call,
/// so they must evaluate to the same value each time.
fn is_constant_default(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(_) | Expr::Path(_) => true,
        Expr::Unary(unary) => {
            matches!(unary.op, UnOp::Neg(_)) && matches!(unary.expr.as_ref(), Expr::Lit(_))
        }
        Expr::Paren(inner) => is_constant_default(&inner.expr),
        Expr::Group(inner) => is_constant_default(&inner.expr),
        _ => false,
    }
}

/// `cut_string` → `CutString`
pub(crate) fn to_pascal_case(name: &str) -> String {
    name.trim_start_matches("r#")
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `max_length` → `maxLength`
pub(crate) fn to_camel_case(name: &str) -> String {
    let pascal = to_pascal_case(name);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check if the return type is `Result<..>`
fn is_result_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Result";
        }
    }
    false
}

fn analyze(method: &ImplItemFn, attrs: ActionAttrs) -> Result<ActionInfo> {
    let sig = &method.sig;

    if sig.asyncness.is_some() {
        return Err(Error::new(sig.span(), "actions cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new(sig.generics.span(), "actions cannot be generic"));
    }

    let fallible = match &sig.output {
        ReturnType::Default => {
            return Err(Error::new(
                sig.span(),
                "actions must return a value that renders to text",
            ))
        }
        ReturnType::Type(_, ty) => is_result_type(ty),
    };

    let mut params = Vec::new();
    for input in &sig.inputs {
        let pat_type = match input {
            FnArg::Typed(pat_type) => pat_type,
            FnArg::Receiver(_) => {
                return Err(Error::new(
                    input.span(),
                    "actions cannot take self; mark the method #[action(skip)]",
                ))
            }
        };

        let ident = match pat_type.pat.as_ref() {
            Pat::Ident(pat) => pat.ident.clone(),
            other => {
                return Err(Error::new(
                    other.span(),
                    "expected identifier pattern for parameter",
                ))
            }
        };

        let attrs = parse_param_attrs(&pat_type.attrs)?;
        params.push(ParamInfo {
            name: attrs
                .name
                .unwrap_or_else(|| to_camel_case(&ident.to_string())),
            ident,
            ty: (*pat_type.ty).clone(),
            default: attrs.default,
        });
    }

    Ok(ActionInfo {
        fn_name: sig.ident.clone(),
        name: attrs
            .name
            .unwrap_or_else(|| to_pascal_case(&sig.ident.to_string())),
        params,
        fallible,
    })
}

fn generate_descriptor(self_ty: &Type, action: &ActionInfo) -> TokenStream {
    let action_name = &action.name;
    let fn_name = &action.fn_name;

    let descriptors = action.params.iter().map(|p| {
        let name = &p.name;
        let ty = &p.ty;
        match &p.default {
            Some(default) => quote! {
                ::actuate::ParameterDescriptor::of::<#ty>(#name).with_default(
                    ::actuate::ActionArg::into_value(::core::convert::Into::<#ty>::into(#default))
                )
            },
            None => quote! { ::actuate::ParameterDescriptor::of::<#ty>(#name) },
        }
    });

    let takes = action.params.iter().map(|p| {
        let ident = &p.ident;
        let name = &p.name;
        let ty = &p.ty;
        quote! {
            let #ident: #ty = ::actuate::__private::take_arg::<#ty>(&mut __values, #action_name, #name)?;
        }
    });

    let idents = action.params.iter().map(|p| &p.ident);
    let call = if action.fallible {
        quote! { <#self_ty>::#fn_name(#(#idents),*)? }
    } else {
        quote! { <#self_ty>::#fn_name(#(#idents),*) }
    };

    quote! {
        ::actuate::ActionDescriptor::new(
            #action_name,
            ::std::vec![#(#descriptors),*],
            |__args: ::std::vec::Vec<::actuate::Value>| -> ::actuate::__private::anyhow::Result<::actuate::Value> {
                #[allow(unused_mut, unused_variables)]
                let mut __values = __args.into_iter();
                #(#takes)*
                let __ret = #call;
                ::core::result::Result::Ok(::actuate::ActionArg::into_value(__ret))
            },
        )
    }
}

fn coerce_or_fail(action: &str, param: &ParamInfo) -> TokenStream {
    let name = &param.name;
    let ty = &param.ty;
    quote! {
        match <#ty as ::actuate::ActionArg>::parse_arg(__raw) {
            ::core::option::Option::Some(__v) => __v,
            ::core::option::Option::None => {
                return ::core::result::Result::Err(::actuate::DispatchError::coercion_failed(
                    #action,
                    #name,
                    <#ty as ::actuate::ActionArg>::SEMANTIC_TYPE,
                    __raw,
                ))
            }
        }
    }
}

fn generate_call(self_ty: &Type, action: &ActionInfo) -> TokenStream {
    let action_name = &action.name;
    let fn_name = &action.fn_name;
    let idents = action.params.iter().map(|p| &p.ident);

    if action.fallible {
        quote! {
            match <#self_ty>::#fn_name(#(#idents),*) {
                ::core::result::Result::Ok(__ret) => {
                    ::core::result::Result::Ok(::actuate::ActionOutput::render_output(&__ret))
                }
                ::core::result::Result::Err(__e) => ::core::result::Result::Err(
                    ::actuate::DispatchError::invocation_failed(#action_name, __e),
                ),
            }
        }
    } else {
        quote! {
            let __ret = <#self_ty>::#fn_name(#(#idents),*);
            ::core::result::Result::Ok(::actuate::ActionOutput::render_output(&__ret))
        }
    }
}

fn generate_named_arm(self_ty: &Type, action: &ActionInfo) -> TokenStream {
    let action_name = &action.name;

    let extractions = action.params.iter().map(|p| {
        let ident = &p.ident;
        let name = &p.name;
        let ty = &p.ty;
        let coerce = coerce_or_fail(action_name, p);
        let fallback = match &p.default {
            Some(default) => quote! { ::core::convert::Into::<#ty>::into(#default) },
            None => quote! {
                match <#ty as ::actuate::ActionArg>::absent() {
                    ::core::option::Option::Some(__v) => __v,
                    ::core::option::Option::None => {
                        return ::core::result::Result::Err(
                            ::actuate::DispatchError::missing_argument(#action_name, #name),
                        )
                    }
                }
            },
        };
        quote! {
            let #ident: #ty = match ::actuate::__private::lookup(args, #name) {
                ::core::option::Option::Some(__raw) => #coerce,
                ::core::option::Option::None => #fallback,
            };
        }
    });

    let call = generate_call(self_ty, action);
    quote! {
        #action_name => {
            #(#extractions)*
            #call
        }
    }
}

fn generate_positional_arm(self_ty: &Type, action: &ActionInfo) -> TokenStream {
    let action_name = &action.name;
    let arity = action.params.len();

    let extractions = action.params.iter().enumerate().map(|(i, p)| {
        let ident = &p.ident;
        let ty = &p.ty;
        let coerce = coerce_or_fail(action_name, p);
        quote! {
            let #ident: #ty = {
                let __raw: &str = args[#i];
                #coerce
            };
        }
    });

    let call = generate_call(self_ty, action);
    quote! {
        #action_name => {
            if args.len() != #arity {
                return ::core::result::Result::Err(
                    ::actuate::DispatchError::arity_mismatch(#action_name, #arity, args.len()),
                );
            }
            #(#extractions)*
            #call
        }
    }
}

fn generate_dispatcher(dispatcher: &Ident, self_ty: &Type, actions: &[ActionInfo]) -> TokenStream {
    let doc = format!(
        "Compile-time dispatcher over the {} action(s) declared by `#[actions]`.",
        actions.len()
    );

    let (named_body, positional_body) = if actions.is_empty() {
        let empty = quote! {
            let _ = (action, args);
            ::core::result::Result::Err(::actuate::DispatchError::Configuration(
                ::actuate::ConfigError::EmptyCatalog,
            ))
        };
        (empty.clone(), empty)
    } else {
        let named_arms = actions.iter().map(|a| generate_named_arm(self_ty, a));
        let positional_arms = actions.iter().map(|a| generate_positional_arm(self_ty, a));
        (
            quote! {
                match action {
                    #(#named_arms)*
                    _ => ::core::result::Result::Err(
                        ::actuate::DispatchError::ActionNotFound(action.to_owned()),
                    ),
                }
            },
            quote! {
                match action {
                    #(#positional_arms)*
                    _ => ::core::result::Result::Err(
                        ::actuate::DispatchError::ActionNotFound(action.to_owned()),
                    ),
                }
            },
        )
    };

    quote! {
        #[doc = #doc]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct #dispatcher;

        impl ::actuate::Dispatcher for #dispatcher {
            #[allow(unused_variables)]
            fn dispatch(
                &self,
                action: &str,
                args: &::actuate::Arguments,
            ) -> ::core::result::Result<::std::string::String, ::actuate::DispatchError> {
                ::actuate::__private::trace_dispatch(action);
                #named_body
            }

            #[allow(unused_variables)]
            fn dispatch_positional(
                &self,
                action: &str,
                args: &[&str],
            ) -> ::core::result::Result<::std::string::String, ::actuate::DispatchError> {
                ::actuate::__private::trace_dispatch(action);
                #positional_body
            }

            fn strategy(&self) -> ::actuate::Strategy {
                ::actuate::Strategy::Generated
            }
        }
    }
}

fn is_action_candidate(method: &ImplItemFn) -> bool {
    matches!(method.vis, Visibility::Public(_))
}

fn strip_attrs(method: &mut ImplItemFn) {
    method.attrs.retain(|attr| !attr.path().is_ident("action"));
    for input in &mut method.sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            pat_type.attrs.retain(|attr| !attr.path().is_ident("param"));
        }
    }
}

/// Main implementation of the #[actions] macro
pub fn actions_impl(attr: TokenStream, item: TokenStream) -> Result<TokenStream> {
    let args: ActionsArgs = syn::parse2(attr)?;
    let mut item_impl: ItemImpl = syn::parse2(item)?;

    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(Error::new(
            path.span(),
            "#[actions] applies to inherent impl blocks only",
        ));
    }
    if !item_impl.generics.params.is_empty() {
        return Err(Error::new(
            item_impl.generics.span(),
            "#[actions] does not support generic impl blocks",
        ));
    }

    let self_ty = (*item_impl.self_ty).clone();
    let mut actions: Vec<ActionInfo> = Vec::new();

    for impl_item in &mut item_impl.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };

        let attrs = parse_action_attrs(&method.attrs)?;
        if !attrs.skip && is_action_candidate(method) {
            let info = analyze(method, attrs)?;
            if let Some(prev) = actions.iter().find(|a| a.name == info.name) {
                return Err(Error::new(
                    method.sig.ident.span(),
                    format!(
                        "action name '{}' is already used by `{}`",
                        info.name, prev.fn_name
                    ),
                ));
            }
            actions.push(info);
        }

        strip_attrs(method);
    }

    let descriptors = actions.iter().map(|a| generate_descriptor(&self_ty, a));

    let dispatcher = args
        .dispatcher
        .as_ref()
        .map(|d| generate_dispatcher(d, &self_ty, &actions));

    Ok(quote! {
        #item_impl

        impl #self_ty {
            /// Builds the catalog of every action declared in this block.
            pub fn catalog() -> ::core::result::Result<::actuate::Catalog, ::actuate::ConfigError> {
                ::actuate::Catalog::builder()
                    #(.action(#descriptors))*
                    .build()
            }
        }

        #dispatcher
    })
}
