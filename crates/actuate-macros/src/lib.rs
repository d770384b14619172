//! Proc macros for actuate.
//!
//! # Available Macros
//!
//! ## Attribute Macros
//!
//! - [`actions`] - Register the functions of an `impl` block as actions and
//!   generate a compile-time dispatcher for them
//!
//! ## Derive Macros
//!
//! - [`ActionEnum`] - Make a fieldless enum usable as an action parameter
//!
//! Generated code refers to the `actuate` crate by absolute path, so these
//! macros are meant to be used through its re-exports.

mod action_enum;
mod actions;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Registers the public associated functions of an `impl` block as actions.
///
/// Every `pub fn` without a receiver becomes an action named after the
/// function in PascalCase. Its parameters are named in lowerCamelCase and
/// keep their declaration order.
///
/// # Attributes
///
/// | Attribute | Where | Description |
/// |-----------|-------|-------------|
/// | `dispatcher = Name` | `#[actions(..)]` | Also generate a dispatcher struct |
/// | `#[action(name = "X")]` | method | Override the action name |
/// | `#[action(skip)]` | method | Keep a `pub fn` out of the catalog |
/// | `#[param(name = "x")]` | parameter | Override the parameter name |
/// | `#[param(default = expr)]` | parameter | Make the parameter optional |
///
/// Defaults must be constant: a literal, a path such as `Side::Left`, or a
/// negated literal. They are expanded into the catalog and into every
/// generated dispatcher arm, and anything else is a compile error.
///
/// # Parameter Types
///
/// | Type | Semantic type |
/// |------|---------------|
/// | `String` | String |
/// | `i32` | Int32 |
/// | `f32` / `f64` | Float32 / Float64 |
/// | `rust_decimal::Decimal` | Decimal |
/// | `bool` | Boolean |
/// | `chrono::NaiveDateTime` | DateTime |
/// | `#[derive(ActionEnum)]` enum | Enum |
/// | `Option<T>` | nullable T, defaults to `None` |
///
/// # Return Type Handling
///
/// | Return Type | Behavior |
/// |-------------|----------|
/// | `T` | Rendered to text |
/// | `Result<T, E>` | `Ok` rendered; `Err` becomes an invocation failure |
/// | `()` | Compile error |
///
/// # Generated Code
///
/// - `Type::catalog() -> Result<actuate::Catalog, actuate::ConfigError>`
/// - with `dispatcher = Name`: `pub struct Name;` implementing
///   `actuate::Dispatcher` through a `match` on the action name
///
/// # Example
///
/// ```rust,ignore
/// use actuate::actions;
///
/// pub struct Text;
///
/// #[actions(dispatcher = TextDispatcher)]
/// impl Text {
///     pub fn replace(input: String, old_value: String, #[param(default = "")] new_value: String) -> String {
///         input.replace(&old_value, &new_value)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn actions(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    let item = proc_macro2::TokenStream::from(item);
    actions::actions_impl(attr, item)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derives `ActionEnum`, `ActionArg` and `ActionOutput` for a fieldless enum.
///
/// Arguments match a variant by exact name or by ordinal; results render as
/// the variant name.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, Copy, PartialEq, actuate::ActionEnum)]
/// pub enum Side {
///     Left,
///     Right,
///     Both,
/// }
/// ```
#[proc_macro_derive(ActionEnum)]
pub fn action_enum_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    action_enum::action_enum_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
