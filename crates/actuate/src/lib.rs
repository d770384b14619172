//! Named-action dispatch.
//!
//! `actuate` invokes ordinary Rust functions by name, with arguments supplied
//! as strings, behind one interface with three interchangeable strategies.
//! It is built for the case where the caller only has text: a template
//! engine applying a filter, a config file naming a transform, a CLI verb.
//!
//! # Building Blocks
//!
//! - **Catalog**: the validated, immutable table of actions and their
//!   parameters ([`Catalog`], [`ActionDescriptor`], [`ParameterDescriptor`])
//! - **Binder**: string arguments to typed values, with defaults and invariant
//!   coercion ([`bind`], [`bind_positional`])
//! - **Dispatchers**: [`ReflectiveDispatcher`], [`CompiledDispatcher`] and the
//!   dispatcher emitted by [`actions`], all implementing [`Dispatcher`]
//! - **Facade**: [`ActionDispatch`], which picks one strategy at construction
//!   and forwards every call to it
//!
//! # Declaring Actions
//!
//! ```rust,ignore
//! use actuate::{actions, ActionDispatch, Strategy};
//!
//! pub struct Text;
//!
//! #[actions(dispatcher = TextDispatcher)]
//! impl Text {
//!     pub fn cut_string(input: String, max_length: i32, #[param(default = "")] suffix: String) -> String {
//!         /* ... */
//!     }
//! }
//!
//! let dispatch = ActionDispatch::builder()
//!     .strategy(Strategy::Generated)
//!     .catalog(Text::catalog()?)
//!     .generated(TextDispatcher)
//!     .build()?;
//!
//! let out = dispatch.dispatch("CutString", &actuate::arguments([
//!     ("input", "This is a test string."),
//!     ("maxLength", "10"),
//!     ("suffix", "..."),
//! ]))?;
//! assert_eq!(out, "This is...");
//! ```
//!
//! Every strategy returns byte-identical output and the same error kind for
//! the same inputs.

mod binder;
mod catalog;
mod coerce;
mod dispatcher;
mod error;
mod facade;
pub mod filters;
mod value;

pub use binder::{arguments, bind, bind_positional, coerce_parameter, lookup, Arguments};
pub use catalog::{ActionDescriptor, Catalog, CatalogBuilder, Invoker, ParameterDescriptor};
pub use dispatcher::{CompiledDispatcher, Dispatcher, ReflectiveDispatcher};
pub use error::{BindError, ConfigError, DispatchError, ErrorKind};
pub use facade::{ActionDispatch, ActionDispatchBuilder, DispatchConfig, Strategy, STRATEGY_ENV};
pub use filters::register_actions;
pub use value::{ActionArg, ActionEnum, ActionOutput, SemanticType, Value};

// Macro re-exports
pub use actuate_macros::{actions, ActionEnum};

/// Support code for macro-generated items. Not public API.
#[doc(hidden)]
pub mod __private {
    pub use crate::binder::lookup;
    pub use anyhow;

    use crate::coerce;
    use crate::value::{ActionArg, ActionEnum, Value};

    /// Takes the next bound value and converts it to the parameter's Rust type.
    pub fn take_arg<T: ActionArg>(
        values: &mut std::vec::IntoIter<Value>,
        action: &str,
        parameter: &str,
    ) -> anyhow::Result<T> {
        let value = values
            .next()
            .ok_or_else(|| anyhow::anyhow!("{}: no value bound for '{}'", action, parameter))?;
        T::from_value(value).ok_or_else(|| {
            anyhow::anyhow!(
                "{}: value bound for '{}' is not {}",
                action,
                parameter,
                T::SEMANTIC_TYPE
            )
        })
    }

    pub fn trace_dispatch(action: &str) {
        tracing::trace!(strategy = "generated", action, "dispatching");
    }

    pub fn parse_enum<T: ActionEnum>(raw: &str) -> Option<T> {
        coerce::enum_index(T::VARIANTS, raw).and_then(T::from_index)
    }

    pub fn enum_from_value<T: ActionEnum>(value: Value) -> Option<T> {
        match value {
            Value::Enum(name) => T::VARIANTS
                .iter()
                .position(|v| *v == name)
                .and_then(T::from_index),
            _ => None,
        }
    }
}
