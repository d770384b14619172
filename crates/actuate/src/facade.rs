//! Strategy selection and the dispatch facade.
//!
//! [`ActionDispatch`] owns one dispatcher, chosen once when it is built, and
//! forwards every call to it. Callers never name a concrete dispatcher type.
//!
//! ```rust
//! use actuate::{ActionDescriptor, ActionDispatch, Catalog, ParameterDescriptor, SemanticType, Strategy, Value};
//!
//! let catalog = Catalog::from_actions([ActionDescriptor::new(
//!     "Shout",
//!     vec![ParameterDescriptor::required("input", SemanticType::String)],
//!     |args| match args.as_slice() {
//!         [Value::String(s)] => Ok(Value::String(s.to_uppercase())),
//!         _ => anyhow::bail!("unexpected arguments"),
//!     },
//! )])?;
//!
//! let dispatch = ActionDispatch::builder()
//!     .strategy(Strategy::Reflective)
//!     .catalog(catalog)
//!     .build()?;
//!
//! let out = dispatch.dispatch("Shout", &actuate::arguments([("input", "hi")])).unwrap();
//! assert_eq!(out, "HI");
//! # Ok::<(), actuate::ConfigError>(())
//! ```

use crate::binder::Arguments;
use crate::catalog::Catalog;
use crate::dispatcher::{CompiledDispatcher, Dispatcher, ReflectiveDispatcher};
use crate::error::{ConfigError, DispatchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How actions are resolved and invoked.
///
/// Deserialization accepts every spelling [`FromStr`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Strategy {
    /// Resolve the descriptor and coerce arguments on every call.
    Reflective,
    /// Build a closure table once, at construction.
    #[default]
    Compiled,
    /// Use a dispatcher emitted at compile time by `#[actions]`.
    Generated,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Reflective => "reflective",
            Strategy::Compiled => "compiled",
            Strategy::Generated => "generated",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reflective" | "reflection" => Ok(Strategy::Reflective),
            "compiled" | "closure" => Ok(Strategy::Compiled),
            "generated" | "codegen" => Ok(Strategy::Generated),
            _ => Err(ConfigError::UnknownStrategy(s.to_owned())),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Environment variable read by [`DispatchConfig::from_env`].
pub const STRATEGY_ENV: &str = "ACTUATE_STRATEGY";

/// Serializable dispatch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub strategy: Strategy,
}

impl DispatchConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Reads the strategy from `ACTUATE_STRATEGY`, falling back to the default
    /// when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(STRATEGY_ENV) {
            Ok(value) => Ok(Self::new(value.parse()?)),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(ConfigError::InvalidConfig(format!("{}: {}", STRATEGY_ENV, e))),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// The single entry point for dispatching actions.
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct ActionDispatch {
    strategy: Strategy,
    catalog: Arc<Catalog>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl ActionDispatch {
    pub fn builder() -> ActionDispatchBuilder {
        ActionDispatchBuilder::default()
    }

    /// Invokes `action` with named arguments.
    pub fn dispatch(&self, action: &str, args: &Arguments) -> Result<String, DispatchError> {
        tracing::trace!(strategy = %self.strategy, action, "dispatch");
        self.dispatcher
            .dispatch(action, args)
            .inspect_err(|err| log_failure(action, err))
    }

    /// Invokes `action` with one value per parameter, in declaration order.
    pub fn dispatch_positional(&self, action: &str, args: &[&str]) -> Result<String, DispatchError> {
        tracing::trace!(strategy = %self.strategy, action, positional = true, "dispatch");
        self.dispatcher
            .dispatch_positional(action, args)
            .inspect_err(|err| log_failure(action, err))
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

fn log_failure(action: &str, err: &DispatchError) {
    tracing::debug!(action, kind = ?err.kind(), error = %err, "dispatch failed");
}

impl fmt::Debug for ActionDispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatch")
            .field("strategy", &self.strategy)
            .field("catalog", &self.catalog)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ActionDispatch`].
#[derive(Default)]
pub struct ActionDispatchBuilder {
    strategy: Strategy,
    catalog: Option<Arc<Catalog>>,
    generated: Option<Arc<dyn Dispatcher>>,
}

impl ActionDispatchBuilder {
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Applies settings from a [`DispatchConfig`].
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.strategy = config.strategy;
        self
    }

    /// The catalog the dispatcher is derived from. Required.
    pub fn catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// The compile-time dispatcher used by [`Strategy::Generated`].
    pub fn generated(mut self, dispatcher: impl Dispatcher + 'static) -> Self {
        self.generated = Some(Arc::new(dispatcher));
        self
    }

    /// Constructs the dispatcher for the selected strategy.
    ///
    /// All construction work happens here; the returned facade does none.
    pub fn build(self) -> Result<ActionDispatch, ConfigError> {
        let strategy = self.strategy;
        let catalog = self.catalog.ok_or(ConfigError::MissingComponent {
            strategy,
            component: "a catalog",
        })?;

        let dispatcher: Arc<dyn Dispatcher> = match strategy {
            Strategy::Reflective => Arc::new(ReflectiveDispatcher::new(Arc::clone(&catalog))),
            Strategy::Compiled => Arc::new(CompiledDispatcher::new(&catalog)),
            Strategy::Generated => self.generated.ok_or(ConfigError::MissingComponent {
                strategy,
                component: "a generated dispatcher",
            })?,
        };

        tracing::debug!(%strategy, actions = catalog.len(), "action dispatch ready");

        Ok(ActionDispatch {
            strategy,
            catalog,
            dispatcher,
        })
    }
}
