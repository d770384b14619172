//! Error types for catalog construction, binding and dispatch.

use crate::facade::Strategy;
use crate::value::SemanticType;
use thiserror::Error;

/// Catalog or dispatcher construction failures.
///
/// These are raised while building, never mid-dispatch, with one exception:
/// a generated dispatcher over zero actions reports [`ConfigError::EmptyCatalog`]
/// on every call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two actions share a name.
    #[error("duplicate action name: {0}")]
    DuplicateAction(String),

    /// One action declares the same parameter name twice.
    #[error("action '{action}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { action: String, parameter: String },

    /// An action or parameter name is empty.
    #[error("empty {what} name in action '{action}'")]
    EmptyName { action: String, what: &'static str },

    /// A declared default does not have the parameter's semantic type.
    #[error("default for parameter '{parameter}' of action '{action}' must be {expected}, got {actual}")]
    DefaultTypeMismatch {
        action: String,
        parameter: String,
        expected: SemanticType,
        actual: String,
    },

    /// An enum parameter has no variants to coerce to.
    #[error("enum parameter '{parameter}' of action '{action}' declares no variants")]
    EnumWithoutVariants { action: String, parameter: String },

    /// There are no actions to dispatch to.
    #[error("there are no valid actions to be called via the dispatcher")]
    EmptyCatalog,

    /// The facade was asked for a strategy without the parts it needs.
    #[error("{strategy} dispatch requires {component}")]
    MissingComponent {
        strategy: Strategy,
        component: &'static str,
    },

    /// Unrecognized strategy name.
    #[error("unknown dispatch strategy '{0}', expected reflective, compiled or generated")]
    UnknownStrategy(String),

    /// Configuration text could not be parsed.
    #[error("invalid dispatch configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::InvalidConfig(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::InvalidConfig(e.to_string())
    }
}

/// Failures of the argument binder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A required parameter had no usable value.
    #[error("missing required argument: {parameter}")]
    MissingRequiredArgument { parameter: String },

    /// Text could not be parsed into the parameter's semantic type.
    #[error("cannot convert '{raw}' to {expected} for parameter '{parameter}'")]
    TypeCoercionFailed {
        parameter: String,
        expected: SemanticType,
        raw: String,
    },

    /// A positional call supplied the wrong number of values.
    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
}

/// Comparable classification of a [`DispatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ActionNotFound,
    MissingRequiredArgument,
    TypeCoercionFailed,
    ArityMismatch,
    InvocationFailed,
    Configuration,
}

/// Errors returned by [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).
///
/// Every variant except `InvocationFailed` is a deterministic function of the
/// action name, the arguments and the catalog.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No action with this name exists.
    #[error("no action found for: {0}")]
    ActionNotFound(String),

    /// A required parameter had no usable value.
    #[error("missing required argument '{parameter}' for action '{action}'")]
    MissingRequiredArgument { action: String, parameter: String },

    /// An argument could not be coerced to its declared type.
    #[error("action '{action}': cannot convert '{raw}' to {expected} for parameter '{parameter}'")]
    TypeCoercionFailed {
        action: String,
        parameter: String,
        expected: SemanticType,
        raw: String,
    },

    /// A positional call supplied the wrong number of values.
    #[error("expected {expected} arguments for action '{action}', but got {actual}")]
    ArityMismatch {
        action: String,
        expected: usize,
        actual: usize,
    },

    /// The action itself failed.
    #[error("action '{action}' failed: {source}")]
    InvocationFailed {
        action: String,
        #[source]
        source: anyhow::Error,
    },

    /// The dispatcher is misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

impl DispatchError {
    /// Attaches the action name to a binder failure.
    pub fn bind(action: &str, err: BindError) -> Self {
        match err {
            BindError::MissingRequiredArgument { parameter } => {
                DispatchError::MissingRequiredArgument {
                    action: action.to_owned(),
                    parameter,
                }
            }
            BindError::TypeCoercionFailed {
                parameter,
                expected,
                raw,
            } => DispatchError::TypeCoercionFailed {
                action: action.to_owned(),
                parameter,
                expected,
                raw,
            },
            BindError::ArityMismatch { expected, actual } => DispatchError::ArityMismatch {
                action: action.to_owned(),
                expected,
                actual,
            },
        }
    }

    pub fn missing_argument(action: &str, parameter: &str) -> Self {
        DispatchError::MissingRequiredArgument {
            action: action.to_owned(),
            parameter: parameter.to_owned(),
        }
    }

    pub fn coercion_failed(
        action: &str,
        parameter: &str,
        expected: SemanticType,
        raw: &str,
    ) -> Self {
        DispatchError::TypeCoercionFailed {
            action: action.to_owned(),
            parameter: parameter.to_owned(),
            expected,
            raw: raw.to_owned(),
        }
    }

    pub fn arity_mismatch(action: &str, expected: usize, actual: usize) -> Self {
        DispatchError::ArityMismatch {
            action: action.to_owned(),
            expected,
            actual,
        }
    }

    pub fn invocation_failed<E: Into<anyhow::Error>>(action: &str, source: E) -> Self {
        DispatchError::InvocationFailed {
            action: action.to_owned(),
            source: source.into(),
        }
    }

    /// Returns the classification used to compare outcomes across strategies.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::ActionNotFound(_) => ErrorKind::ActionNotFound,
            DispatchError::MissingRequiredArgument { .. } => ErrorKind::MissingRequiredArgument,
            DispatchError::TypeCoercionFailed { .. } => ErrorKind::TypeCoercionFailed,
            DispatchError::ArityMismatch { .. } => ErrorKind::ArityMismatch,
            DispatchError::InvocationFailed { .. } => ErrorKind::InvocationFailed,
            DispatchError::Configuration(_) => ErrorKind::Configuration,
        }
    }
}
