//! The action catalog.
//!
//! A [`Catalog`] is the single source of truth every dispatcher derives its
//! behavior from: the names of the invocable actions, their ordered parameter
//! lists and a handle to each underlying callable. It is validated once by
//! [`CatalogBuilder::build`] and immutable afterwards, so it can be shared
//! behind an `Arc` and read from any number of threads without locking.
//!
//! # Example
//!
//! ```rust
//! use actuate::{ActionDescriptor, Catalog, ParameterDescriptor, SemanticType, Value};
//!
//! let catalog = Catalog::builder()
//!     .action(ActionDescriptor::new(
//!         "Repeat",
//!         vec![
//!             ParameterDescriptor::required("input", SemanticType::String),
//!             ParameterDescriptor::required("times", SemanticType::Int32).with_default(2),
//!         ],
//!         |args| match args.as_slice() {
//!             [Value::String(s), Value::Int32(n)] => Ok(Value::String(s.repeat(*n as usize))),
//!             _ => anyhow::bail!("unexpected arguments"),
//!         },
//!     ))
//!     .build()?;
//!
//! assert!(catalog.contains("Repeat"));
//! assert_eq!(catalog.lookup("Repeat").unwrap().parameters().len(), 2);
//! # Ok::<(), actuate::ConfigError>(())
//! ```

use crate::error::ConfigError;
use crate::value::{ActionArg, SemanticType, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// The callable behind an action: ordered typed arguments in, typed result out.
pub type Invoker = Arc<dyn Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync>;

/// One formal parameter of an action.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    semantic_type: SemanticType,
    optional: bool,
    nullable: bool,
    default: Option<Value>,
    variants: Vec<String>,
}

impl ParameterDescriptor {
    /// A required, non-nullable parameter.
    pub fn required(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            optional: false,
            nullable: false,
            default: None,
            variants: Vec::new(),
        }
    }

    /// A parameter described by its Rust type.
    ///
    /// `Option<T>` yields a nullable parameter that defaults to no value;
    /// enum types carry their variant names.
    pub fn of<T: ActionArg>(name: impl Into<String>) -> Self {
        let mut param = Self::required(name, T::SEMANTIC_TYPE)
            .with_variants(T::variants().iter().map(|v| (*v).to_owned()));
        if T::NULLABLE {
            param = param.nullable();
        }
        param
    }

    /// Makes the parameter optional with the given default.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.optional = true;
        self.default = Some(value.into());
        self
    }

    /// Makes the parameter nullable: blank input means "no value".
    ///
    /// A nullable parameter without an explicit default is optional and
    /// defaults to [`Value::Null`].
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self.optional = true;
        self
    }

    /// Sets the variant names of an enum parameter, in ordinal order.
    pub fn with_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = variants.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.semantic_type
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The explicitly declared default, if any.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// The value substituted when the argument is absent or blank.
    ///
    /// `None` means the parameter is required.
    pub fn fallback(&self) -> Option<Value> {
        if !self.optional {
            return None;
        }
        Some(self.default.clone().unwrap_or(Value::Null))
    }

    fn validate(&self, action: &str) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                action: action.to_owned(),
                what: "parameter",
            });
        }

        if self.semantic_type == SemanticType::Enum && self.variants.is_empty() {
            return Err(ConfigError::EnumWithoutVariants {
                action: action.to_owned(),
                parameter: self.name.clone(),
            });
        }

        let mismatch = |actual: String| ConfigError::DefaultTypeMismatch {
            action: action.to_owned(),
            parameter: self.name.clone(),
            expected: self.semantic_type,
            actual,
        };

        match &self.default {
            None => Ok(()),
            Some(Value::Null) if self.nullable => Ok(()),
            Some(Value::Null) => Err(mismatch("null".to_owned())),
            Some(Value::Enum(name)) if self.semantic_type == SemanticType::Enum => {
                if self.variants.iter().any(|v| v == name) {
                    Ok(())
                } else {
                    Err(mismatch(format!("unknown variant '{}'", name)))
                }
            }
            Some(value) => match value.semantic_type() {
                Some(ty) if ty == self.semantic_type => Ok(()),
                Some(ty) => Err(mismatch(ty.to_string())),
                None => Err(mismatch("null".to_owned())),
            },
        }
    }
}

/// One invocable action: its name, parameters and callable.
#[derive(Clone)]
pub struct ActionDescriptor {
    name: String,
    parameters: Vec<ParameterDescriptor>,
    invoke: Invoker,
}

impl ActionDescriptor {
    /// Creates a descriptor.
    ///
    /// `invoke` receives exactly one value per parameter, in declaration order,
    /// already coerced by the binder.
    pub fn new<F>(name: impl Into<String>, parameters: Vec<ParameterDescriptor>, invoke: F) -> Self
    where
        F: Fn(Vec<Value>) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters,
            invoke: Arc::new(invoke),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters in declaration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Looks up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Calls the underlying action with bound arguments.
    pub fn invoke(&self, args: Vec<Value>) -> anyhow::Result<Value> {
        (self.invoke)(args)
    }

    /// A shared handle to the callable.
    pub fn invoker(&self) -> Invoker {
        Arc::clone(&self.invoke)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName {
                action: self.name.clone(),
                what: "action",
            });
        }

        let mut seen = HashSet::new();
        for param in &self.parameters {
            param.validate(&self.name)?;
            if !seen.insert(param.name.as_str()) {
                return Err(ConfigError::DuplicateParameter {
                    action: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// The immutable table of all actions.
#[derive(Clone, Default)]
pub struct Catalog {
    actions: Vec<ActionDescriptor>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Creates a builder.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Builds a catalog from descriptors.
    pub fn from_actions<I>(actions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ActionDescriptor>,
    {
        Self::builder().actions(actions).build()
    }

    /// Looks up an action by its case-sensitive name.
    pub fn lookup(&self, name: &str) -> Option<&ActionDescriptor> {
        self.index.get(name).map(|&i| &self.actions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Action names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.iter().map(|a| a.name.as_str())
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("count", &self.actions.len())
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects descriptors and validates them into a [`Catalog`].
#[derive(Default)]
pub struct CatalogBuilder {
    actions: Vec<ActionDescriptor>,
}

impl CatalogBuilder {
    /// Adds an action.
    pub fn action(mut self, descriptor: ActionDescriptor) -> Self {
        self.actions.push(descriptor);
        self
    }

    /// Adds several actions.
    pub fn actions<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator<Item = ActionDescriptor>,
    {
        self.actions.extend(descriptors);
        self
    }

    /// Validates every descriptor and freezes the catalog.
    ///
    /// Fails on duplicate action names, empty names, duplicate parameter
    /// names, enum parameters without variants and defaults whose type does
    /// not match the parameter.
    pub fn build(self) -> Result<Catalog, ConfigError> {
        let mut index = HashMap::with_capacity(self.actions.len());

        for (i, action) in self.actions.iter().enumerate() {
            action.validate()?;
            if index.insert(action.name.clone(), i).is_some() {
                return Err(ConfigError::DuplicateAction(action.name.clone()));
            }
        }

        tracing::debug!(actions = self.actions.len(), "catalog built");

        Ok(Catalog {
            actions: self.actions,
            index,
        })
    }
}
