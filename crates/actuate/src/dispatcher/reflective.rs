//! The reflective dispatcher: resolve and coerce from scratch on every call.

use super::{invoke, Dispatcher};
use crate::binder::{self, Arguments};
use crate::catalog::Catalog;
use crate::error::DispatchError;
use crate::facade::Strategy;
use std::sync::Arc;

/// Looks up the descriptor, runs the binder and invokes, every call.
///
/// This is the correctness baseline the other strategies are checked
/// against. Nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ReflectiveDispatcher {
    catalog: Arc<Catalog>,
}

impl ReflectiveDispatcher {
    pub fn new(catalog: impl Into<Arc<Catalog>>) -> Self {
        Self {
            catalog: catalog.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl Dispatcher for ReflectiveDispatcher {
    fn dispatch(&self, action: &str, args: &Arguments) -> Result<String, DispatchError> {
        tracing::trace!(strategy = "reflective", action, "dispatching");

        let descriptor = self
            .catalog
            .lookup(action)
            .ok_or_else(|| DispatchError::ActionNotFound(action.to_owned()))?;
        let values = binder::bind(descriptor, args).map_err(|e| DispatchError::bind(action, e))?;
        invoke(descriptor, values)
    }

    fn dispatch_positional(&self, action: &str, args: &[&str]) -> Result<String, DispatchError> {
        tracing::trace!(strategy = "reflective", action, positional = true, "dispatching");

        let descriptor = self
            .catalog
            .lookup(action)
            .ok_or_else(|| DispatchError::ActionNotFound(action.to_owned()))?;
        let values = binder::bind_positional(descriptor, args)
            .map_err(|e| DispatchError::bind(action, e))?;
        invoke(descriptor, values)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Reflective
    }
}
