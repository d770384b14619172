//! Dispatcher strategies.
//!
//! All strategies implement [`Dispatcher`] and must be observably identical:
//! for any action name and arguments they return the same string or fail
//! with the same [`ErrorKind`](crate::ErrorKind).
//!
//! | Strategy | Type | Per-action logic exists |
//! |----------|------|-------------------------|
//! | Reflective | [`ReflectiveDispatcher`] | never; resolved on every call |
//! | Compiled | [`CompiledDispatcher`] | from construction (closure table) |
//! | Generated | `#[actions(dispatcher = ..)]` | from compile time (`match` arms) |

mod compiled;
mod reflective;

pub use compiled::CompiledDispatcher;
pub use reflective::ReflectiveDispatcher;

use crate::binder::Arguments;
use crate::catalog::ActionDescriptor;
use crate::error::DispatchError;
use crate::facade::Strategy;
use crate::value::Value;

/// Invokes an action by name with string arguments.
///
/// Implementations hold no call-to-call state and are safe to share across
/// threads once constructed.
pub trait Dispatcher: Send + Sync {
    /// Dispatches with named arguments.
    fn dispatch(&self, action: &str, args: &Arguments) -> Result<String, DispatchError>;

    /// Dispatches with one value per parameter, in declaration order.
    fn dispatch_positional(&self, action: &str, args: &[&str]) -> Result<String, DispatchError>;

    /// The strategy this dispatcher implements.
    fn strategy(&self) -> Strategy;
}

/// Calls the action with bound values and renders the result.
pub(crate) fn invoke(descriptor: &ActionDescriptor, values: Vec<Value>) -> Result<String, DispatchError> {
    descriptor
        .invoke(values)
        .map(|value| value.render())
        .map_err(|source| DispatchError::invocation_failed(descriptor.name(), source))
}
