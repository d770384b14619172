//! The compiled-closure dispatcher.
//!
//! Walks the catalog once and builds, per action, a pair of closures that
//! extract, coerce and invoke without consulting the descriptor again. The
//! per-parameter coercion function is chosen at construction from the
//! parameter's semantic type, so a call never branches on type.

use super::Dispatcher;
use crate::binder::{self, Arguments};
use crate::catalog::{Catalog, Invoker, ParameterDescriptor};
use crate::coerce;
use crate::error::DispatchError;
use crate::facade::Strategy;
use crate::value::{SemanticType, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Coerce = Arc<dyn Fn(&str) -> Option<Value> + Send + Sync>;
type NamedFn = Box<dyn Fn(&Arguments) -> Result<String, DispatchError> + Send + Sync>;
type PositionalFn = Box<dyn Fn(&[&str]) -> Result<String, DispatchError> + Send + Sync>;

/// Everything a call needs to know about one parameter, fixed up front.
#[derive(Clone)]
struct Slot {
    name: Arc<str>,
    ty: SemanticType,
    coerce: Coerce,
    fallback: Option<Value>,
    nullable: bool,
}

impl Slot {
    fn new(param: &ParameterDescriptor) -> Self {
        Self {
            name: Arc::from(param.name()),
            ty: param.semantic_type(),
            coerce: coercion_for(param),
            fallback: param.fallback(),
            nullable: param.is_nullable(),
        }
    }

    fn coerce(&self, action: &str, raw: &str) -> Result<Value, DispatchError> {
        (self.coerce)(raw)
            .ok_or_else(|| DispatchError::coercion_failed(action, &self.name, self.ty, raw))
    }

    fn named(&self, action: &str, args: &Arguments) -> Result<Value, DispatchError> {
        match binder::lookup(args, &self.name) {
            Some(raw) => self.coerce(action, raw),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| DispatchError::missing_argument(action, &self.name)),
        }
    }

    fn positional(&self, action: &str, raw: &str) -> Result<Value, DispatchError> {
        if self.nullable && coerce::is_blank(raw) {
            return Ok(Value::Null);
        }
        self.coerce(action, raw)
    }
}

fn coercion_for(param: &ParameterDescriptor) -> Coerce {
    match param.semantic_type() {
        SemanticType::String => Arc::new(|raw| coerce::string(raw).map(Value::String)),
        SemanticType::Int32 => Arc::new(|raw| coerce::int32(raw).map(Value::Int32)),
        SemanticType::Float32 => Arc::new(|raw| coerce::float32(raw).map(Value::Float32)),
        SemanticType::Float64 => Arc::new(|raw| coerce::float64(raw).map(Value::Float64)),
        SemanticType::Decimal => Arc::new(|raw| coerce::decimal(raw).map(Value::Decimal)),
        SemanticType::Boolean => Arc::new(|raw| coerce::boolean(raw).map(Value::Boolean)),
        SemanticType::DateTime => Arc::new(|raw| coerce::datetime(raw).map(Value::DateTime)),
        SemanticType::Enum => {
            let variants: Arc<[String]> = param.variants().into();
            Arc::new(move |raw| {
                coerce::enum_index(&variants[..], raw).map(|i| Value::Enum(variants[i].clone()))
            })
        }
    }
}

fn render(action: &str, invoke: &Invoker, values: Vec<Value>) -> Result<String, DispatchError> {
    invoke(values)
        .map(|value| value.render())
        .map_err(|source| DispatchError::invocation_failed(action, source))
}

struct CompiledAction {
    named: NamedFn,
    positional: PositionalFn,
}

impl CompiledAction {
    fn compile(name: &str, params: &[ParameterDescriptor], invoke: Invoker) -> Self {
        let slots: Arc<[Slot]> = params.iter().map(Slot::new).collect();
        let action: Arc<str> = Arc::from(name);

        let named = {
            let (slots, action, invoke) = (Arc::clone(&slots), Arc::clone(&action), invoke.clone());
            Box::new(move |args: &Arguments| {
                let values = slots
                    .iter()
                    .map(|slot| slot.named(&action, args))
                    .collect::<Result<Vec<_>, _>>()?;
                render(&action, &invoke, values)
            }) as NamedFn
        };

        let positional = Box::new(move |args: &[&str]| {
            if args.len() != slots.len() {
                return Err(DispatchError::arity_mismatch(&action, slots.len(), args.len()));
            }
            let values = slots
                .iter()
                .zip(args)
                .map(|(slot, raw)| slot.positional(&action, raw))
                .collect::<Result<Vec<_>, _>>()?;
            render(&action, &invoke, values)
        }) as PositionalFn;

        Self { named, positional }
    }
}

/// Dispatches through a table of closures built once from the catalog.
///
/// Construction is proportional to the catalog size; each call is a hash
/// lookup followed by the action's own closure.
pub struct CompiledDispatcher {
    table: HashMap<String, CompiledAction>,
}

impl CompiledDispatcher {
    pub fn new(catalog: &Catalog) -> Self {
        let table: HashMap<_, _> = catalog
            .iter()
            .map(|descriptor| {
                let compiled = CompiledAction::compile(
                    descriptor.name(),
                    descriptor.parameters(),
                    descriptor.invoker(),
                );
                (descriptor.name().to_owned(), compiled)
            })
            .collect();

        tracing::debug!(actions = table.len(), "compiled dispatch table built");
        Self { table }
    }

    fn entry(&self, action: &str) -> Result<&CompiledAction, DispatchError> {
        self.table
            .get(action)
            .ok_or_else(|| DispatchError::ActionNotFound(action.to_owned()))
    }
}

impl fmt::Debug for CompiledDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledDispatcher")
            .field("actions", &self.table.len())
            .finish()
    }
}

impl Dispatcher for CompiledDispatcher {
    fn dispatch(&self, action: &str, args: &Arguments) -> Result<String, DispatchError> {
        tracing::trace!(strategy = "compiled", action, "dispatching");
        (self.entry(action)?.named)(args)
    }

    fn dispatch_positional(&self, action: &str, args: &[&str]) -> Result<String, DispatchError> {
        tracing::trace!(strategy = "compiled", action, positional = true, "dispatching");
        (self.entry(action)?.positional)(args)
    }

    fn strategy(&self) -> Strategy {
        Strategy::Compiled
    }
}
