//! MiniJinja filter registration.
//!
//! Exposes every catalog action as a template filter of the same name. The
//! piped value binds to the first parameter and filter arguments bind to the
//! following ones in order:
//!
//! ```text
//! {{ title | CutString(10, "...") }}   →  CutString(input=title, maxLength=10, suffix="...")
//! {{ price | Currency }}               →  Currency(input=price) with defaults
//! ```
//!
//! Arguments go through named dispatch, so omitted trailing parameters take
//! their defaults and `none` counts as omitted.

use crate::binder::Arguments;
use crate::error::DispatchError;
use crate::facade::ActionDispatch;
use minijinja::value::Rest;
use minijinja::{Environment, Error, ErrorKind, Value};
use std::sync::Arc;

/// Registers one filter per action of `dispatch`'s catalog.
pub fn register_actions(env: &mut Environment<'static>, dispatch: Arc<ActionDispatch>) {
    let actions: Vec<(String, Vec<String>)> = dispatch
        .catalog()
        .iter()
        .map(|descriptor| {
            let params = descriptor
                .parameters()
                .iter()
                .map(|p| p.name().to_owned())
                .collect();
            (descriptor.name().to_owned(), params)
        })
        .collect();

    tracing::debug!(filters = actions.len(), "registering action filters");

    for (name, params) in actions {
        let dispatch = Arc::clone(&dispatch);
        let action = name.clone();
        env.add_filter(name, move |value: Value, args: Rest<Value>| -> Result<String, Error> {
            let supplied = std::iter::once(value).chain(args.0);
            let bound = bind_filter_args(&action, &params, supplied).map_err(into_template_error)?;
            dispatch
                .dispatch(&action, &bound)
                .map_err(into_template_error)
        });
    }
}

fn bind_filter_args(
    action: &str,
    params: &[String],
    supplied: impl Iterator<Item = Value>,
) -> Result<Arguments, DispatchError> {
    let supplied: Vec<Value> = supplied.collect();
    if supplied.len() > params.len() {
        return Err(DispatchError::arity_mismatch(action, params.len(), supplied.len()));
    }

    Ok(params
        .iter()
        .zip(supplied)
        .filter(|(_, value)| !value.is_none() && !value.is_undefined())
        .map(|(param, value)| (param.clone(), template_text(&value)))
        .collect())
}

fn template_text(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_owned(),
        None => value.to_string(),
    }
}

fn into_template_error(err: DispatchError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ActionDescriptor, Catalog, ParameterDescriptor};
    use crate::value::{SemanticType, Value as ActionValue};
    use minijinja::context;

    fn environment() -> Environment<'static> {
        let catalog = Catalog::from_actions([ActionDescriptor::new(
            "Repeat",
            vec![
                ParameterDescriptor::required("input", SemanticType::String),
                ParameterDescriptor::required("times", SemanticType::Int32).with_default(2),
                ParameterDescriptor::required("separator", SemanticType::String).with_default(""),
            ],
            |args| match args.as_slice() {
                [ActionValue::String(s), ActionValue::Int32(n), ActionValue::String(sep)] => {
                    Ok(ActionValue::String(vec![s.as_str(); *n as usize].join(sep)))
                }
                _ => anyhow::bail!("unexpected arguments"),
            },
        )])
        .unwrap();
        let dispatch = ActionDispatch::builder().catalog(catalog).build().unwrap();

        let mut env = Environment::new();
        register_actions(&mut env, Arc::new(dispatch));
        env
    }

    fn render(env: &Environment<'static>, source: &str) -> Result<String, Error> {
        env.render_str(source, context! { word => "ab" })
    }

    #[test]
    fn test_defaults_apply() {
        let env = environment();
        assert_eq!(render(&env, "{{ word | Repeat }}").unwrap(), "abab");
    }

    #[test]
    fn test_positional_filter_args() {
        let env = environment();
        assert_eq!(render(&env, "{{ word | Repeat(3, '-') }}").unwrap(), "ab-ab-ab");
        assert_eq!(render(&env, "{{ word | Repeat(none, '-') }}").unwrap(), "ab-ab");
    }

    #[test]
    fn test_dispatch_errors_surface() {
        let env = environment();
        let err = render(&env, "{{ word | Repeat('many') }}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(err.to_string().contains("cannot convert 'many' to Int32"));

        let err = render(&env, "{{ word | Repeat(1, '', 'extra') }}").unwrap_err();
        assert!(err.to_string().contains("expected 3 arguments"));
    }
}
