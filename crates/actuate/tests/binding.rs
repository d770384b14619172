//! Property tests: binding and the runtime dispatchers agree on every input.

use actuate::{
    bind, bind_positional, ActionDescriptor, Arguments, Catalog, CompiledDispatcher, Dispatcher,
    ErrorKind, ParameterDescriptor, ReflectiveDispatcher, SemanticType, Value,
};
use proptest::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test helpers
// ============================================================================

type Outcome = Result<String, (ErrorKind, String)>;

fn echo(args: Vec<Value>) -> anyhow::Result<Value> {
    let rendered: Vec<String> = args.iter().map(Value::render).collect();
    Ok(Value::String(rendered.join("|")))
}

fn catalog() -> Catalog {
    Catalog::builder()
        .action(ActionDescriptor::new(
            "Mixed",
            vec![
                ParameterDescriptor::required("text", SemanticType::String),
                ParameterDescriptor::required("count", SemanticType::Int32).with_default(3),
                ParameterDescriptor::required("limit", SemanticType::Int32).nullable(),
                ParameterDescriptor::required("amount", SemanticType::Decimal),
                ParameterDescriptor::required("strict", SemanticType::Boolean).with_default(false),
                ParameterDescriptor::required("side", SemanticType::Enum)
                    .with_variants(["Left", "Right", "Both"])
                    .with_default(Value::Enum("Left".into())),
            ],
            echo,
        ))
        .action(ActionDescriptor::new(
            "When",
            vec![
                ParameterDescriptor::required("at", SemanticType::DateTime),
                ParameterDescriptor::required("ratio", SemanticType::Float64).with_default(0.5),
            ],
            echo,
        ))
        .action(ActionDescriptor::new("Fails", vec![], |_| {
            anyhow::bail!("always fails")
        }))
        .build()
        .unwrap()
}

fn descriptor_params(catalog: &Catalog, action: &str) -> Vec<String> {
    catalog
        .lookup(action)
        .map(|d| d.parameters().iter().map(|p| p.name().to_owned()).collect())
        .unwrap_or_else(|| vec!["text".to_owned()])
}

fn outcome(result: Result<String, actuate::DispatchError>) -> Outcome {
    result.map_err(|e| (e.kind(), e.to_string()))
}

fn raw_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" \t".to_owned()),
        (-20i32..20).prop_map(|n| n.to_string()),
        "-?[0-9]{1,6}(\\.[0-9]{1,4})?",
        "[a-zA-Z ,.]{0,10}",
        prop::sample::select(vec![
            "true",
            "False",
            "0",
            "1",
            "left",
            "Right",
            "2",
            "7",
            "2024-02-29",
            "2024-02-30",
            "2024-03-05T14:07:09",
            "1e400",
            "99999999999",
        ])
        .prop_map(String::from),
    ]
}

fn action_name() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Mixed", "When", "Fails", "Missing"]).prop_map(String::from)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Reflective and compiled dispatch agree on named calls, errors included.
    #[test]
    fn named_dispatchers_agree(
        action in action_name(),
        values in prop::collection::vec(prop::option::weighted(0.8, raw_value()), 6),
    ) {
        let catalog = Arc::new(catalog());
        let params = descriptor_params(&catalog, &action);
        let args: Arguments = params
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| (name.clone(), v)))
            .collect();

        let reflective = ReflectiveDispatcher::new(Arc::clone(&catalog));
        let compiled = CompiledDispatcher::new(&catalog);
        prop_assert_eq!(
            outcome(reflective.dispatch(&action, &args)),
            outcome(compiled.dispatch(&action, &args)),
            "{} {:?}", action, args
        );
    }

    /// Reflective and compiled dispatch agree on positional calls, errors included.
    #[test]
    fn positional_dispatchers_agree(
        action in action_name(),
        values in prop::collection::vec(raw_value(), 0..8),
    ) {
        let catalog = Arc::new(catalog());
        let args: Vec<&str> = values.iter().map(String::as_str).collect();

        let reflective = ReflectiveDispatcher::new(Arc::clone(&catalog));
        let compiled = CompiledDispatcher::new(&catalog);
        prop_assert_eq!(
            outcome(reflective.dispatch_positional(&action, &args)),
            outcome(compiled.dispatch_positional(&action, &args)),
            "{} {:?}", action, args
        );
    }

    /// A successful bind yields one value per parameter, typed as declared.
    #[test]
    fn bound_values_match_declared_types(
        values in prop::collection::vec(prop::option::weighted(0.8, raw_value()), 6),
    ) {
        let catalog = catalog();
        let descriptor = catalog.lookup("Mixed").unwrap();
        let args: Arguments = descriptor
            .parameters()
            .iter()
            .zip(values)
            .filter_map(|(param, value)| value.map(|v| (param.name().to_owned(), v)))
            .collect();

        if let Ok(bound) = bind(descriptor, &args) {
            prop_assert_eq!(bound.len(), descriptor.parameters().len());
            for (param, value) in descriptor.parameters().iter().zip(&bound) {
                match value.semantic_type() {
                    Some(ty) => prop_assert_eq!(ty, param.semantic_type()),
                    None => prop_assert!(param.is_nullable(), "{} bound to null", param.name()),
                }
            }
        }
    }

    /// Positional binding never consults defaults: the count must match exactly.
    #[test]
    fn positional_bind_checks_arity(values in prop::collection::vec(raw_value(), 0..5)) {
        let catalog = catalog();
        let descriptor = catalog.lookup("When").unwrap();
        let args: Vec<&str> = values.iter().map(String::as_str).collect();

        let result = bind_positional(descriptor, &args);
        if args.len() != 2 {
            prop_assert!(result.is_err());
        } else if let Ok(bound) = result {
            prop_assert_eq!(bound.len(), 2);
        }
    }
}
