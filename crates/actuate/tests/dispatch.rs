//! Facade-level behavior over a hand-built catalog.

use actuate::{
    arguments, ActionDescriptor, ActionDispatch, Catalog, CompiledDispatcher, ConfigError,
    DispatchConfig, Dispatcher, ErrorKind, ParameterDescriptor, ReflectiveDispatcher, SemanticType,
    Strategy, Value,
};
use std::sync::Arc;
use std::thread;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn catalog() -> Catalog {
    Catalog::builder()
        .action(ActionDescriptor::new(
            "Scale",
            vec![
                ParameterDescriptor::required("input", SemanticType::Decimal),
                ParameterDescriptor::required("factor", SemanticType::Int32).with_default(10),
            ],
            |args| match args.as_slice() {
                [Value::Decimal(d), Value::Int32(f)] => Ok(Value::Decimal(*d * rust_decimal::Decimal::from(*f))),
                _ => anyhow::bail!("unexpected arguments"),
            },
        ))
        .action(ActionDescriptor::new(
            "Stamp",
            vec![ParameterDescriptor::required("at", SemanticType::DateTime)],
            |args| match args.as_slice() {
                [Value::DateTime(dt)] => Ok(Value::DateTime(*dt)),
                _ => anyhow::bail!("unexpected arguments"),
            },
        ))
        .action(ActionDescriptor::new(
            "Flag",
            vec![ParameterDescriptor::required("on", SemanticType::Boolean)],
            |args| match args.as_slice() {
                [Value::Boolean(b)] => Ok(Value::Boolean(!b)),
                _ => anyhow::bail!("unexpected arguments"),
            },
        ))
        .build()
        .unwrap()
}

fn build(strategy: Strategy) -> Result<ActionDispatch, ConfigError> {
    ActionDispatch::builder()
        .config(DispatchConfig::new(strategy))
        .catalog(catalog())
        .build()
}

#[test]
fn runtime_strategies_agree() {
    init_tracing();

    let reflective = build(Strategy::Reflective).unwrap();
    let compiled = build(Strategy::Compiled).unwrap();

    let cases = [
        ("Scale", arguments([("input", "1.05")])),
        ("Scale", arguments([("input", "1.05"), ("factor", "3")])),
        ("Scale", arguments([("input", "1,05")])),
        ("Stamp", arguments([("at", "2024-12-31 23:59:59.5")])),
        ("Stamp", arguments([("at", "2025-01-01T00:00:00+01:00")])),
        ("Flag", arguments([("on", "TRUE")])),
        ("Flag", arguments([("on", "1")])),
        ("Flag", arguments::<_, &str, &str>([])),
    ];

    for (action, args) in &cases {
        let a = reflective.dispatch(action, args).map_err(|e| (e.kind(), e.to_string()));
        let b = compiled.dispatch(action, args).map_err(|e| (e.kind(), e.to_string()));
        assert_eq!(a, b, "{} {:?}", action, args);
    }

    assert_eq!(reflective.dispatch("Scale", &cases[0].1).unwrap(), "10.50");
    assert_eq!(
        reflective.dispatch("Stamp", &cases[3].1).unwrap(),
        "2024-12-31T23:59:59.500"
    );
    assert_eq!(
        reflective.dispatch("Stamp", &cases[4].1).unwrap(),
        "2024-12-31T23:00:00"
    );
    assert_eq!(reflective.dispatch("Flag", &cases[5].1).unwrap(), "False");
}

#[test]
fn generated_strategy_needs_a_dispatcher() {
    let err = build(Strategy::Generated).unwrap_err();
    assert_eq!(
        err,
        ConfigError::MissingComponent {
            strategy: Strategy::Generated,
            component: "a generated dispatcher",
        }
    );
}

#[test]
fn strategy_from_config_text() {
    for (text, expected) in [
        ("strategy: reflection\n", Strategy::Reflective),
        ("strategy: Closure\n", Strategy::Compiled),
        ("strategy: GENERATED\n", Strategy::Generated),
    ] {
        let config = DispatchConfig::from_yaml(text).unwrap();
        assert_eq!(config.strategy, text.trim_start_matches("strategy: ").parse::<Strategy>().unwrap());
        assert_eq!(config.strategy, expected);
    }

    let config = DispatchConfig::from_json(r#"{"strategy":"reflective"}"#).unwrap();
    let dispatch = ActionDispatch::builder()
        .config(config)
        .catalog(catalog())
        .build()
        .unwrap();
    assert_eq!(dispatch.strategy(), Strategy::Reflective);
}

#[test]
fn dispatch_is_shareable_across_threads() {
    init_tracing();

    let dispatch = Arc::new(build(Strategy::Compiled).unwrap());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatch = Arc::clone(&dispatch);
            thread::spawn(move || {
                let args = arguments([("input", "2"), ("factor", i.to_string().as_str())]);
                dispatch.dispatch("Scale", &args).unwrap()
            })
        })
        .collect();

    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let expected: Vec<String> = (0..8).map(|i| (2 * i).to_string()).collect();
    assert_eq!(results, expected);
}

#[test]
fn dispatchers_can_be_used_without_the_facade() {
    let catalog = Arc::new(catalog());
    let dispatchers: Vec<Box<dyn Dispatcher>> = vec![
        Box::new(ReflectiveDispatcher::new(Arc::clone(&catalog))),
        Box::new(CompiledDispatcher::new(&catalog)),
    ];

    for d in &dispatchers {
        assert_eq!(d.dispatch_positional("Scale", &["0.5", "4"]).unwrap(), "2.0");
        let err = d.dispatch_positional("Scale", &["0.5"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityMismatch, "{}", d.strategy());
        let err = d.dispatch("scale", &arguments([("input", "1")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ActionNotFound);
    }
}
