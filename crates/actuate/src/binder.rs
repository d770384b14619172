//! The argument binder.
//!
//! Turns string arguments into the ordered, typed value list an action's
//! callable expects. Applied per parameter in declaration order:
//!
//! ```text
//! lookup(name)
//!   absent or blank → optional? default : MissingRequiredArgument
//!   present         → invariant coercion to the semantic type
//!                       failure → TypeCoercionFailed
//! ```
//!
//! Keys in the mapping that name no parameter are ignored.
//!
//! The compiled and generated dispatchers never call [`bind`]; they inline
//! the same sequence per action. Any divergence from it is a bug, which is
//! what the cross-strategy tests check.

use crate::catalog::{ActionDescriptor, ParameterDescriptor};
use crate::coerce;
use crate::error::BindError;
use crate::value::Value;
use std::collections::HashMap;

/// Named arguments: parameter name to raw text.
pub type Arguments = HashMap<String, String>;

/// Builds an [`Arguments`] map from pairs.
///
/// ```rust
/// let args = actuate::arguments([("input", "capitalize")]);
/// assert_eq!(args["input"], "capitalize");
/// ```
pub fn arguments<I, K, V>(pairs: I) -> Arguments
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Returns the argument's text if it is present and not blank.
pub fn lookup<'a>(args: &'a Arguments, name: &str) -> Option<&'a str> {
    args.get(name)
        .map(String::as_str)
        .filter(|raw| !coerce::is_blank(raw))
}

/// Binds named arguments to a descriptor's parameters.
pub fn bind(descriptor: &ActionDescriptor, args: &Arguments) -> Result<Vec<Value>, BindError> {
    descriptor
        .parameters()
        .iter()
        .map(|param| bind_named(param, args))
        .collect()
}

/// Binds positional arguments.
///
/// Every position must be supplied; defaults are never consulted. A blank
/// value for a nullable parameter binds to [`Value::Null`].
pub fn bind_positional(
    descriptor: &ActionDescriptor,
    args: &[&str],
) -> Result<Vec<Value>, BindError> {
    let params = descriptor.parameters();
    if params.len() != args.len() {
        return Err(BindError::ArityMismatch {
            expected: params.len(),
            actual: args.len(),
        });
    }

    params
        .iter()
        .zip(args)
        .map(|(param, raw)| bind_position(param, raw))
        .collect()
}

fn bind_named(param: &ParameterDescriptor, args: &Arguments) -> Result<Value, BindError> {
    match lookup(args, param.name()) {
        Some(raw) => coerce_parameter(param, raw),
        None => param
            .fallback()
            .ok_or_else(|| BindError::MissingRequiredArgument {
                parameter: param.name().to_owned(),
            }),
    }
}

fn bind_position(param: &ParameterDescriptor, raw: &str) -> Result<Value, BindError> {
    if param.is_nullable() && coerce::is_blank(raw) {
        return Ok(Value::Null);
    }
    coerce_parameter(param, raw)
}

/// Coerces raw text to a parameter's semantic type.
pub fn coerce_parameter(param: &ParameterDescriptor, raw: &str) -> Result<Value, BindError> {
    coerce::to_value(param.semantic_type(), param.variants(), raw).ok_or_else(|| {
        BindError::TypeCoercionFailed {
            parameter: param.name().to_owned(),
            expected: param.semantic_type(),
            raw: raw.to_owned(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SemanticType;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn cut_string() -> ActionDescriptor {
        ActionDescriptor::new(
            "CutString",
            vec![
                ParameterDescriptor::required("input", SemanticType::String),
                ParameterDescriptor::required("maxLength", SemanticType::Int32),
                ParameterDescriptor::required("suffix", SemanticType::String).with_default(""),
            ],
            |_| Ok(Value::Null),
        )
    }

    #[test]
    fn test_binds_in_declaration_order() {
        let args = arguments([("suffix", "..."), ("input", "text"), ("maxLength", "10")]);
        let values = bind(&cut_string(), &args).unwrap();
        assert_eq!(
            values,
            vec![Value::from("text"), Value::Int32(10), Value::from("...")]
        );
    }

    #[test]
    fn test_missing_required() {
        let args = arguments([("input", "text")]);
        assert_eq!(
            bind(&cut_string(), &args).unwrap_err(),
            BindError::MissingRequiredArgument {
                parameter: "maxLength".into()
            }
        );
    }

    #[test]
    fn test_blank_required_is_missing() {
        let args = arguments([("input", "   "), ("maxLength", "10")]);
        assert_eq!(
            bind(&cut_string(), &args).unwrap_err(),
            BindError::MissingRequiredArgument {
                parameter: "input".into()
            }
        );
    }

    #[test]
    fn test_default_substitution() {
        let omitted = bind(&cut_string(), &arguments([("input", "a"), ("maxLength", "1")])).unwrap();
        let empty = bind(
            &cut_string(),
            &arguments([("input", "a"), ("maxLength", "1"), ("suffix", "")]),
        )
        .unwrap();
        let whitespace = bind(
            &cut_string(),
            &arguments([("input", "a"), ("maxLength", "1"), ("suffix", " \t ")]),
        )
        .unwrap();
        let explicit = bind(
            &cut_string(),
            &arguments([("input", "a"), ("maxLength", "1"), ("suffix", "")]),
        )
        .unwrap();

        assert_eq!(omitted, explicit);
        assert_eq!(empty, explicit);
        assert_eq!(whitespace, explicit);
    }

    #[test]
    fn test_coercion_failure_reports_field() {
        let args = arguments([("input", "text"), ("maxLength", "ten")]);
        assert_eq!(
            bind(&cut_string(), &args).unwrap_err(),
            BindError::TypeCoercionFailed {
                parameter: "maxLength".into(),
                expected: SemanticType::Int32,
                raw: "ten".into(),
            }
        );
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let args = arguments([("input", "text"), ("maxLength", "3"), ("colour", "red")]);
        assert!(bind(&cut_string(), &args).is_ok());
    }

    #[test]
    fn test_first_failure_in_declaration_order_wins() {
        let args = arguments([("maxLength", "ten")]);
        assert_eq!(
            bind(&cut_string(), &args).unwrap_err(),
            BindError::MissingRequiredArgument {
                parameter: "input".into()
            }
        );
    }

    #[test]
    fn test_nullable() {
        let descriptor = ActionDescriptor::new(
            "Round",
            vec![
                ParameterDescriptor::required("input", SemanticType::Decimal),
                ParameterDescriptor::required("digits", SemanticType::Int32).nullable(),
            ],
            |_| Ok(Value::Null),
        );

        let values = bind(&descriptor, &arguments([("input", "1.25"), ("digits", " ")])).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Decimal(Decimal::from_str("1.25").unwrap()),
                Value::Null
            ]
        );

        let values = bind(&descriptor, &arguments([("input", "1.25"), ("digits", "1")])).unwrap();
        assert_eq!(values[1], Value::Int32(1));
    }

    #[test]
    fn test_positional_requires_every_position() {
        let err = bind_positional(&cut_string(), &["text", "10"]).unwrap_err();
        assert_eq!(
            err,
            BindError::ArityMismatch {
                expected: 3,
                actual: 2
            }
        );

        let err = bind_positional(&cut_string(), &["text", "10", "...", "extra"]).unwrap_err();
        assert!(matches!(err, BindError::ArityMismatch { actual: 4, .. }));
    }

    #[test]
    fn test_positional_never_defaults() {
        let values = bind_positional(&cut_string(), &["text", "10", ""]).unwrap();
        assert_eq!(values[2], Value::from(""));

        let err = bind_positional(&cut_string(), &["text", "", "..."]).unwrap_err();
        assert!(matches!(err, BindError::TypeCoercionFailed { .. }));
    }

    #[test]
    fn test_enum_coercion() {
        let descriptor = ActionDescriptor::new(
            "Pad",
            vec![ParameterDescriptor::required("side", SemanticType::Enum)
                .with_variants(["Left", "Right"])],
            |_| Ok(Value::Null),
        );
        let values = bind(&descriptor, &arguments([("side", "Right")])).unwrap();
        assert_eq!(values, vec![Value::Enum("Right".into())]);

        let values = bind(&descriptor, &arguments([("side", "0")])).unwrap();
        assert_eq!(values, vec![Value::Enum("Left".into())]);

        let err = bind(&descriptor, &arguments([("side", "Up")])).unwrap_err();
        assert!(matches!(
            err,
            BindError::TypeCoercionFailed {
                expected: SemanticType::Enum,
                ..
            }
        ));
    }
}
