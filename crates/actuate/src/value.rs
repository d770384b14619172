//! Typed argument values and the semantic types the binder coerces to.
//!
//! Every action parameter and return value is one of a fixed set of
//! [`SemanticType`]s. At runtime a bound argument is carried as a [`Value`];
//! at compile time the Rust type of a parameter is mapped onto a semantic
//! type through the [`ActionArg`] trait.
//!
//! | Semantic type | Rust type | Parse |
//! |---------------|-----------|-------|
//! | `String` | `String` | verbatim |
//! | `Int32` | `i32` | trimmed, invariant |
//! | `Float32` | `f32` | trimmed, invariant |
//! | `Float64` | `f64` | trimmed, invariant |
//! | `Decimal` | `rust_decimal::Decimal` | trimmed, exact decimal |
//! | `Boolean` | `bool` | `true`/`false`, any case |
//! | `DateTime` | `chrono::NaiveDateTime` | ISO-8601-like |
//! | `Enum` | `#[derive(ActionEnum)]` | variant name or ordinal |
//!
//! `Option<T>` marks a parameter as nullable.

use crate::coerce;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;

/// The kinds of value the binder knows how to coerce text into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    String,
    Int32,
    Float32,
    Float64,
    Decimal,
    Boolean,
    DateTime,
    Enum,
}

impl SemanticType {
    /// Returns the display name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "String",
            SemanticType::Int32 => "Int32",
            SemanticType::Float32 => "Float32",
            SemanticType::Float64 => "Float64",
            SemanticType::Decimal => "Decimal",
            SemanticType::Boolean => "Boolean",
            SemanticType::DateTime => "DateTime",
            SemanticType::Enum => "Enum",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bound, typed argument or action result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int32(i32),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Boolean(bool),
    DateTime(NaiveDateTime),
    /// Enum value, carried by its canonical variant name.
    Enum(String),
    /// No value; only produced for nullable parameters.
    Null,
}

impl Value {
    /// Returns the semantic type of this value, or `None` for [`Value::Null`].
    pub fn semantic_type(&self) -> Option<SemanticType> {
        match self {
            Value::String(_) => Some(SemanticType::String),
            Value::Int32(_) => Some(SemanticType::Int32),
            Value::Float32(_) => Some(SemanticType::Float32),
            Value::Float64(_) => Some(SemanticType::Float64),
            Value::Decimal(_) => Some(SemanticType::Decimal),
            Value::Boolean(_) => Some(SemanticType::Boolean),
            Value::DateTime(_) => Some(SemanticType::DateTime),
            Value::Enum(_) => Some(SemanticType::Enum),
            Value::Null => None,
        }
    }

    /// Returns `true` if this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value as the text a dispatcher returns.
    ///
    /// Each variant renders exactly as the matching [`ActionOutput`] impl, so
    /// a result produced through a `Value` and one rendered from its concrete
    /// Rust type are byte-identical.
    pub fn render(&self) -> String {
        match self {
            Value::String(s) => s.render_output(),
            Value::Int32(n) => n.render_output(),
            Value::Float32(n) => n.render_output(),
            Value::Float64(n) => n.render_output(),
            Value::Decimal(d) => d.render_output(),
            Value::Boolean(b) => b.render_output(),
            Value::DateTime(dt) => dt.render_output(),
            Value::Enum(name) => name.clone(),
            Value::Null => String::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int32(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float32(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float64(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

/// A Rust type usable as an action parameter or return value.
///
/// Implemented for every supported semantic type, for `Option<T>` (nullable)
/// and, through `#[derive(ActionEnum)]`, for fieldless enums. The `#[actions]`
/// macro requires every parameter type to implement this trait, so an
/// unsupported type is rejected at compile time.
pub trait ActionArg: Sized {
    /// The semantic type the binder coerces to.
    const SEMANTIC_TYPE: SemanticType;

    /// Whether blank input means "no value" instead of "missing".
    const NULLABLE: bool = false;

    /// Variant names for enum types, in ordinal order.
    fn variants() -> &'static [&'static str] {
        &[]
    }

    /// Converts a bound value back into the Rust type.
    fn from_value(value: Value) -> Option<Self>;

    /// Converts the Rust value into a [`Value`].
    fn into_value(self) -> Value;

    /// Coerces raw argument text with the invariant parse for this type.
    fn parse_arg(raw: &str) -> Option<Self>;

    /// The value used when the argument is absent and no default is declared.
    ///
    /// `None` means the argument is required.
    fn absent() -> Option<Self> {
        None
    }
}

/// Canonical text conversion for action results.
pub trait ActionOutput {
    fn render_output(&self) -> String;
}

impl ActionArg for String {
    const SEMANTIC_TYPE: SemanticType = SemanticType::String;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::string(raw)
    }
}

impl ActionArg for i32 {
    const SEMANTIC_TYPE: SemanticType = SemanticType::Int32;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int32(n) => Some(n),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Int32(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::int32(raw)
    }
}

impl ActionArg for f32 {
    const SEMANTIC_TYPE: SemanticType = SemanticType::Float32;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float32(n) => Some(n),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float32(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::float32(raw)
    }
}

impl ActionArg for f64 {
    const SEMANTIC_TYPE: SemanticType = SemanticType::Float64;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float64(n) => Some(n),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Float64(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::float64(raw)
    }
}

impl ActionArg for Decimal {
    const SEMANTIC_TYPE: SemanticType = SemanticType::Decimal;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Decimal(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::decimal(raw)
    }
}

impl ActionArg for bool {
    const SEMANTIC_TYPE: SemanticType = SemanticType::Boolean;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(b),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Boolean(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::boolean(raw)
    }
}

impl ActionArg for NaiveDateTime {
    const SEMANTIC_TYPE: SemanticType = SemanticType::DateTime;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        coerce::datetime(raw)
    }
}

impl<T: ActionArg> ActionArg for Option<T> {
    const SEMANTIC_TYPE: SemanticType = T::SEMANTIC_TYPE;
    const NULLABLE: bool = true;

    fn variants() -> &'static [&'static str] {
        T::variants()
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }

    fn parse_arg(raw: &str) -> Option<Self> {
        if coerce::is_blank(raw) {
            Some(None)
        } else {
            T::parse_arg(raw).map(Some)
        }
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl ActionOutput for String {
    fn render_output(&self) -> String {
        self.clone()
    }
}

impl ActionOutput for i32 {
    fn render_output(&self) -> String {
        self.to_string()
    }
}

impl ActionOutput for f32 {
    fn render_output(&self) -> String {
        self.to_string()
    }
}

impl ActionOutput for f64 {
    fn render_output(&self) -> String {
        self.to_string()
    }
}

impl ActionOutput for Decimal {
    fn render_output(&self) -> String {
        self.to_string()
    }
}

impl ActionOutput for bool {
    fn render_output(&self) -> String {
        if *self { "True" } else { "False" }.to_owned()
    }
}

impl ActionOutput for NaiveDateTime {
    fn render_output(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

impl<T: ActionOutput> ActionOutput for Option<T> {
    fn render_output(&self) -> String {
        match self {
            Some(inner) => inner.render_output(),
            None => String::new(),
        }
    }
}

impl ActionOutput for Value {
    fn render_output(&self) -> String {
        self.render()
    }
}

/// A fieldless enum usable as an action parameter.
///
/// Derive it with `#[derive(ActionEnum)]`; the derive also implements
/// [`ActionArg`] and [`ActionOutput`].
pub trait ActionEnum: Sized {
    /// Variant names in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Returns the variant at the given ordinal.
    fn from_index(index: usize) -> Option<Self>;

    /// Returns this variant's ordinal.
    fn index(&self) -> usize;

    /// Returns this variant's name.
    fn variant_name(&self) -> &'static str {
        Self::VARIANTS.get(self.index()).copied().unwrap_or_default()
    }
}
