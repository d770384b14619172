//! Formatting filter actions.
//!
//! The functions on [`Filters`] are registered with `#[actions]`, which
//! produces both [`Filters::catalog`] and the compile-time
//! [`FilterDispatcher`]. Use [`dispatch`] to get a ready facade:
//!
//! ```rust
//! use actuate::Strategy;
//!
//! let filters = actuate_filters::dispatch(Strategy::Generated)?;
//! let out = filters
//!     .dispatch("UppercaseFirst", &actuate::arguments([("input", "capitalize")]))
//!     .unwrap();
//! assert_eq!(out, "Capitalize");
//! # Ok::<(), actuate::ConfigError>(())
//! ```
//!
//! Cultures are passed explicitly by name (`en-US`, `en-GB`, `nl-NL`, `de-DE`,
//! `fr-FR`, or `""` for invariant) and never taken from the environment.

pub mod culture;
pub mod datetime;
pub mod number;

use actuate::{actions, ActionDispatch, ActionEnum, ConfigError, Strategy};
use anyhow::{bail, Context, Result};
use base64::Engine as _;
use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;

/// Which side of the input [`Filters::pad`] fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ActionEnum)]
pub enum Side {
    #[default]
    Left,
    Right,
    Both,
}

/// Invocation counters for the side-effect actions.
pub mod counters {
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub static DO_SOMETHING: AtomicUsize = AtomicUsize::new(0);
    pub static DO_SOMETHING_ELSE: AtomicUsize = AtomicUsize::new(0);
    pub static DO_SOMETHING_ELSE_ENTIRELY: AtomicUsize = AtomicUsize::new(0);

    pub(crate) fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// The formatting actions.
pub struct Filters;

#[actions(dispatcher = FilterDispatcher)]
impl Filters {
    /// Returns the input unchanged.
    pub fn raw(input: String) -> String {
        input
    }

    /// Escapes HTML special characters and Latin-1 symbols.
    pub fn html_encode(input: String) -> String {
        let mut out = String::with_capacity(input.len());
        for ch in input.chars() {
            match ch {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                '\u{a0}'..='\u{ff}' => out.push_str(&format!("&#{};", ch as u32)),
                _ => out.push(ch),
            }
        }
        out
    }

    /// Form-encodes the input (`a b&c` → `a+b%26c`).
    pub fn url_encode(input: String) -> String {
        url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
    }

    /// Decodes `+` and `%XX` escapes. Malformed escapes are kept as written.
    pub fn url_decode(input: String) -> Result<String> {
        let bytes = input.as_bytes();
        let mut decoded = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'+' => decoded.push(b' '),
                b'%' => match bytes.get(i + 1..i + 3).and_then(hex_pair) {
                    Some(byte) => {
                        decoded.push(byte);
                        i += 3;
                        continue;
                    }
                    None => decoded.push(b'%'),
                },
                b => decoded.push(b),
            }
            i += 1;
        }
        String::from_utf8(decoded).context("decoded bytes are not valid UTF-8")
    }

    /// Truncates to at most `max_length` characters, counting the suffix.
    pub fn cut_string(
        input: String,
        max_length: i32,
        #[param(default = "")] suffix: String,
    ) -> Result<String> {
        if max_length < 0 {
            bail!("maxLength must not be negative, got {}", max_length);
        }
        let max = max_length as usize;
        if input.chars().count() <= max {
            return Ok(input);
        }
        let suffix: String = suffix.chars().take(max).collect();
        let keep = max - suffix.chars().count();
        let mut out: String = input.chars().take(keep).collect();
        out.push_str(&suffix);
        Ok(out)
    }

    /// Escapes the input for embedding inside a JSON string literal.
    pub fn json_safe(input: String) -> Result<String> {
        let quoted = serde_json::to_string(&input)?;
        Ok(quoted[1..quoted.len() - 1].to_owned())
    }

    /// Removes HTML tags.
    pub fn strip_html(input: String) -> Result<String> {
        let tags = Regex::new(r"<[^>]*>")?;
        Ok(tags.replace_all(&input, "").into_owned())
    }

    /// Removes `style="..."` attributes.
    pub fn strip_inline_style(input: String) -> Result<String> {
        let style = Regex::new(r#"(?i)\s*style\s*=\s*("[^"]*"|'[^']*')"#)?;
        Ok(style.replace_all(&input, "").into_owned())
    }

    #[action(name = "Base64")]
    pub fn base64_encode(input: String) -> String {
        base64::engine::general_purpose::STANDARD.encode(input.as_bytes())
    }

    pub fn uppercase_first(input: String) -> String {
        let mut chars = input.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn lowercase_first(input: String) -> String {
        let mut chars = input.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Unicode case mapping is the same in every culture here, so
    /// `useInvariantCulture` does not change the result.
    pub fn uppercase(
        input: String,
        #[param(name = "useInvariantCulture", default = true)] _use_invariant_culture: bool,
    ) -> String {
        input.to_uppercase()
    }

    /// See [`Filters::uppercase`].
    pub fn lowercase(
        input: String,
        #[param(name = "useInvariantCulture", default = true)] _use_invariant_culture: bool,
    ) -> String {
        input.to_lowercase()
    }

    pub fn replace(
        input: String,
        old_value: String,
        #[param(default = "")] new_value: String,
    ) -> Result<String> {
        if old_value.is_empty() {
            bail!("oldValue must not be empty");
        }
        Ok(input.replace(&old_value, &new_value))
    }

    /// Formats a number with a standard numeric format (`N2`, `F0`, `C`, `G`).
    pub fn format_number(
        input: Decimal,
        #[param(default = "N2")] number_format: String,
        #[param(default = "en-US")] culture_name: String,
    ) -> Result<String> {
        let culture = culture::lookup(&culture_name)?;
        number::format(input, &number_format, culture)
    }

    /// Formats an amount as currency.
    ///
    /// In `nl-NL`, whole amounts end in `,-` instead of `,00`.
    pub fn currency(
        input: Decimal,
        #[param(default = true)] include_currency_symbol: bool,
        #[param(default = "en-US")] culture_name: String,
    ) -> Result<String> {
        format_currency(input, include_currency_symbol, &culture_name, |f| f.to_owned())
    }

    /// [`Filters::currency`] with the decimals in `<sup>`.
    pub fn currency_sup(
        input: Decimal,
        #[param(default = true)] include_currency_symbol: bool,
        #[param(default = "en-US")] culture_name: String,
    ) -> Result<String> {
        format_currency(input, include_currency_symbol, &culture_name, |f| {
            format!("<sup>{}</sup>", f)
        })
    }

    /// Formats a date with a custom or single-letter standard pattern.
    #[action(name = "DateTime")]
    pub fn date_time(
        input: NaiveDateTime,
        #[param(default = "yyyy-MM-dd")] format: String,
        #[param(default = "en-US")] culture: String,
    ) -> Result<String> {
        let culture = culture::lookup(&culture)?;
        datetime::format(&input, &format, culture)
    }

    /// Rounds half away from zero, to `digits` places when given.
    pub fn round(input: f64, digits: Option<i32>) -> Result<f64> {
        match digits {
            None => Ok(input.round()),
            Some(d) if (0..=15).contains(&d) => {
                let factor = 10f64.powi(d);
                Ok((input * factor).round() / factor)
            }
            Some(d) => bail!("digits must be between 0 and 15, got {}", d),
        }
    }

    /// Pads to `width` characters with spaces.
    pub fn pad(input: String, width: i32, #[param(default = Side::Left)] side: Side) -> String {
        let len = input.chars().count();
        let fill = (width.max(0) as usize).saturating_sub(len);
        let (left, right) = match side {
            Side::Left => (fill, 0),
            Side::Right => (0, fill),
            Side::Both => (fill / 2, fill - fill / 2),
        };
        format!("{}{}{}", " ".repeat(left), input, " ".repeat(right))
    }

    pub fn do_something(message: String, count: i32) -> String {
        counters::bump(&counters::DO_SOMETHING);
        format!("{} x{}", message, count)
    }

    pub fn do_something_else(value: f32) -> f32 {
        counters::bump(&counters::DO_SOMETHING_ELSE);
        value * 2.0
    }

    pub fn do_something_else_entirely() -> bool {
        counters::bump(&counters::DO_SOMETHING_ELSE_ENTIRELY);
        true
    }
}

fn hex_pair(pair: &[u8]) -> Option<u8> {
    if !pair.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(pair).ok()?;
    u8::from_str_radix(text, 16).ok()
}

fn format_currency(
    input: Decimal,
    include_symbol: bool,
    culture_name: &str,
    fraction: impl Fn(&str) -> String,
) -> Result<String> {
    let culture = culture::lookup(culture_name)?;
    let parts = number::Parts::new(input, 2, culture, true);

    let fraction_text = if culture.name == culture::NL_NL.name && parts.fraction == "00" {
        "-".to_owned()
    } else {
        parts.fraction.clone()
    };
    let amount = format!(
        "{}{}{}",
        parts.integer,
        culture.decimal_separator,
        fraction(&fraction_text)
    );

    if include_symbol {
        Ok(parts.with_symbol(&amount, culture))
    } else if parts.negative {
        Ok(format!("-{}", amount))
    } else {
        Ok(amount)
    }
}

/// Builds a facade over the filter actions with the given strategy.
pub fn dispatch(strategy: Strategy) -> std::result::Result<ActionDispatch, ConfigError> {
    ActionDispatch::builder()
        .strategy(strategy)
        .catalog(Filters::catalog()?)
        .generated(FilterDispatcher)
        .build()
}
