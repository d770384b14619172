//! Standard numeric format strings (`G`, `N2`, `F0`, `C`, ...) over `Decimal`.
//!
//! | Specifier | Output | Default precision |
//! |-----------|--------|-------------------|
//! | `G` | shortest exact digits, no grouping | all |
//! | `N` | grouped | 2 |
//! | `F` | ungrouped | 2 |
//! | `C` | currency, grouped | 2 |
//!
//! Rounding is half away from zero.

use crate::culture::{Culture, SymbolPlacement};
use anyhow::{bail, Context, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// A number split into the pieces culture formatting rearranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parts {
    pub negative: bool,
    /// Integer digits, already grouped.
    pub integer: String,
    /// Fraction digits, without separator. Empty for precision 0.
    pub fraction: String,
}

impl Parts {
    /// Rounds to `precision` places and splits.
    pub fn new(value: Decimal, precision: u32, culture: &Culture, grouped: bool) -> Self {
        let rounded = value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = format!("{:.*}", precision as usize, rounded.abs());

        let (integer, fraction) = match text.split_once('.') {
            Some((i, f)) => (i.to_owned(), f.to_owned()),
            None => (text, String::new()),
        };

        let integer = if grouped {
            group_digits(&integer, culture.group_separator)
        } else {
            integer
        };

        Self {
            negative,
            integer,
            fraction,
        }
    }

    /// `1,234.50` in the given culture.
    pub fn number(&self, culture: &Culture) -> String {
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        out.push_str(&self.integer);
        if !self.fraction.is_empty() {
            out.push_str(culture.decimal_separator);
            out.push_str(&self.fraction);
        }
        out
    }

    /// Places the currency symbol around an already rendered unsigned amount.
    pub fn with_symbol(&self, amount: &str, culture: &Culture) -> String {
        let sign = if self.negative { "-" } else { "" };
        let symbol = culture.currency_symbol;
        match culture.placement {
            SymbolPlacement::Before => format!("{}{}{}", sign, symbol, amount),
            SymbolPlacement::BeforeSpaced => format!("{} {}{}", symbol, sign, amount),
            SymbolPlacement::AfterSpaced => format!("{}{}\u{a0}{}", sign, amount, symbol),
        }
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

fn parse_specifier(format: &str) -> Result<(char, Option<u32>)> {
    let format = format.trim();
    let mut chars = format.chars();
    let Some(kind) = chars.next() else {
        return Ok(('G', None));
    };

    let digits = chars.as_str();
    let precision = if digits.is_empty() {
        None
    } else {
        let p: u32 = digits
            .parse()
            .with_context(|| format!("invalid numeric format '{}'", format))?;
        if p > 28 {
            bail!("precision {} in '{}' is out of range", p, format);
        }
        Some(p)
    };

    Ok((kind.to_ascii_uppercase(), precision))
}

/// Formats `value` with a standard numeric format string.
pub fn format(value: Decimal, format: &str, culture: &Culture) -> Result<String> {
    let (kind, precision) = parse_specifier(format)?;
    match kind {
        'G' => {
            let value = match precision {
                Some(p) if p > 0 => round_significant(value, p)?,
                _ => value,
            };
            Ok(Parts::new(value.normalize(), value.normalize().scale(), culture, false).number(culture))
        }
        'N' => Ok(Parts::new(value, precision.unwrap_or(2), culture, true).number(culture)),
        'F' => Ok(Parts::new(value, precision.unwrap_or(2), culture, false).number(culture)),
        'C' => {
            let parts = Parts::new(value, precision.unwrap_or(2), culture, true);
            let unsigned = Parts {
                negative: false,
                ..parts.clone()
            };
            Ok(parts.with_symbol(&unsigned.number(culture), culture))
        }
        other => bail!("unsupported numeric format '{}'", other),
    }
}

fn round_significant(value: Decimal, digits: u32) -> Result<Decimal> {
    let magnitude = value.abs().normalize();
    if magnitude.is_zero() {
        return Ok(value);
    }

    let text = magnitude.to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let places = if integer != "0" {
        digits as i64 - integer.len() as i64
    } else {
        let leading_zeros = fraction.len() - fraction.trim_start_matches('0').len();
        digits as i64 + leading_zeros as i64
    };

    if places >= 0 {
        return Ok(value.round_dp_with_strategy(
            places.min(28) as u32,
            RoundingStrategy::MidpointAwayFromZero,
        ));
    }

    let overflow = || anyhow::anyhow!("{} cannot be rounded to {} significant digits", value, digits);
    let factor = (0..-places).try_fold(Decimal::ONE, |f, _| f.checked_mul(Decimal::TEN));
    let factor = factor.ok_or_else(overflow)?;
    value
        .checked_div(factor)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.checked_mul(factor))
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::{DE_DE, EN_US, FR_FR, INVARIANT, NL_NL};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_n2_default() {
        assert_eq!(format(d("12345.6789"), "N2", &EN_US).unwrap(), "12,345.68");
        assert_eq!(format(d("12345.6789"), "N2", &NL_NL).unwrap(), "12.345,68");
        assert_eq!(format(d("12345.6789"), "N", &INVARIANT).unwrap(), "12,345.68");
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(format(d("2.345"), "F2", &EN_US).unwrap(), "2.35");
        assert_eq!(format(d("-2.345"), "F2", &EN_US).unwrap(), "-2.35");
        assert_eq!(format(d("0.5"), "N0", &EN_US).unwrap(), "1");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(format(d("1234567"), "N0", &EN_US).unwrap(), "1,234,567");
        assert_eq!(format(d("123"), "N0", &EN_US).unwrap(), "123");
        assert_eq!(format(d("1234.5"), "N1", &FR_FR).unwrap(), "1\u{202F}234,5");
    }

    #[test]
    fn test_general() {
        assert_eq!(format(d("12345.6789"), "G", &EN_US).unwrap(), "12345.6789");
        assert_eq!(format(d("1.500"), "G", &DE_DE).unwrap(), "1,5");
        assert_eq!(format(d("12345.6789"), "G6", &EN_US).unwrap(), "12345.7");
        assert_eq!(format(d("0.0012345"), "G2", &EN_US).unwrap(), "0.0012");
    }

    #[test]
    fn test_currency() {
        assert_eq!(format(d("1234.5"), "C", &EN_US).unwrap(), "$1,234.50");
        assert_eq!(format(d("-1234.5"), "C", &EN_US).unwrap(), "-$1,234.50");
        assert_eq!(format(d("1234.5"), "C", &NL_NL).unwrap(), "€ 1.234,50");
        assert_eq!(format(d("-1234.5"), "C", &NL_NL).unwrap(), "€ -1.234,50");
        assert_eq!(format(d("1234.5"), "C", &DE_DE).unwrap(), "1.234,50\u{a0}€");
    }

    #[test]
    fn test_significant_rounding_overflow_is_an_error() {
        let err = format(Decimal::MAX, "G1", &EN_US).unwrap_err();
        assert!(err.to_string().contains("significant digits"));
        assert_eq!(format(d("-987654"), "G2", &EN_US).unwrap(), "-990000");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format(d("-0.001"), "N2", &EN_US).unwrap(), "0.00");
    }

    #[test]
    fn test_invalid_specifiers() {
        assert!(format(d("1"), "X", &EN_US).is_err());
        assert!(format(d("1"), "Nx", &EN_US).is_err());
        assert!(format(d("1"), "N99", &EN_US).is_err());
    }
}
