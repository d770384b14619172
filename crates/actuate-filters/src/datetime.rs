//! Date formatting with `yyyy-MM-dd` style patterns.
//!
//! Custom patterns are built from these specifiers; everything else is copied
//! through. Quote literal text with `'...'` or `"..."`, or escape one
//! character with `\`.
//!
//! | Specifier | Meaning |
//! |-----------|---------|
//! | `yyyy`, `yy`, `y` | year, 2-digit year, year without padding |
//! | `MMMM`, `MMM`, `MM`, `M` | month name, abbreviation, number |
//! | `dddd`, `ddd`, `dd`, `d` | day name, abbreviation, day of month |
//! | `HH`, `H`, `hh`, `h` | 24-hour, 12-hour |
//! | `mm`, `m`, `ss`, `s` | minute, second |
//! | `f`..`fffffff` | fraction of a second |
//! | `F`..`FFFFFFF` | fraction of a second, trailing zeros trimmed |
//! | `tt`, `t` | AM/PM designator, first letter |
//! | `/`, `:` | date separator, time separator |
//!
//! A single-letter pattern is a standard pattern taken from the culture:
//! `d` short date, `D` long date, `t`/`T` short/long time, `f`/`F` long date
//! with short/long time, `g`/`G` short date with short/long time, `M` month
//! and day, `Y` year and month, plus the culture-independent `s`, `u` and `o`.

use crate::culture::Culture;
use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::fmt::Write;

const SORTABLE: &str = "yyyy'-'MM'-'dd'T'HH':'mm':'ss";
const UNIVERSAL: &str = "yyyy'-'MM'-'dd HH':'mm':'ss'Z'";
const ROUND_TRIP: &str = "yyyy'-'MM'-'dd'T'HH':'mm':'ss'.'fffffff";

fn standard_pattern(spec: char, culture: &Culture) -> Result<String> {
    let pattern = match spec {
        'd' => culture.short_date.to_owned(),
        'D' => culture.long_date.to_owned(),
        't' => culture.short_time.to_owned(),
        'T' => culture.long_time.to_owned(),
        'f' => format!("{} {}", culture.long_date, culture.short_time),
        'F' => format!("{} {}", culture.long_date, culture.long_time),
        'g' => format!("{} {}", culture.short_date, culture.short_time),
        'G' => format!("{} {}", culture.short_date, culture.long_time),
        'M' | 'm' => culture.month_day.to_owned(),
        'Y' | 'y' => culture.year_month.to_owned(),
        's' => SORTABLE.to_owned(),
        'u' => UNIVERSAL.to_owned(),
        'o' | 'O' => ROUND_TRIP.to_owned(),
        other => bail!("unsupported standard date format '{}'", other),
    };
    Ok(pattern)
}

/// Formats `value` with a standard or custom pattern.
pub fn format(value: &NaiveDateTime, pattern: &str, culture: &Culture) -> Result<String> {
    let mut chars = pattern.chars();
    if let (Some(spec), None) = (chars.next(), chars.next()) {
        let expanded = standard_pattern(spec, culture)?;
        return format_custom(value, &expanded, culture);
    }
    format_custom(value, pattern, culture)
}

fn format_custom(value: &NaiveDateTime, pattern: &str, culture: &Culture) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();

        match c {
            'y' => {
                let year = value.year();
                match run {
                    1 => write!(out, "{}", year % 100)?,
                    2 => write!(out, "{:02}", year % 100)?,
                    n => write!(out, "{:0width$}", year, width = n)?,
                }
            }
            'M' => {
                let month = value.month0() as usize;
                match run {
                    1 => write!(out, "{}", month + 1)?,
                    2 => write!(out, "{:02}", month + 1)?,
                    3 => out.push_str(culture.months_abbr[month]),
                    _ => out.push_str(culture.months[month]),
                }
            }
            'd' => {
                let weekday = value.weekday().num_days_from_sunday() as usize;
                match run {
                    1 => write!(out, "{}", value.day())?,
                    2 => write!(out, "{:02}", value.day())?,
                    3 => out.push_str(culture.days_abbr[weekday]),
                    _ => out.push_str(culture.days[weekday]),
                }
            }
            'H' => pad(&mut out, value.hour(), run)?,
            'h' => {
                let hour = match value.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                pad(&mut out, hour, run)?;
            }
            'm' => pad(&mut out, value.minute(), run)?,
            's' => pad(&mut out, value.second(), run)?,
            'f' | 'F' => {
                if run > 7 {
                    bail!("too many fraction specifiers in '{}'", pattern);
                }
                let nanos = value.nanosecond() % 1_000_000_000;
                let digits = format!("{:09}", nanos);
                let digits = &digits[..run];
                if c == 'f' {
                    out.push_str(digits);
                } else {
                    out.push_str(digits.trim_end_matches('0'));
                }
            }
            't' => {
                let designator = if value.hour() < 12 { culture.am } else { culture.pm };
                if run == 1 {
                    out.extend(designator.chars().next());
                } else {
                    out.push_str(designator);
                }
            }
            '/' => {
                for _ in 0..run {
                    out.push_str(culture.date_separator);
                }
            }
            '\'' | '"' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&x| x == c)
                    .map(|p| i + 1 + p);
                let Some(close) = close else {
                    bail!("unterminated quote in date format '{}'", pattern);
                };
                out.extend(&chars[i + 1..close]);
                i = close + 1;
                continue;
            }
            '\\' => {
                let Some(&next) = chars.get(i + 1) else {
                    bail!("trailing escape in date format '{}'", pattern);
                };
                out.push(next);
                i += 2;
                continue;
            }
            '%' => {
                i += 1;
                continue;
            }
            _ => {
                for _ in 0..run {
                    out.push(c);
                }
            }
        }

        i += run;
    }

    Ok(out)
}

fn pad(out: &mut String, n: u32, run: usize) -> std::fmt::Result {
    if run == 1 {
        write!(out, "{}", n)
    } else {
        write!(out, "{:02}", n)
    }
}
