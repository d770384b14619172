//! Culture data for number, currency and date formatting.
//!
//! Cultures are explicit arguments, never read from the process environment.
//! Only a fixed table is known; anything else is an error.

use anyhow::{bail, Result};

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPlacement {
    /// `$1.00`, negative `-$1.00`
    Before,
    /// `€ 1,00`, negative `€ -1,00`
    BeforeSpaced,
    /// `1,00 €`, negative `-1,00 €`
    AfterSpaced,
}

#[derive(Debug)]
pub struct Culture {
    pub name: &'static str,
    pub decimal_separator: &'static str,
    pub group_separator: &'static str,
    pub currency_symbol: &'static str,
    pub placement: SymbolPlacement,
    pub date_separator: &'static str,
    pub short_date: &'static str,
    pub long_date: &'static str,
    pub short_time: &'static str,
    pub long_time: &'static str,
    pub month_day: &'static str,
    pub year_month: &'static str,
    pub am: &'static str,
    pub pm: &'static str,
    pub months: [&'static str; 12],
    pub months_abbr: [&'static str; 12],
    /// Sunday first.
    pub days: [&'static str; 7],
    pub days_abbr: [&'static str; 7],
}

const ENGLISH_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const ENGLISH_MONTHS_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const ENGLISH_DAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];
const ENGLISH_DAYS_ABBR: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub static INVARIANT: Culture = Culture {
    name: "",
    decimal_separator: ".",
    group_separator: ",",
    currency_symbol: "¤",
    placement: SymbolPlacement::Before,
    date_separator: "/",
    short_date: "MM/dd/yyyy",
    long_date: "dddd, dd MMMM yyyy",
    short_time: "HH:mm",
    long_time: "HH:mm:ss",
    month_day: "MMMM dd",
    year_month: "yyyy MMMM",
    am: "AM",
    pm: "PM",
    months: ENGLISH_MONTHS,
    months_abbr: ENGLISH_MONTHS_ABBR,
    days: ENGLISH_DAYS,
    days_abbr: ENGLISH_DAYS_ABBR,
};

pub static EN_US: Culture = Culture {
    name: "en-US",
    decimal_separator: ".",
    group_separator: ",",
    currency_symbol: "$",
    placement: SymbolPlacement::Before,
    date_separator: "/",
    short_date: "M/d/yyyy",
    long_date: "dddd, MMMM d, yyyy",
    short_time: "h:mm tt",
    long_time: "h:mm:ss tt",
    month_day: "MMMM d",
    year_month: "MMMM yyyy",
    am: "AM",
    pm: "PM",
    months: ENGLISH_MONTHS,
    months_abbr: ENGLISH_MONTHS_ABBR,
    days: ENGLISH_DAYS,
    days_abbr: ENGLISH_DAYS_ABBR,
};

pub static EN_GB: Culture = Culture {
    name: "en-GB",
    decimal_separator: ".",
    group_separator: ",",
    currency_symbol: "£",
    placement: SymbolPlacement::Before,
    date_separator: "/",
    short_date: "dd/MM/yyyy",
    long_date: "dddd, d MMMM yyyy",
    short_time: "HH:mm",
    long_time: "HH:mm:ss",
    month_day: "d MMMM",
    year_month: "MMMM yyyy",
    am: "am",
    pm: "pm",
    months: ENGLISH_MONTHS,
    months_abbr: ENGLISH_MONTHS_ABBR,
    days: ENGLISH_DAYS,
    days_abbr: ENGLISH_DAYS_ABBR,
};

pub static NL_NL: Culture = Culture {
    name: "nl-NL",
    decimal_separator: ",",
    group_separator: ".",
    currency_symbol: "€",
    placement: SymbolPlacement::BeforeSpaced,
    date_separator: "-",
    short_date: "d-M-yyyy",
    long_date: "dddd d MMMM yyyy",
    short_time: "HH:mm",
    long_time: "HH:mm:ss",
    month_day: "d MMMM",
    year_month: "MMMM yyyy",
    am: "a.m.",
    pm: "p.m.",
    months: [
        "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus", "september",
        "oktober", "november", "december",
    ],
    months_abbr: [
        "jan", "feb", "mrt", "apr", "mei", "jun", "jul", "aug", "sep", "okt", "nov", "dec",
    ],
    days: [
        "zondag", "maandag", "dinsdag", "woensdag", "donderdag", "vrijdag", "zaterdag",
    ],
    days_abbr: ["zo", "ma", "di", "wo", "do", "vr", "za"],
};

pub static DE_DE: Culture = Culture {
    name: "de-DE",
    decimal_separator: ",",
    group_separator: ".",
    currency_symbol: "€",
    placement: SymbolPlacement::AfterSpaced,
    date_separator: ".",
    short_date: "dd.MM.yyyy",
    long_date: "dddd, d. MMMM yyyy",
    short_time: "HH:mm",
    long_time: "HH:mm:ss",
    month_day: "d. MMMM",
    year_month: "MMMM yyyy",
    am: "AM",
    pm: "PM",
    months: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
        "Oktober", "November", "Dezember",
    ],
    months_abbr: [
        "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep", "Okt", "Nov", "Dez",
    ],
    days: [
        "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
    ],
    days_abbr: ["So", "Mo", "Di", "Mi", "Do", "Fr", "Sa"],
};

pub static FR_FR: Culture = Culture {
    name: "fr-FR",
    decimal_separator: ",",
    group_separator: "\u{202F}",
    currency_symbol: "€",
    placement: SymbolPlacement::AfterSpaced,
    date_separator: "/",
    short_date: "dd/MM/yyyy",
    long_date: "dddd d MMMM yyyy",
    short_time: "HH:mm",
    long_time: "HH:mm:ss",
    month_day: "d MMMM",
    year_month: "MMMM yyyy",
    am: "AM",
    pm: "PM",
    months: [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
        "octobre", "novembre", "décembre",
    ],
    months_abbr: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
        "nov.", "déc.",
    ],
    days: [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
    ],
    days_abbr: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
};

static CULTURES: [&Culture; 6] = [&INVARIANT, &EN_US, &EN_GB, &NL_NL, &DE_DE, &FR_FR];

/// Looks up a culture by name, ignoring ASCII case. `""` is the invariant culture.
pub fn lookup(name: &str) -> Result<&'static Culture> {
    let name = name.trim();
    match CULTURES
        .iter()
        .copied()
        .find(|c| c.name.eq_ignore_ascii_case(name))
    {
        Some(culture) => Ok(culture),
        None => bail!("unsupported culture '{}'", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("en-US").unwrap().currency_symbol, "$");
        assert_eq!(lookup("nl-nl").unwrap().name, "nl-NL");
        assert_eq!(lookup("").unwrap().name, "");
    }

    #[test]
    fn test_unknown_culture() {
        let err = lookup("xx-YY").unwrap_err();
        assert_eq!(err.to_string(), "unsupported culture 'xx-YY'");
    }
}
