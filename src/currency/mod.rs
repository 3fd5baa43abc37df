use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("ARS")
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub grouping_separator: char,
    pub day_first: bool,
}

impl LocaleConfig {
    /// Derives separators from a BCP-47 tag. Spanish and Portuguese tags group
    /// with `.` and print day-first dates; everything else follows `en-US`.
    pub fn from_tag(tag: &str) -> Self {
        let language = tag.split(['-', '_']).next().unwrap_or("").to_ascii_lowercase();
        let latin = matches!(language.as_str(), "es" | "pt" | "de" | "it");
        Self {
            language_tag: tag.to_string(),
            grouping_separator: if latin { '.' } else { ',' },
            day_first: latin,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::from_tag("es-AR")
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "ARS" | "USD" => "$".into(),
        "EUR" => "€".into(),
        "BRL" => "R$".into(),
        _ => format!("{code} "),
    }
}

/// Formats a whole-unit amount, e.g. `45000` → `$45.000` for `es-AR`.
pub fn format_amount(amount: u64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let digits = amount.to_string();
    format!(
        "{}{}",
        symbol_for(code.as_str()),
        group_digits(&digits, locale.grouping_separator)
    )
}

/// Formats a plain integer with the locale's grouping separator.
pub fn format_number(value: u64, locale: &LocaleConfig) -> String {
    group_digits(&value.to_string(), locale.grouping_separator)
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    if locale.day_first {
        date.format("%d/%m/%Y").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argentine_amounts_group_with_dots() {
        let locale = LocaleConfig::from_tag("es-AR");
        assert_eq!(format_amount(45000, &CurrencyCode::default(), &locale), "$45.000");
        assert_eq!(format_amount(105000, &CurrencyCode::default(), &locale), "$105.000");
        assert_eq!(format_amount(0, &CurrencyCode::default(), &locale), "$0");
    }

    #[test]
    fn english_locale_groups_with_commas() {
        let locale = LocaleConfig::from_tag("en-US");
        assert_eq!(format_number(1234567, &locale), "1,234,567");
        let date = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        assert_eq!(format_date(&locale, date), "2025-04-20");
        assert_eq!(format_date(&LocaleConfig::default(), date), "20/04/2025");
    }
}
