//! Locale-aware display formatting for numeric inputs
//!
//! Large values are shown with thousands separators while the field is not
//! being edited. Display text is never parsed back: whoever formats a field
//! keeps the raw value it replaced.

use crate::numeric::parse_number;

/// Values at or above this are shown grouped
pub const FORMAT_THRESHOLD: f64 = 1000.0;

/// Maximum fraction digits kept when grouping
const MAX_FRACTION_DIGITS: usize = 3;

/// Supported display locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NumberLocale {
    /// `12.345,5`
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "id-ID"))]
    Indonesian,
    /// `12,345.5`
    #[cfg_attr(feature = "serde", serde(rename = "en-US"))]
    English,
}

impl NumberLocale {
    /// Parse a BCP 47 tag (`id-ID`, `en-US`, or the bare language)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "id" | "id-id" => Some(Self::Indonesian),
            "en" | "en-us" => Some(Self::English),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Indonesian => "id-ID",
            Self::English => "en-US",
        }
    }

    pub fn group_separator(self) -> char {
        match self {
            Self::Indonesian => '.',
            Self::English => ',',
        }
    }

    pub fn decimal_separator(self) -> char {
        match self {
            Self::Indonesian => ',',
            Self::English => '.',
        }
    }
}

/// Formats a number with grouping and at most three fraction digits
pub fn format_grouped(value: f64, locale: NumberLocale) -> String {
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(locale.group_separator());
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push(locale.decimal_separator());
        out.push_str(frac);
    }
    out
}

/// Display text for a raw input value on blur.
///
/// `None` leaves the field untouched: empty, unparseable (including text
/// that is already grouped) or below [`FORMAT_THRESHOLD`].
pub fn format_for_display(raw: &str, locale: NumberLocale) -> Option<String> {
    let value = parse_number(raw)?;
    if value >= FORMAT_THRESHOLD {
        Some(format_grouped(value, locale))
    } else {
        None
    }
}
