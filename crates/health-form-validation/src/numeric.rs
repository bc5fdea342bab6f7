//! Numeric parsing and bound checks

/// Parses a raw input value as a decimal number.
///
/// Surrounding whitespace is ignored. Empty input and anything that is not a
/// finite number (`NaN`, `inf`) yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Inclusive range check
pub fn in_range(value: f64, min: f64, max: f64) -> bool {
    value >= min && value <= max
}

/// True only for exactly 0 or 1
pub fn is_binary(value: f64) -> bool {
    value == 0.0 || value == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("45"), Some(45.0));
        assert_eq!(parse_number(" 24.1 "), Some(24.1));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert!(in_range(0.0, 0.0, 120.0));
        assert!(in_range(120.0, 0.0, 120.0));
        assert!(in_range(60.5, 0.0, 120.0));
        assert!(!in_range(-0.1, 0.0, 120.0));
        assert!(!in_range(120.1, 0.0, 120.0));
    }

    #[test]
    fn test_binary() {
        assert!(is_binary(0.0));
        assert!(is_binary(1.0));
        assert!(!is_binary(0.5));
        assert!(!is_binary(2.0));
        assert!(!is_binary(-1.0));
    }
}
