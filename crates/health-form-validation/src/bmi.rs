//! BMI derivation from weight and height

use crate::numeric::parse_number;

/// Body mass index rounded to one decimal place.
///
/// Returns `None` unless the weight is positive and the height, converted
/// from centimetres to metres, is positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !weight_kg.is_finite() || !height_cm.is_finite() {
        return None;
    }
    let height_m = height_cm / 100.0;
    if weight_kg <= 0.0 || height_m <= 0.0 {
        return None;
    }
    let bmi = weight_kg / (height_m * height_m);
    Some((bmi * 10.0).round() / 10.0)
}

/// Recomputes the BMI input value from the raw weight and height inputs.
///
/// `None` means the BMI field should keep whatever it holds.
pub fn recompute_bmi(weight_raw: &str, height_raw: &str) -> Option<String> {
    let weight = parse_number(weight_raw)?;
    let height = parse_number(height_raw)?;
    compute_bmi(weight, height).map(|bmi| format!("{:.1}", bmi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(compute_bmi(70.0, 175.0), Some(22.9));
        assert_eq!(recompute_bmi("70", "175").as_deref(), Some("22.9"));
        assert_eq!(recompute_bmi("90", "180").as_deref(), Some("27.8"));
        assert_eq!(recompute_bmi("100", "100").as_deref(), Some("100.0"));
    }

    #[test]
    fn test_skips_without_positive_inputs() {
        assert_eq!(compute_bmi(0.0, 175.0), None);
        assert_eq!(compute_bmi(-70.0, 175.0), None);
        assert_eq!(compute_bmi(70.0, 0.0), None);
        assert_eq!(compute_bmi(70.0, -175.0), None);
        assert_eq!(recompute_bmi("", "175"), None);
        assert_eq!(recompute_bmi("70", ""), None);
        assert_eq!(recompute_bmi("seventy", "175"), None);
    }
}
