//! Submission validation

use crate::constraint::ConstraintTable;

/// One failed field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// Outcome of validating one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Messages in the order the fields were visited
    pub messages: Vec<String>,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        Self {
            is_valid: true,
            messages: Vec::new(),
            violations: Vec::new(),
        }
    }

    /// Build a result from collected violations
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        let messages = violations.iter().map(|v| v.message.clone()).collect();
        Self {
            is_valid: violations.is_empty(),
            messages,
            violations,
        }
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Names of the offending fields, in visit order
    pub fn failed_fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }
}

/// Validates `(name, raw value)` pairs against the table.
///
/// Fields without a constraint are accepted. Every pair is checked, so a
/// name that appears twice is reported twice.
pub fn validate_submission<I, K, V>(table: &ConstraintTable, fields: I) -> ValidationResult
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let violations = fields
        .into_iter()
        .filter_map(|(name, value)| {
            let constraint = table.get(name.as_ref())?;
            constraint.check(value.as_ref()).err().map(|message| Violation {
                field: name.as_ref().to_string(),
                message: message.to_string(),
            })
        })
        .collect();

    ValidationResult::from_violations(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table() -> ConstraintTable {
        ConstraintTable::diabetes_screening()
    }

    fn invalid(name: &str, value: &str) -> bool {
        !validate_submission(&table(), [(name, value)]).is_valid
    }

    #[rstest]
    #[case("Age", "-1", true)]
    #[case("Age", "0", false)]
    #[case("Age", "45", false)]
    #[case("Age", "120", false)]
    #[case("Age", "120.5", true)]
    #[case("bmi", "9.9", true)]
    #[case("bmi", "10", false)]
    #[case("bmi", "60", false)]
    #[case("bmi", "60.1", true)]
    #[case("diet_score", "0", true)]
    #[case("diet_score", "1", false)]
    #[case("diet_score", "10", false)]
    #[case("diet_score", "11", true)]
    #[case("hba1c", "2.9", true)]
    #[case("hba1c", "3", false)]
    #[case("hba1c", "20", false)]
    #[case("hba1c", "20.5", true)]
    fn test_range_fields(#[case] name: &str, #[case] value: &str, #[case] expected_invalid: bool) {
        assert_eq!(invalid(name, value), expected_invalid);
    }

    #[rstest]
    fn test_binary_fields(
        #[values("family_history_diabetes", "hypertension_history", "cardiovascular_history")]
        name: &str,
    ) {
        assert!(!invalid(name, "0"));
        assert!(!invalid(name, "1"));
        assert!(!invalid(name, "1.0"));
        assert!(invalid(name, "2"));
        assert!(invalid(name, "0.5"));
        assert!(invalid(name, "-1"));
        assert!(invalid(name, ""));
    }

    #[test]
    fn test_unconstrained_fields_pass() {
        let result = validate_submission(
            &table(),
            [("glucose_fasting", "-500"), ("weight", "abc"), ("age", "999")],
        );
        assert_eq!(result, ValidationResult::success());
    }

    #[test]
    fn test_messages_follow_field_order() {
        let result = validate_submission(
            &table(),
            [
                ("hba1c", "25"),
                ("Age", "45"),
                ("hypertension_history", "3"),
                ("bmi", "5"),
            ],
        );

        assert!(!result.is_valid);
        assert_eq!(
            result.messages,
            vec![
                "HbA1c harus antara 3-20%".to_string(),
                "hypertension history harus 0 atau 1".to_string(),
                "BMI harus antara 10-60".to_string(),
            ]
        );
        assert_eq!(
            result.failed_fields().collect::<Vec<_>>(),
            vec!["hba1c", "hypertension_history", "bmi"]
        );
    }
}
