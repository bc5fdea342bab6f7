//! Field constraints and the constraint table
//!
//! Each validated field is described once by a [`FieldConstraint`]; the
//! [`ConstraintTable`] checks the whole set when it is built so that event
//! handlers only ever look rules up by name.

use std::collections::HashSet;

use crate::error::{ConstraintError, Result};
use crate::numeric::{in_range, is_binary, parse_number};

/// Fields that only accept 0 or 1
pub const BINARY_FIELDS: &[&str] = &[
    "family_history_diabetes",
    "hypertension_history",
    "cardiovascular_history",
];

/// Shape of the rule applied to a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintKind {
    /// Continuous value within `min..=max`
    Range { min: f64, max: f64 },
    /// History flag: exactly 0 or 1
    Binary,
}

/// A named rule bounding acceptable values for one form field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConstraint {
    name: String,
    kind: ConstraintKind,
    message: String,
}

impl FieldConstraint {
    /// Continuous range constraint with inclusive bounds
    pub fn range(
        name: impl Into<String>,
        min: f64,
        max: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Range { min, max },
            message: message.into(),
        }
    }

    /// Binary constraint with the default message
    /// (`family history diabetes harus 0 atau 1`)
    pub fn binary(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("{} harus 0 atau 1", name.replace('_', " "));
        Self {
            name,
            kind: ConstraintKind::Binary,
            message,
        }
    }

    /// Binary constraint with a custom message
    pub fn binary_with_message(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ConstraintKind::Binary,
            message: message.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Lower bound (0 for binary fields)
    pub fn min(&self) -> f64 {
        match self.kind {
            ConstraintKind::Range { min, .. } => min,
            ConstraintKind::Binary => 0.0,
        }
    }

    /// Upper bound (1 for binary fields)
    pub fn max(&self) -> f64 {
        match self.kind {
            ConstraintKind::Range { max, .. } => max,
            ConstraintKind::Binary => 1.0,
        }
    }

    /// Checks a parsed value.
    ///
    /// A missing number never violates a range (the form's own `required`
    /// handling covers blanks) but is not a legal history flag.
    pub fn accepts(&self, value: Option<f64>) -> bool {
        match (self.kind, value) {
            (ConstraintKind::Range { min, max }, Some(v)) => in_range(v, min, max),
            (ConstraintKind::Range { .. }, None) => true,
            (ConstraintKind::Binary, Some(v)) => is_binary(v),
            (ConstraintKind::Binary, None) => false,
        }
    }

    /// Checks a raw input value, returning the violation message on failure
    pub fn check(&self, raw: &str) -> std::result::Result<(), &str> {
        if self.accepts(parse_number(raw)) {
            Ok(())
        } else {
            Err(&self.message)
        }
    }

    fn verify(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ConstraintError::EmptyName);
        }
        if let ConstraintKind::Range { min, max } = self.kind {
            if !min.is_finite() || !max.is_finite() {
                return Err(ConstraintError::NonFiniteBound(self.name.clone()));
            }
            if min > max {
                return Err(ConstraintError::InvertedBounds {
                    field: self.name.clone(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// Ordered set of field constraints, verified at construction
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintTable {
    constraints: Vec<FieldConstraint>,
}

impl ConstraintTable {
    /// Builds a table, rejecting empty names, duplicate fields and
    /// malformed bounds.
    pub fn new(constraints: Vec<FieldConstraint>) -> Result<Self> {
        let mut seen = HashSet::new();
        for constraint in &constraints {
            constraint.verify()?;
            if !seen.insert(constraint.name.as_str()) {
                return Err(ConstraintError::DuplicateField(constraint.name.clone()));
            }
        }
        Ok(Self { constraints })
    }

    /// The rules used by the diabetes prediction form
    pub fn diabetes_screening() -> Self {
        let mut constraints = vec![
            FieldConstraint::range("Age", 0.0, 120.0, "Umur harus antara 0-120 tahun"),
            FieldConstraint::range("bmi", 10.0, 60.0, "BMI harus antara 10-60"),
            FieldConstraint::range("diet_score", 1.0, 10.0, "Diet Score harus antara 1-10"),
            FieldConstraint::range("hba1c", 3.0, 20.0, "HbA1c harus antara 3-20%"),
        ];
        constraints.extend(BINARY_FIELDS.iter().map(|name| FieldConstraint::binary(*name)));
        Self { constraints }
    }

    /// Looks up the constraint for a field name (exact, case-sensitive)
    pub fn get(&self, name: &str) -> Option<&FieldConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldConstraint> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl Default for ConstraintTable {
    fn default() -> Self {
        Self::diabetes_screening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screening_table_passes_its_own_checks() {
        let table = ConstraintTable::diabetes_screening();
        let rebuilt = ConstraintTable::new(table.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, table);
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn test_binary_message_spaces_every_underscore() {
        let c = FieldConstraint::binary("family_history_diabetes");
        assert_eq!(c.message(), "family history diabetes harus 0 atau 1");
        assert_eq!(c.min(), 0.0);
        assert_eq!(c.max(), 1.0);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = ConstraintTable::diabetes_screening();
        assert!(table.get("Age").is_some());
        assert!(table.get("age").is_none());
        assert!(table.get("weight").is_none());
    }

    #[test]
    fn test_rejects_duplicates() {
        let err = ConstraintTable::new(vec![
            FieldConstraint::binary("flag"),
            FieldConstraint::range("flag", 0.0, 1.0, "dup"),
        ])
        .unwrap_err();
        assert_eq!(err, ConstraintError::DuplicateField("flag".to_string()));
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let inverted = ConstraintTable::new(vec![FieldConstraint::range("x", 5.0, 1.0, "m")]);
        assert!(matches!(inverted, Err(ConstraintError::InvertedBounds { .. })));

        let infinite =
            ConstraintTable::new(vec![FieldConstraint::range("x", 0.0, f64::INFINITY, "m")]);
        assert_eq!(infinite, Err(ConstraintError::NonFiniteBound("x".to_string())));

        let unnamed = ConstraintTable::new(vec![FieldConstraint::binary(" ")]);
        assert_eq!(unnamed, Err(ConstraintError::EmptyName));
    }

    #[test]
    fn test_blank_values() {
        let age = FieldConstraint::range("Age", 0.0, 120.0, "m");
        assert!(age.check("").is_ok());
        let flag = FieldConstraint::binary("hypertension_history");
        assert_eq!(flag.check(""), Err("hypertension history harus 0 atau 1"));
    }
}
