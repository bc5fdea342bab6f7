//! Health Form Validation
//!
//! Pure validation rules for the health metrics form: the constraint table,
//! submission validation, BMI derivation and locale-aware number display.
//! Shared by the browser runtime and anything that wants to check a
//! submission before it reaches the prediction endpoint.

pub mod bmi;
pub mod constraint;
pub mod error;
pub mod format;
pub mod numeric;
pub mod validation;

pub use bmi::{compute_bmi, recompute_bmi};
pub use constraint::{ConstraintKind, ConstraintTable, FieldConstraint};
pub use error::{ConstraintError, Result};
pub use format::{format_for_display, format_grouped, NumberLocale};
pub use numeric::*;
pub use validation::{validate_submission, ValidationResult, Violation};
