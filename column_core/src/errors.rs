//! # Error Types
//!
//! Structured error types for column_core. Every fallible calculation returns
//! a [`CalcResult`], and each variant carries enough context for a caller
//! (CLI, dashboard, or script) to tell the user exactly which input to fix.
//!
//! Non-fatal code conditions (for example f'c below the beta_1 table) are not
//! errors; they are reported as [`DesignWarning`] values alongside a result.
//!
//! ## Example
//!
//! ```rust
//! use column_core::errors::{CalcError, CalcResult};
//!
//! fn validate_width(b_in: f64) -> CalcResult<()> {
//!     if b_in <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "b_in",
//!             b_in.to_string(),
//!             "Column width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for column_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for calculation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unparseable, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Bar designator not present in the injected rebar table
    #[error("Rebar size not found: {designator}")]
    RebarNotFound { designator: String },

    /// A code provision that has not been implemented (e.g. spiral phi)
    #[error("Not implemented: {rule}")]
    NotImplemented { rule: String },

    /// Tie type string outside the supported set
    #[error("Undefined tie type '{value}' (expected 'other' or 'spiral')")]
    UndefinedTieType { value: String },

    /// Schedule row that breaks the export format contract
    #[error("Malformed schedule row {row}: {reason}")]
    MalformedScheduleRow { row: usize, reason: String },

    /// Division by a vanishing quantity or a non-finite intermediate
    #[error("Numerically degenerate {quantity} = {value}: {reason}")]
    NumericDegenerate {
        quantity: String,
        value: String,
        reason: String,
    },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON/CSV serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a RebarNotFound error
    pub fn rebar_not_found(designator: impl Into<String>) -> Self {
        CalcError::RebarNotFound {
            designator: designator.into(),
        }
    }

    /// Create a NotImplemented error
    pub fn not_implemented(rule: impl Into<String>) -> Self {
        CalcError::NotImplemented { rule: rule.into() }
    }

    /// Create a MalformedScheduleRow error
    pub fn malformed_row(row: usize, reason: impl Into<String>) -> Self {
        CalcError::MalformedScheduleRow {
            row,
            reason: reason.into(),
        }
    }

    /// Create a NumericDegenerate error
    pub fn numeric_degenerate(
        quantity: impl Into<String>,
        value: f64,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::NumericDegenerate {
            quantity: quantity.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::RebarNotFound { .. } => "REBAR_NOT_FOUND",
            CalcError::NotImplemented { .. } => "NOT_IMPLEMENTED",
            CalcError::UndefinedTieType { .. } => "UNDEFINED_TIE_TYPE",
            CalcError::MalformedScheduleRow { .. } => "MALFORMED_SCHEDULE_ROW",
            CalcError::NumericDegenerate { .. } => "NUMERIC_DEGENERATE",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

/// Non-fatal condition surfaced next to a calculation result.
///
/// The calculation continues with a documented fallback, but the caller
/// gets the condition back as data so it can be shown or asserted on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignWarning {
    /// f'c is below the ACI 318-14 Table 22.2.2.4.3 range; beta_1 fell back
    Beta1OutOfRange { fpc_ksi: f64, fallback: f64 },

    /// Center-to-center spacing of longitudinal bars exceeds the configured maximum
    BarSpacingExceedsMaximum {
        face: String,
        spacing_in: f64,
        max_spacing_in: f64,
    },

    /// Longitudinal bar is smaller than the configured minimum size
    BarBelowMinimumSize {
        designator: String,
        minimum: String,
    },
}

impl std::fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignWarning::Beta1OutOfRange { fpc_ksi, fallback } => write!(
                f,
                "f'c = {} ksi is less than 2.5 ksi - assuming beta_1 = {}",
                fpc_ksi, fallback
            ),
            DesignWarning::BarSpacingExceedsMaximum {
                face,
                spacing_in,
                max_spacing_in,
            } => write!(
                f,
                "{} face bar spacing {:.3} in exceeds maximum {:.3} in",
                face, spacing_in, max_spacing_in
            ),
            DesignWarning::BarBelowMinimumSize { designator, minimum } => {
                write!(f, "bar {} is smaller than minimum {}", designator, minimum)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::malformed_row(8, "missing paired row for Mu_y_top");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"MalformedScheduleRow\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("pu").error_code(), "MISSING_FIELD");
        assert_eq!(CalcError::rebar_not_found("#99").error_code(), "REBAR_NOT_FOUND");
        assert_eq!(
            CalcError::UndefinedTieType { value: "hoop".into() }.error_code(),
            "UNDEFINED_TIE_TYPE"
        );
        assert_eq!(
            CalcError::numeric_degenerate("k_u", 0.0, "zero").error_code(),
            "NUMERIC_DEGENERATE"
        );
    }

    #[test]
    fn test_warning_display() {
        let w = DesignWarning::Beta1OutOfRange {
            fpc_ksi: 2.0,
            fallback: 0.85,
        };
        assert!(w.to_string().contains("less than 2.5 ksi"));
    }
}
