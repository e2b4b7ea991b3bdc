//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Field-level validation reason code.
///
/// Language-neutral: the presentation layer maps these to localized
/// messages, the core never carries display text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValidationCode {
    /// Barcode length is outside the 6–7 character bound.
    BarcodeLength,
    /// Another item already carries this barcode.
    BarcodeDuplicate,
    /// Another item already carries this serial number.
    SerialDuplicate,
    /// A required field is missing or blank.
    MissingField,
    /// Target location label is not in the accepted set.
    UnknownLocation,
}

impl ValidationCode {
    /// Stable wire identifier for the reason code.
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationCode::BarcodeLength => "BARCODE_LENGTH",
            ValidationCode::BarcodeDuplicate => "BARCODE_DUPLICATE",
            ValidationCode::SerialDuplicate => "SERIAL_DUPLICATE",
            ValidationCode::MissingField => "MISSING_FIELD",
            ValidationCode::UnknownLocation => "UNKNOWN_LOCATION",
        }
    }
}

impl core::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// identity conflicts, missing references). Storage failures are carried as
/// `Storage` so callers can distinguish possibly-transient conditions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller-correctable input problem, with the offending field and a
    /// structured reason code.
    #[error("validation failed on `{field}`: {code}")]
    Validation {
        field: &'static str,
        code: ValidationCode,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced barcode/id does not exist.
    #[error("not found")]
    NotFound,

    /// Concurrent modification detected (stale version); caller re-reads
    /// and retries from scratch.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying persistence failure; possibly transient.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(field: &'static str, code: ValidationCode) -> Self {
        Self::Validation { field, code }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// The validation reason code, if this is a validation failure.
    pub fn validation_code(&self) -> Option<ValidationCode> {
        match self {
            DomainError::Validation { code, .. } => Some(*code),
            _ => None,
        }
    }
}
