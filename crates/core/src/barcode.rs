//! Barcode value object.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, ValidationCode};
use crate::value_object::ValueObject;

/// Barcode of a single physical item.
///
/// Normalized on construction: surrounding whitespace is trimmed, and the
/// length is bounded to 6–7 characters. Matching is exact and
/// case-sensitive everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    pub const MIN_LEN: usize = 6;
    pub const MAX_LEN: usize = 7;

    /// Parse a raw caller-supplied string into a barcode.
    ///
    /// Trims before validating, so `" AB1234 "` and `"AB1234"` are the
    /// same barcode.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.len() < Self::MIN_LEN || trimmed.len() > Self::MAX_LEN {
            return Err(DomainError::validation(
                "barcode",
                ValidationCode::BarcodeLength,
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Barcode {}

impl core::fmt::Display for Barcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Barcode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_and_seven_char_codes() {
        assert_eq!(Barcode::parse("AB1234").unwrap().as_str(), "AB1234");
        assert_eq!(Barcode::parse("AB12345").unwrap().as_str(), "AB12345");
    }

    #[test]
    fn trims_before_validating() {
        assert_eq!(Barcode::parse("  AB1234 ").unwrap().as_str(), "AB1234");
    }

    #[test]
    fn rejects_out_of_bound_lengths() {
        for raw in ["", "AB123", "AB123456", "   "] {
            let err = Barcode::parse(raw).unwrap_err();
            assert_eq!(err.validation_code(), Some(ValidationCode::BarcodeLength));
        }
    }
}
