//! Location label value object.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult, ValidationCode};
use crate::value_object::ValueObject;

/// Location/custody label of an item.
///
/// Labels are free text by contract, with one canonical value: `Storage`
/// marks the item as in stock. Any other label is an out-of-storage
/// location (office, handed out, scrapped, ...). The in-stock flag is
/// always derived from this label, never stored separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// The canonical in-stock label.
    pub const STORAGE: &'static str = "Storage";

    /// The storage location.
    pub fn storage() -> Self {
        Self(Self::STORAGE.to_owned())
    }

    /// Parse a raw label. Trims surrounding whitespace; a blank label is a
    /// validation failure.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation(
                "location",
                ValidationCode::MissingField,
            ));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn is_storage(&self) -> bool {
        self.0 == Self::STORAGE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Location {}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
