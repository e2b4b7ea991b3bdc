use serde::{Deserialize, Serialize};

use stocktrace_core::{Barcode, DomainError, DomainResult, Location, ValidationCode};

/// Move command as supplied by a caller: raw strings, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub barcode: String,
    pub target_location: String,
    pub performed_by: Option<String>,
    pub note: Option<String>,
}

impl MoveRequest {
    pub fn new(barcode: impl Into<String>, target_location: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            target_location: target_location.into(),
            performed_by: None,
            note: None,
        }
    }

    /// Validate the request against the accepted label set.
    ///
    /// Barcode shape first, then target membership; the item's existence is
    /// a separate (storage-backed) check by the ledger service.
    pub fn validate(self, accepted: &AcceptedLocations) -> DomainResult<ValidatedMove> {
        let barcode = Barcode::parse(&self.barcode)?;
        let target = accepted.resolve(&self.target_location)?;

        Ok(ValidatedMove {
            barcode,
            target,
            performed_by: non_blank(self.performed_by),
            note: non_blank(self.note),
        })
    }
}

/// A move request that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMove {
    pub barcode: Barcode,
    pub target: Location,
    pub performed_by: Option<String>,
    pub note: Option<String>,
}

/// The set of location labels accepted as move targets.
///
/// The Entry/Exit classification itself is binary and closed; the label set
/// is data, so deployments can admit richer non-storage locations without a
/// code change. Storage is always a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedLocations {
    labels: Vec<Location>,
}

impl AcceptedLocations {
    /// The conventional set: Storage, Office, Out-of-stock.
    pub fn standard() -> Self {
        Self::from_labels(["Office", "Out-of-stock"])
            .unwrap_or_else(|_| Self { labels: vec![Location::storage()] })
    }

    /// Build a set from non-storage labels; storage is always included.
    pub fn from_labels<I, S>(labels: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = vec![Location::storage()];
        for label in labels {
            let loc = Location::parse(label.as_ref())?;
            if !set.contains(&loc) {
                set.push(loc);
            }
        }
        Ok(Self { labels: set })
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.labels.contains(location)
    }

    /// Parse a raw target label and require membership.
    pub fn resolve(&self, raw: &str) -> DomainResult<Location> {
        let location = Location::parse(raw)?;
        if !self.contains(&location) {
            return Err(DomainError::validation(
                "target_location",
                ValidationCode::UnknownLocation,
            ));
        }
        Ok(location)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Location> {
        self.labels.iter()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set_accepts_the_three_conventional_labels() {
        let accepted = AcceptedLocations::standard();
        for label in ["Storage", "Office", "Out-of-stock"] {
            assert!(accepted.resolve(label).is_ok(), "{label:?} should resolve");
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let accepted = AcceptedLocations::standard();
        let err = accepted.resolve("Warehouse 9").unwrap_err();
        assert_eq!(
            err.validation_code(),
            Some(ValidationCode::UnknownLocation)
        );
    }

    #[test]
    fn custom_sets_always_include_storage() {
        let accepted = AcceptedLocations::from_labels(["Lab", "Repair bench"]).unwrap();
        assert!(accepted.resolve("Storage").is_ok());
        assert!(accepted.resolve("Lab").is_ok());
        assert!(accepted.resolve("Office").is_err());
    }

    #[test]
    fn validate_normalizes_barcode_and_blank_metadata() {
        let mut req = MoveRequest::new(" AB1234 ", "Office");
        req.performed_by = Some("  ".to_string());
        req.note = Some(" left on desk ".to_string());

        let validated = req.validate(&AcceptedLocations::standard()).unwrap();
        assert_eq!(validated.barcode.as_str(), "AB1234");
        assert_eq!(validated.target.as_str(), "Office");
        assert_eq!(validated.performed_by, None);
        assert_eq!(validated.note.as_deref(), Some("left on desk"));
    }

    #[test]
    fn validate_rejects_bad_barcode_before_target() {
        let req = MoveRequest::new("AB1", "Nowhere");
        let err = req.validate(&AcceptedLocations::standard()).unwrap_err();
        assert_eq!(err.validation_code(), Some(ValidationCode::BarcodeLength));
    }
}
