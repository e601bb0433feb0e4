//! Outcome of a conditional update.

use crate::record::TaskRecord;

/// Result of a conditional update: exactly one of three business outcomes.
///
/// Missing and foreign records are expected outcomes, not errors, so they are
/// variants here rather than error values. Storage failures travel separately
/// as [`crate::StoreError`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "every update outcome must be handled"]
pub enum UpdateOutcome {
    /// The record existed, belonged to the caller, and now carries the new
    /// description.
    Updated(TaskRecord),
    /// No record with the requested id exists.
    NotFound,
    /// The record exists but belongs to another tenant. Nothing was written.
    NotOwned,
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated(_))
    }

    /// Short machine-readable label, used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateOutcome::Updated(_) => "updated",
            UpdateOutcome::NotFound => "not_found",
            UpdateOutcome::NotOwned => "not_owned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(UpdateOutcome::NotFound.as_str(), "not_found");
        assert_eq!(UpdateOutcome::NotOwned.as_str(), "not_owned");
        assert!(!UpdateOutcome::NotOwned.is_updated());
    }
}
