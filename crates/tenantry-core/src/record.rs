//! The persisted task record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::identifiers::{TaskId, TenantId};

/// Maximum description length, counted in UTF-16 code units.
pub const MAX_DESCRIPTION_UNITS: usize = 255;

/// Validated task description: not blank, at most
/// [`MAX_DESCRIPTION_UNITS`] UTF-16 code units.
///
/// The text is stored exactly as given; surrounding whitespace is only
/// considered when deciding whether the description is blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    /// Parse and validate a description.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tenantry_core::{Description, ValidationError};
    ///
    /// assert!(Description::parse("buy milk").is_ok());
    /// assert_eq!(Description::parse("  "), Err(ValidationError::BlankDescription));
    /// assert!(Description::parse("x".repeat(256)).is_err());
    /// ```
    pub fn parse(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::BlankDescription);
        }
        let length = text.encode_utf16().count();
        if length > MAX_DESCRIPTION_UNITS {
            return Err(ValidationError::DescriptionTooLong {
                length,
                max: MAX_DESCRIPTION_UNITS,
            });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<Description> for String {
    fn from(description: Description) -> Self {
        description.0
    }
}

/// One task entry.
///
/// Records are replaced rather than mutated: [`TaskRecord::with_description`]
/// yields a new record that keeps the id, creation timestamp and tenant of the
/// one it replaces. On disk the fields are named `id`, `description`,
/// `creationDate` and `tenantId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    id: TaskId,
    description: Description,
    #[serde(rename = "creationDate")]
    created_at: DateTime<Utc>,
    #[serde(rename = "tenantId")]
    tenant_id: TenantId,
}

impl TaskRecord {
    /// Create a brand-new record with a fresh id and the current UTC time.
    pub fn new(description: Description, tenant_id: TenantId) -> Self {
        Self {
            id: TaskId::generate(),
            description,
            created_at: Utc::now(),
            tenant_id,
        }
    }

    /// Assemble a record from existing parts, e.g. when seeding storage.
    pub fn from_parts(
        id: TaskId,
        description: Description,
        created_at: DateTime<Utc>,
        tenant_id: TenantId,
    ) -> Self {
        Self {
            id,
            description,
            created_at,
            tenant_id,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    pub fn is_owned_by(&self, tenant: &TenantId) -> bool {
        &self.tenant_id == tenant
    }

    /// Copy of this record with the description replaced.
    #[must_use]
    pub fn with_description(self, description: Description) -> Self {
        Self {
            description,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a")]
    #[case("  padded  ")]
    #[case("ünïcödé")]
    fn test_description_accepts_valid_text(#[case] text: &str) {
        let description = Description::parse(text).unwrap();
        assert_eq!(description.as_str(), text);
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("\n\t")]
    fn test_description_rejects_blank(#[case] text: &str) {
        assert_eq!(
            Description::parse(text),
            Err(ValidationError::BlankDescription)
        );
    }

    #[test]
    fn test_description_length_counts_utf16_units() {
        assert!(Description::parse("x".repeat(255)).is_ok());
        assert!(Description::parse("x".repeat(256)).is_err());

        // Each emoji is a surrogate pair: 128 of them is 256 code units.
        let emoji = "\u{1F600}".repeat(128);
        assert_eq!(
            Description::parse(emoji),
            Err(ValidationError::DescriptionTooLong {
                length: 256,
                max: MAX_DESCRIPTION_UNITS
            })
        );
    }

    #[test]
    fn test_with_description_preserves_identity() {
        let record = TaskRecord::new(
            Description::parse("orig").unwrap(),
            TenantId::parse("T1").unwrap(),
        );
        let updated = record
            .clone()
            .with_description(Description::parse("new").unwrap());

        assert_eq!(updated.id(), record.id());
        assert_eq!(updated.created_at(), record.created_at());
        assert_eq!(updated.tenant_id(), record.tenant_id());
        assert_eq!(updated.description().as_str(), "new");
    }

    #[test]
    fn test_record_json_field_names() {
        let record = TaskRecord::new(
            Description::parse("report").unwrap(),
            TenantId::parse("acme").unwrap(),
        );
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], record.id().as_str());
        assert_eq!(json["description"], "report");
        assert_eq!(json["tenantId"], "acme");
        assert!(json["creationDate"].is_string());
    }

    #[test]
    fn test_record_rejects_blank_tenant_on_read() {
        let raw = r#"{"id":"x","description":"d","creationDate":"2024-05-01T10:00:00Z","tenantId":""}"#;
        assert!(serde_json::from_str::<TaskRecord>(raw).is_err());
    }
}
