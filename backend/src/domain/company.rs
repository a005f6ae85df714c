//! Companies that own events and vehicle offers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validation::{DraftValidationError, optional_text, required_text};
use super::{CompanyId, EmailAddress, UserId};

/// A company and the single user who owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: EmailAddress,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Validated fields for creating or updating a company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDraft {
    pub name: String,
    pub description: Option<String>,
    pub contact_email: EmailAddress,
}

impl CompanyDraft {
    /// Validate raw company input.
    ///
    /// # Examples
    /// ```
    /// use eventgo::domain::CompanyDraft;
    ///
    /// let draft = CompanyDraft::try_new(" Buses Ltd ", None, "ops@buses.test").unwrap();
    /// assert_eq!(draft.name, "Buses Ltd");
    /// ```
    pub fn try_new(
        name: &str,
        description: Option<&str>,
        contact_email: &str,
    ) -> Result<Self, DraftValidationError> {
        let name = required_text("name", name)?;
        let contact_email = EmailAddress::new(contact_email)
            .map_err(|_| DraftValidationError::InvalidEmail { field: "contactEmail" })?;
        Ok(Self {
            name,
            description: optional_text(description),
            contact_email,
        })
    }

    /// Materialise a new company owned by `owner_id`.
    pub fn into_company(self, owner_id: UserId, now: DateTime<Utc>) -> Company {
        Company {
            id: CompanyId::random(),
            name: self.name,
            description: self.description,
            contact_email: self.contact_email,
            owner_id,
            created_at: now,
        }
    }

    /// Overwrite the mutable fields of `company`.
    pub fn apply_to(self, company: &mut Company) {
        company.name = self.name;
        company.description = self.description;
        company.contact_email = self.contact_email;
    }
}
