//! Dated happenings that trips are organised around.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::validation::{DraftValidationError, optional_text, required_text};
use super::{CompanyId, EventId};

/// A concert, festival or show. The organising company is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub organizer_company_id: Option<CompanyId>,
    pub created_at: DateTime<Utc>,
}

/// Validated event input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub organizer_company_id: Option<CompanyId>,
}

impl EventDraft {
    /// Validate raw event input.
    pub fn try_new(
        title: &str,
        description: Option<&str>,
        city: &str,
        venue: &str,
        date: DateTime<Utc>,
        organizer_company_id: Option<CompanyId>,
    ) -> Result<Self, DraftValidationError> {
        Ok(Self {
            title: required_text("title", title)?,
            description: optional_text(description),
            city: required_text("city", city)?,
            venue: required_text("venue", venue)?,
            date,
            organizer_company_id,
        })
    }

    /// Materialise a new event.
    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        Event {
            id: EventId::random(),
            title: self.title,
            description: self.description,
            city: self.city,
            venue: self.venue,
            date: self.date,
            organizer_company_id: self.organizer_company_id,
            created_at: now,
        }
    }

    /// Overwrite the descriptive fields of `event`.
    ///
    /// The organising company is fixed at creation and is not changed here.
    pub fn apply_to(self, event: &mut Event) {
        event.title = self.title;
        event.description = self.description;
        event.city = self.city;
        event.venue = self.venue;
        event.date = self.date;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "Lisbon", "Arena", "title")]
    #[case("Rock Fest", " ", "Arena", "city")]
    #[case("Rock Fest", "Lisbon", "", "venue")]
    fn invalid_drafts(
        #[case] title: &str,
        #[case] city: &str,
        #[case] venue: &str,
        #[case] field: &str,
    ) {
        let err = EventDraft::try_new(title, None, city, venue, Utc::now(), None)
            .expect_err("invalid");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    fn apply_keeps_organizing_company() {
        let company = CompanyId::random();
        let mut event = EventDraft::try_new("Fest", None, "Porto", "Park", Utc::now(), Some(company))
            .expect("valid")
            .into_event(Utc::now());

        EventDraft::try_new("Fest II", Some("day two"), "Porto", "Park", Utc::now(), None)
            .expect("valid")
            .apply_to(&mut event);

        assert_eq!(event.title, "Fest II");
        assert_eq!(event.organizer_company_id, Some(company));
    }
}
