//! Trips and their join codes.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;

use super::validation::{DraftValidationError, required_text};
use super::{EventId, TripId, UserId};

/// Number of characters in a generated join code.
pub const JOIN_CODE_LEN: usize = 8;

/// Error returned when a join code string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid trip code")]
pub struct JoinCodeError;

/// Short invitation code identifying a trip.
///
/// ## Invariants
/// - Non-empty ASCII alphanumerics, upper-cased.
///
/// Generated codes are exactly [`JOIN_CODE_LEN`] characters. Parsing accepts
/// any length so codes from older data still resolve, and matching is
/// case-insensitive because both sides are normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JoinCode(String);

impl JoinCode {
    /// Generate a fresh random code.
    ///
    /// Collisions are not retried here; storage rejects duplicates.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate a code from the supplied RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code: String = rng
            .sample_iter(&Alphanumeric)
            .take(JOIN_CODE_LEN)
            .map(|byte| char::from(byte).to_ascii_uppercase())
            .collect();
        Self(code)
    }

    /// Parse a user-supplied code, trimming and upper-casing it.
    ///
    /// # Examples
    /// ```
    /// use eventgo::domain::JoinCode;
    ///
    /// let code = JoinCode::parse(" ab12cd34 ").unwrap();
    /// assert_eq!(code.as_ref(), "AB12CD34");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, JoinCodeError> {
        let normalised = raw.trim().to_ascii_uppercase();
        if normalised.is_empty() || !normalised.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(JoinCodeError);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for JoinCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A group outing to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: TripId,
    pub title: String,
    pub origin_city: String,
    pub destination_city: String,
    pub date: DateTime<Utc>,
    pub code: JoinCode,
    pub organizer_id: UserId,
    pub event_id: EventId,
    pub created_at: DateTime<Utc>,
}

/// Validated trip input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripDraft {
    pub title: String,
    pub event_id: EventId,
    pub origin_city: String,
    pub destination_city: String,
    pub date: DateTime<Utc>,
}

impl TripDraft {
    /// Validate raw trip input.
    pub fn try_new(
        title: &str,
        event_id: EventId,
        origin_city: &str,
        destination_city: &str,
        date: DateTime<Utc>,
    ) -> Result<Self, DraftValidationError> {
        Ok(Self {
            title: required_text("title", title)?,
            event_id,
            origin_city: required_text("originCity", origin_city)?,
            destination_city: required_text("destinationCity", destination_city)?,
            date,
        })
    }

    /// Materialise a new trip with the given organizer and code.
    pub fn into_trip(self, organizer_id: UserId, code: JoinCode, now: DateTime<Utc>) -> Trip {
        Trip {
            id: TripId::random(),
            title: self.title,
            origin_city: self.origin_city,
            destination_city: self.destination_city,
            date: self.date,
            code,
            organizer_id,
            event_id: self.event_id,
            created_at: now,
        }
    }

    /// Overwrite the editable fields of `trip`. The join code never changes.
    pub fn apply_to(self, trip: &mut Trip) {
        trip.title = self.title;
        trip.event_id = self.event_id;
        trip.origin_city = self.origin_city;
        trip.destination_city = self.destination_city;
        trip.date = self.date;
    }
}
