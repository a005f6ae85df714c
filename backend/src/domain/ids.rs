//! Strongly typed entity identifiers.
//!
//! Every aggregate gets its own UUID newtype so a trip id can never be passed
//! where a participant id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error returned when an identifier string is not a valid UUID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

impl IdParseError {
    /// Name of the identifier that failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID, typically one read back from storage.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse an identifier from its string form.
            pub fn parse(raw: &str) -> Result<Self, IdParseError> {
                Uuid::parse_str(raw.trim())
                    .map(Self)
                    .map_err(|_| IdParseError { kind: $label })
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered user.
    UserId => "user id"
);
define_id!(
    /// Identifier of a company.
    CompanyId => "company id"
);
define_id!(
    /// Identifier of an event.
    EventId => "event id"
);
define_id!(
    /// Identifier of a trip.
    TripId => "trip id"
);
define_id!(
    /// Identifier of a trip membership.
    ParticipantId => "participant id"
);
define_id!(
    /// Identifier of a shared expense.
    CostItemId => "cost item id"
);
define_id!(
    /// Identifier of a vehicle offer.
    VehicleOfferId => "vehicle offer id"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parse_accepts_surrounding_whitespace() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id = TripId::parse(&format!("  {raw} ")).expect("valid id");
        assert_eq!(id.to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case("42")]
    fn parse_rejects_invalid_values(#[case] raw: &str) {
        let err = ParticipantId::parse(raw).expect_err("invalid id");
        assert_eq!(err.kind(), "participant id");
        assert_eq!(err.to_string(), "participant id must be a valid UUID");
    }

    #[rstest]
    fn random_ids_differ() {
        assert_ne!(UserId::random(), UserId::random());
    }
}
