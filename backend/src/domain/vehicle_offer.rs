//! Transport listings posted by companies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::validation::{DraftValidationError, monetary_amount, optional_text, required_text};
use super::{CompanyId, TripId, VehicleOfferId};

/// A seat offer. Detached offers (`trip_id == None`) outlive deleted trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleOffer {
    pub id: VehicleOfferId,
    pub capacity: i32,
    pub price_per_person: Option<Decimal>,
    pub pickup_location: String,
    pub pickup_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub company_id: CompanyId,
    pub trip_id: Option<TripId>,
    pub created_at: DateTime<Utc>,
}

/// Validated vehicle offer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleOfferDraft {
    pub capacity: i32,
    pub price_per_person: Option<Decimal>,
    pub pickup_location: String,
    pub pickup_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub trip_id: Option<TripId>,
    /// Offering company; when absent the caller's first company is used.
    pub company_id: Option<CompanyId>,
}

/// Raw vehicle offer fields as received from a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct VehicleOfferInput<'a> {
    pub capacity: i32,
    pub price_per_person: Option<Decimal>,
    pub pickup_location: &'a str,
    pub pickup_time: DateTime<Utc>,
    pub notes: Option<&'a str>,
    pub trip_id: Option<TripId>,
    pub company_id: Option<CompanyId>,
}

impl VehicleOfferDraft {
    /// Validate raw vehicle offer input.
    pub fn try_new(input: VehicleOfferInput<'_>) -> Result<Self, DraftValidationError> {
        if input.capacity < 1 {
            return Err(DraftValidationError::TooSmall {
                field: "capacity",
                min: 1,
            });
        }
        let price_per_person = input
            .price_per_person
            .map(|price| monetary_amount("pricePerPerson", price))
            .transpose()?;
        Ok(Self {
            capacity: input.capacity,
            price_per_person,
            pickup_location: required_text("pickupLocation", input.pickup_location)?,
            pickup_time: input.pickup_time,
            notes: optional_text(input.notes),
            trip_id: input.trip_id,
            company_id: input.company_id,
        })
    }

    /// Materialise a new offer for `company_id`.
    pub fn into_offer(self, company_id: CompanyId, now: DateTime<Utc>) -> VehicleOffer {
        VehicleOffer {
            id: VehicleOfferId::random(),
            capacity: self.capacity,
            price_per_person: self.price_per_person,
            pickup_location: self.pickup_location,
            pickup_time: self.pickup_time,
            notes: self.notes,
            company_id,
            trip_id: self.trip_id,
            created_at: now,
        }
    }

    /// Overwrite the listing fields. The offering company never changes.
    pub fn apply_to(self, offer: &mut VehicleOffer) {
        offer.capacity = self.capacity;
        offer.price_per_person = self.price_per_person;
        offer.pickup_location = self.pickup_location;
        offer.pickup_time = self.pickup_time;
        offer.notes = self.notes;
        offer.trip_id = self.trip_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn input() -> VehicleOfferInput<'static> {
        VehicleOfferInput {
            capacity: 8,
            price_per_person: Some(Decimal::new(1250, 2)),
            pickup_location: "Central station",
            pickup_time: Utc::now(),
            ..VehicleOfferInput::default()
        }
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn capacity_must_be_positive(input: VehicleOfferInput<'static>, #[case] capacity: i32) {
        let err = VehicleOfferDraft::try_new(VehicleOfferInput { capacity, ..input })
            .expect_err("invalid capacity");
        assert_eq!(err.field(), "capacity");
    }

    #[rstest]
    fn price_must_not_be_negative(input: VehicleOfferInput<'static>) {
        let err = VehicleOfferDraft::try_new(VehicleOfferInput {
            price_per_person: Some(Decimal::new(-1, 0)),
            ..input
        })
        .expect_err("negative price");
        assert_eq!(err.field(), "pricePerPerson");
    }

    #[rstest]
    fn apply_keeps_company(input: VehicleOfferInput<'static>) {
        let company = CompanyId::random();
        let mut offer = VehicleOfferDraft::try_new(input)
            .expect("valid")
            .into_offer(company, Utc::now());
        let trip = TripId::random();

        VehicleOfferDraft::try_new(VehicleOfferInput {
            capacity: 4,
            trip_id: Some(trip),
            company_id: Some(CompanyId::random()),
            ..input
        })
        .expect("valid")
        .apply_to(&mut offer);

        assert_eq!(offer.company_id, company);
        assert_eq!(offer.capacity, 4);
        assert_eq!(offer.trip_id, Some(trip));
    }
}
