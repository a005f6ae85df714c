//! GraphQL input objects and their conversion into validated drafts.

use async_graphql::{ID, InputObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{
    CompanyDraft, CostItemDraft, Error, EventDraft, EventsFilter, LoginCredentials,
    SignupRequest, TripDraft, TripsFilter, VehicleOfferDraft, VehicleOfferInput,
};

use super::context::parse_id;
use super::types::RoleValue;

fn optional_id<T>(field: &'static str, id: Option<&ID>) -> Result<Option<T>, Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    id.map(|raw| parse_id(field, raw)).transpose()
}

/// Account registration; the role defaults to `USER`.
#[derive(InputObject)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    #[graphql(secret)]
    pub password: String,
    #[graphql(default_with = "Some(RoleValue::User)")]
    pub role: Option<RoleValue>,
}

impl SignupInput {
    pub(crate) fn into_request(self) -> Result<SignupRequest, Error> {
        Ok(SignupRequest::try_new(
            &self.name,
            &self.email,
            &self.password,
            self.role.map(Into::into),
        )?)
    }
}

pub(crate) fn login_credentials(email: &str, password: &str) -> Result<LoginCredentials, Error> {
    Ok(LoginCredentials::try_from_parts(email, password)?)
}

/// Company fields, used for creation and updates.
#[derive(InputObject)]
pub struct CreateCompanyInput {
    pub name: String,
    pub description: Option<String>,
    pub contact_email: String,
}

impl CreateCompanyInput {
    pub(crate) fn into_draft(self) -> Result<CompanyDraft, Error> {
        Ok(CompanyDraft::try_new(
            &self.name,
            self.description.as_deref(),
            &self.contact_email,
        )?)
    }
}

/// Event fields, used for creation and updates.
#[derive(InputObject)]
pub struct CreateEventInput {
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    /// Company organising the event; must be owned by the caller.
    pub organizer_company_id: Option<ID>,
}

impl CreateEventInput {
    pub(crate) fn into_draft(self) -> Result<EventDraft, Error> {
        let company = optional_id("organizerCompanyId", self.organizer_company_id.as_ref())?;
        Ok(EventDraft::try_new(
            &self.title,
            self.description.as_deref(),
            &self.city,
            &self.venue,
            self.date,
            company,
        )?)
    }
}

/// Trip fields. The join code is generated, never supplied.
#[derive(InputObject)]
pub struct CreateTripInput {
    pub title: String,
    pub event_id: ID,
    pub origin_city: String,
    pub destination_city: String,
    pub date: DateTime<Utc>,
}

impl CreateTripInput {
    pub(crate) fn into_draft(self) -> Result<TripDraft, Error> {
        let event_id = parse_id("eventId", &self.event_id)?;
        Ok(TripDraft::try_new(
            &self.title,
            event_id,
            &self.origin_city,
            &self.destination_city,
            self.date,
        )?)
    }
}

/// Cost item fields. Updates ignore `tripId`; items never move between trips.
#[derive(InputObject)]
pub struct CreateCostItemInput {
    pub trip_id: ID,
    pub label: String,
    pub total_amount: Decimal,
}

impl CreateCostItemInput {
    pub(crate) fn into_draft(self) -> Result<CostItemDraft, Error> {
        let trip_id = parse_id("tripId", &self.trip_id)?;
        Ok(CostItemDraft::try_new(trip_id, &self.label, self.total_amount)?)
    }
}

/// Vehicle offer fields, used for creation and updates.
#[derive(InputObject)]
pub struct CreateVehicleOfferInput {
    pub capacity: i32,
    pub price_per_person: Option<Decimal>,
    pub pickup_location: String,
    pub pickup_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub trip_id: Option<ID>,
    /// Offering company; defaults to the caller's first company.
    pub company_id: Option<ID>,
}

impl CreateVehicleOfferInput {
    pub(crate) fn into_draft(self) -> Result<VehicleOfferDraft, Error> {
        Ok(VehicleOfferDraft::try_new(VehicleOfferInput {
            capacity: self.capacity,
            price_per_person: self.price_per_person,
            pickup_location: &self.pickup_location,
            pickup_time: self.pickup_time,
            notes: self.notes.as_deref(),
            trip_id: optional_id("tripId", self.trip_id.as_ref())?,
            company_id: optional_id("companyId", self.company_id.as_ref())?,
        })?)
    }
}

/// Event listing filter.
#[derive(InputObject, Default)]
#[graphql(name = "EventsFilter")]
pub struct EventsFilterInput {
    pub city: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl From<EventsFilterInput> for EventsFilter {
    fn from(value: EventsFilterInput) -> Self {
        Self {
            city: value.city,
            date_from: value.date_from,
            date_to: value.date_to,
            search: value.search,
        }
    }
}

/// Trip listing filter.
#[derive(InputObject, Default)]
#[graphql(name = "TripsFilter")]
pub struct TripsFilterInput {
    pub event_id: Option<ID>,
    pub city: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl TripsFilterInput {
    pub(crate) fn into_filter(self) -> Result<TripsFilter, Error> {
        Ok(TripsFilter {
            event_id: optional_id("eventId", self.event_id.as_ref())?,
            city: self.city,
            date_from: self.date_from,
            date_to: self.date_to,
            search: self.search,
        })
    }
}
