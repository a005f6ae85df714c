//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types are
//! fallible where the domain enforces invariants the column type cannot
//! (emails, roles, join codes).

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::ports::RepositoryError;
use crate::domain::{
    Company, CompanyId, CostItem, CostItemId, EmailAddress, Event, EventId, JoinCode,
    Participant, ParticipantId, Role, Trip, TripId, User, UserId, VehicleOffer, VehicleOfferId,
};

use super::schema::{companies, cost_items, events, participants, trips, users, vehicle_offers};

fn corrupt(column: &str, detail: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::query(format!("stored {column} is invalid: {detail}"))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub profile_public_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: EmailAddress::new(&row.email).map_err(|err| corrupt("email", err))?,
            password_hash: row.password_hash,
            role: row.role.parse::<Role>().map_err(|err| corrupt("role", err))?,
            avatar_url: row.avatar_url,
            profile_public_info: row.profile_public_info,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub avatar_url: Option<&'a str>,
    pub profile_public_info: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id.as_uuid(),
            name: &user.name,
            email: user.email.as_ref(),
            password_hash: &user.password_hash,
            role: user.role.as_str(),
            avatar_url: user.avatar_url.as_deref(),
            profile_public_info: user.profile_public_info.as_deref(),
            created_at: user.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = RepositoryError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CompanyId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            contact_email: EmailAddress::new(&row.contact_email)
                .map_err(|err| corrupt("contact_email", err))?,
            owner_id: UserId::from_uuid(row.owner_id),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = companies)]
pub(crate) struct NewCompanyRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub contact_email: &'a str,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Company> for NewCompanyRow<'a> {
    fn from(company: &'a Company) -> Self {
        Self {
            id: *company.id.as_uuid(),
            name: &company.name,
            description: company.description.as_deref(),
            contact_email: company.contact_email.as_ref(),
            owner_id: *company.owner_id.as_uuid(),
            created_at: company.created_at,
        }
    }
}

/// `description` is written even when `None` so it can be cleared.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = companies, treat_none_as_null = true)]
pub(crate) struct CompanyUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub contact_email: &'a str,
}

impl<'a> From<&'a Company> for CompanyUpdate<'a> {
    fn from(company: &'a Company) -> Self {
        Self {
            name: &company.name,
            description: company.description.as_deref(),
            contact_email: company.contact_email.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = events)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub organizer_company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            city: row.city,
            venue: row.venue,
            date: row.date,
            organizer_company_id: row.organizer_company_id.map(CompanyId::from_uuid),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = events)]
pub(crate) struct NewEventRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub city: &'a str,
    pub venue: &'a str,
    pub date: DateTime<Utc>,
    pub organizer_company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Event> for NewEventRow<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            id: *event.id.as_uuid(),
            title: &event.title,
            description: event.description.as_deref(),
            city: &event.city,
            venue: &event.venue,
            date: event.date,
            organizer_company_id: event.organizer_company_id.map(|id| *id.as_uuid()),
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = events, treat_none_as_null = true)]
pub(crate) struct EventUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub city: &'a str,
    pub venue: &'a str,
    pub date: DateTime<Utc>,
}

impl<'a> From<&'a Event> for EventUpdate<'a> {
    fn from(event: &'a Event) -> Self {
        Self {
            title: &event.title,
            description: event.description.as_deref(),
            city: &event.city,
            venue: &event.venue,
            date: event.date,
        }
    }
}

// ---------------------------------------------------------------------------
// Trips
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub title: String,
    pub origin_city: String,
    pub destination_city: String,
    pub date: DateTime<Utc>,
    pub code: String,
    pub organizer_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for Trip {
    type Error = RepositoryError;

    fn try_from(row: TripRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TripId::from_uuid(row.id),
            title: row.title,
            origin_city: row.origin_city,
            destination_city: row.destination_city,
            date: row.date,
            code: JoinCode::parse(&row.code).map_err(|err| corrupt("code", err))?,
            organizer_id: UserId::from_uuid(row.organizer_id),
            event_id: EventId::from_uuid(row.event_id),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub origin_city: &'a str,
    pub destination_city: &'a str,
    pub date: DateTime<Utc>,
    pub code: &'a str,
    pub organizer_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Trip> for NewTripRow<'a> {
    fn from(trip: &'a Trip) -> Self {
        Self {
            id: *trip.id.as_uuid(),
            title: &trip.title,
            origin_city: &trip.origin_city,
            destination_city: &trip.destination_city,
            date: trip.date,
            code: trip.code.as_ref(),
            organizer_id: *trip.organizer_id.as_uuid(),
            event_id: *trip.event_id.as_uuid(),
            created_at: trip.created_at,
        }
    }
}

/// Editable trip columns. The join code is never rewritten.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trips)]
pub(crate) struct TripUpdate<'a> {
    pub title: &'a str,
    pub origin_city: &'a str,
    pub destination_city: &'a str,
    pub date: DateTime<Utc>,
    pub event_id: Uuid,
}

impl<'a> From<&'a Trip> for TripUpdate<'a> {
    fn from(trip: &'a Trip) -> Self {
        Self {
            title: &trip.title,
            origin_city: &trip.origin_city,
            destination_city: &trip.destination_city,
            date: trip.date,
            event_id: *trip.event_id.as_uuid(),
        }
    }
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub trip_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub profile_public_info: Option<String>,
}

impl From<ParticipantRow> for Participant {
    fn from(row: ParticipantRow) -> Self {
        Self {
            id: ParticipantId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            trip_id: TripId::from_uuid(row.trip_id),
            joined_at: row.joined_at,
            profile_public_info: row.profile_public_info,
        }
    }
}

impl From<&Participant> for ParticipantRow {
    fn from(participant: &Participant) -> Self {
        Self {
            id: *participant.id.as_uuid(),
            user_id: *participant.user_id.as_uuid(),
            trip_id: *participant.trip_id.as_uuid(),
            joined_at: participant.joined_at,
            profile_public_info: participant.profile_public_info.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cost items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cost_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CostItemRow {
    pub id: Uuid,
    pub label: String,
    pub total_amount: Decimal,
    pub trip_id: Uuid,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<CostItemRow> for CostItem {
    fn from(row: CostItemRow) -> Self {
        Self {
            id: CostItemId::from_uuid(row.id),
            label: row.label,
            total_amount: row.total_amount,
            trip_id: TripId::from_uuid(row.trip_id),
            creator_id: UserId::from_uuid(row.creator_id),
            created_at: row.created_at,
        }
    }
}

impl From<&CostItem> for CostItemRow {
    fn from(item: &CostItem) -> Self {
        Self {
            id: *item.id.as_uuid(),
            label: item.label.clone(),
            total_amount: item.total_amount,
            trip_id: *item.trip_id.as_uuid(),
            creator_id: *item.creator_id.as_uuid(),
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = cost_items)]
pub(crate) struct CostItemUpdate<'a> {
    pub label: &'a str,
    pub total_amount: Decimal,
}

// ---------------------------------------------------------------------------
// Vehicle offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = vehicle_offers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VehicleOfferRow {
    pub id: Uuid,
    pub capacity: i32,
    pub price_per_person: Option<Decimal>,
    pub pickup_location: String,
    pub pickup_time: DateTime<Utc>,
    pub notes: Option<String>,
    pub company_id: Uuid,
    pub trip_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<VehicleOfferRow> for VehicleOffer {
    fn from(row: VehicleOfferRow) -> Self {
        Self {
            id: VehicleOfferId::from_uuid(row.id),
            capacity: row.capacity,
            price_per_person: row.price_per_person,
            pickup_location: row.pickup_location,
            pickup_time: row.pickup_time,
            notes: row.notes,
            company_id: CompanyId::from_uuid(row.company_id),
            trip_id: row.trip_id.map(TripId::from_uuid),
            created_at: row.created_at,
        }
    }
}

impl From<&VehicleOffer> for VehicleOfferRow {
    fn from(offer: &VehicleOffer) -> Self {
        Self {
            id: *offer.id.as_uuid(),
            capacity: offer.capacity,
            price_per_person: offer.price_per_person,
            pickup_location: offer.pickup_location.clone(),
            pickup_time: offer.pickup_time,
            notes: offer.notes.clone(),
            company_id: *offer.company_id.as_uuid(),
            trip_id: offer.trip_id.map(|id| *id.as_uuid()),
            created_at: offer.created_at,
        }
    }
}

/// Editable offer columns; `None` clears price, notes and trip.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = vehicle_offers, treat_none_as_null = true)]
pub(crate) struct VehicleOfferUpdate<'a> {
    pub capacity: i32,
    pub price_per_person: Option<Decimal>,
    pub pickup_location: &'a str,
    pub pickup_time: DateTime<Utc>,
    pub notes: Option<&'a str>,
    pub trip_id: Option<Uuid>,
}

impl<'a> From<&'a VehicleOffer> for VehicleOfferUpdate<'a> {
    fn from(offer: &'a VehicleOffer) -> Self {
        Self {
            capacity: offer.capacity,
            price_per_person: offer.price_per_person,
            pickup_location: &offer.pickup_location,
            pickup_time: offer.pickup_time,
            notes: offer.notes.as_deref(),
            trip_id: offer.trip_id.map(|id| *id.as_uuid()),
        }
    }
}
