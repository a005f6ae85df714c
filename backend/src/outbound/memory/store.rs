//! Mutex-guarded tables implementing the repository ports.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CompanyRepository, CostItemRepository, EventRepository, ParticipantRepository,
    RepositoryError, StorageHealth, TripRepository, UserRepository, VehicleOfferRepository,
    constraint,
};
use crate::domain::{
    Company, CompanyId, CostItem, CostItemId, EmailAddress, Event, EventId, EventsFilter,
    JoinCode, Page, Participant, ParticipantId, Trip, TripId, TripsFilter, User, UserId,
    VehicleOffer, VehicleOfferId,
};

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    companies: HashMap<CompanyId, Company>,
    events: HashMap<EventId, Event>,
    trips: HashMap<TripId, Trip>,
    participants: HashMap<ParticipantId, Participant>,
    cost_items: HashMap<CostItemId, CostItem>,
    vehicle_offers: HashMap<VehicleOfferId, VehicleOffer>,
}

fn require(present: bool, constraint: &str) -> Result<(), RepositoryError> {
    if present {
        Ok(())
    } else {
        Err(RepositoryError::conflict(constraint))
    }
}

impl Tables {
    fn check_participant(&self, participant: &Participant) -> Result<(), RepositoryError> {
        require(
            self.users.contains_key(&participant.user_id),
            constraint::PARTICIPANTS_USER_ID_FKEY,
        )?;
        require(
            self.trips.contains_key(&participant.trip_id),
            constraint::PARTICIPANTS_TRIP_ID_FKEY,
        )?;
        let duplicate = self.participants.values().any(|existing| {
            existing.user_id == participant.user_id && existing.trip_id == participant.trip_id
        });
        require(!duplicate, constraint::PARTICIPANTS_USER_ID_TRIP_ID_KEY)
    }

    fn check_offer(&self, offer: &VehicleOffer) -> Result<(), RepositoryError> {
        require(
            self.companies.contains_key(&offer.company_id),
            "vehicle_offers_company_id_fkey",
        )?;
        require(
            offer
                .trip_id
                .is_none_or(|trip| self.trips.contains_key(&trip)),
            "vehicle_offers_trip_id_fkey",
        )
    }
}

/// Every repository port over shared in-memory tables.
///
/// Cloning is not supported; share the store through an `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::connection("in-memory store lock poisoned"))
    }
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let taken = tables.users.values().any(|u| u.email == user.email);
        require(!taken, constraint::USERS_EMAIL_KEY)?;
        require(!tables.users.contains_key(&user.id), "users_pkey")?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

#[async_trait]
impl CompanyRepository for MemoryStore {
    async fn insert(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(
            tables.users.contains_key(&company.owner_id),
            "companies_owner_id_fkey",
        )?;
        tables.companies.insert(company.id, company.clone());
        Ok(())
    }

    async fn update(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let stored = tables
            .companies
            .get_mut(&company.id)
            .ok_or_else(|| RepositoryError::not_found("company not found"))?;
        stored.name.clone_from(&company.name);
        stored.description.clone_from(&company.description);
        stored.contact_email = company.contact_email.clone();
        Ok(())
    }

    async fn delete(&self, id: &CompanyId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        let referenced = tables
            .events
            .values()
            .any(|event| event.organizer_company_id == Some(*id));
        require(!referenced, "events_organizer_company_id_fkey")?;
        let offered = tables.vehicle_offers.values().any(|o| o.company_id == *id);
        require(!offered, "vehicle_offers_company_id_fkey")?;
        Ok(tables.companies.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        Ok(self.lock()?.companies.get(id).cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<Company>, RepositoryError> {
        let all = self.lock()?.companies.values().cloned().collect();
        let newest_first = sorted_by(all, |c: &Company| {
            (std::cmp::Reverse(c.created_at), std::cmp::Reverse(c.id))
        });
        Ok(page.slice(newest_first))
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Company>, RepositoryError> {
        let owned = self
            .lock()?
            .companies
            .values()
            .filter(|c| c.owner_id == *owner)
            .cloned()
            .collect();
        Ok(sorted_by(owned, |c: &Company| (c.created_at, c.id)))
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(
            event
                .organizer_company_id
                .is_none_or(|company| tables.companies.contains_key(&company)),
            "events_organizer_company_id_fkey",
        )?;
        tables.events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update(&self, event: &Event) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let stored = tables
            .events
            .get_mut(&event.id)
            .ok_or_else(|| RepositoryError::not_found("event not found"))?;
        stored.title.clone_from(&event.title);
        stored.description.clone_from(&event.description);
        stored.city.clone_from(&event.city);
        stored.venue.clone_from(&event.venue);
        stored.date = event.date;
        Ok(())
    }

    async fn delete(&self, id: &EventId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        let has_trips = tables.trips.values().any(|trip| trip.event_id == *id);
        require(!has_trips, constraint::TRIPS_EVENT_ID_FKEY)?;
        Ok(tables.events.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &EventId) -> Result<Option<Event>, RepositoryError> {
        Ok(self.lock()?.events.get(id).cloned())
    }

    async fn list(&self, filter: &EventsFilter, page: Page) -> Result<Vec<Event>, RepositoryError> {
        let matching = self
            .lock()?
            .events
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        Ok(page.slice(sorted_by(matching, |e: &Event| (e.date, e.id))))
    }

    async fn list_by_company(&self, company: &CompanyId) -> Result<Vec<Event>, RepositoryError> {
        let events = self
            .lock()?
            .events
            .values()
            .filter(|e| e.organizer_company_id == Some(*company))
            .cloned()
            .collect();
        Ok(sorted_by(events, |e: &Event| (e.date, e.id)))
    }
}

#[async_trait]
impl TripRepository for MemoryStore {
    async fn create_with_organizer(
        &self,
        trip: &Trip,
        organizer: &Participant,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(
            tables.users.contains_key(&trip.organizer_id),
            constraint::TRIPS_ORGANIZER_ID_FKEY,
        )?;
        require(tables.events.contains_key(&trip.event_id), constraint::TRIPS_EVENT_ID_FKEY)?;
        let code_taken = tables.trips.values().any(|t| t.code == trip.code);
        require(!code_taken, constraint::TRIPS_CODE_KEY)?;

        // Both rows are validated before either is written.
        tables.trips.insert(trip.id, trip.clone());
        if let Err(err) = tables.check_participant(organizer) {
            tables.trips.remove(&trip.id);
            return Err(err);
        }
        tables.participants.insert(organizer.id, organizer.clone());
        Ok(())
    }

    async fn update(&self, trip: &Trip) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(tables.events.contains_key(&trip.event_id), constraint::TRIPS_EVENT_ID_FKEY)?;
        let stored = tables
            .trips
            .get_mut(&trip.id)
            .ok_or_else(|| RepositoryError::not_found("trip not found"))?;
        stored.title.clone_from(&trip.title);
        stored.origin_city.clone_from(&trip.origin_city);
        stored.destination_city.clone_from(&trip.destination_city);
        stored.date = trip.date;
        stored.event_id = trip.event_id;
        Ok(())
    }

    async fn delete_cascade(&self, id: &TripId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        tables.participants.retain(|_, p| p.trip_id != *id);
        tables.cost_items.retain(|_, item| item.trip_id != *id);
        for offer in tables.vehicle_offers.values_mut() {
            if offer.trip_id == Some(*id) {
                offer.trip_id = None;
            }
        }
        Ok(tables.trips.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &TripId) -> Result<Option<Trip>, RepositoryError> {
        Ok(self.lock()?.trips.get(id).cloned())
    }

    async fn find_by_code(&self, code: &JoinCode) -> Result<Option<Trip>, RepositoryError> {
        Ok(self
            .lock()?
            .trips
            .values()
            .find(|trip| &trip.code == code)
            .cloned())
    }

    async fn list(&self, filter: &TripsFilter, page: Page) -> Result<Vec<Trip>, RepositoryError> {
        let matching = self
            .lock()?
            .trips
            .values()
            .filter(|trip| filter.matches(trip))
            .cloned()
            .collect();
        Ok(page.slice(sorted_by(matching, |t: &Trip| (t.date, t.id))))
    }

    async fn list_by_organizer(&self, organizer: &UserId) -> Result<Vec<Trip>, RepositoryError> {
        let trips = self
            .lock()?
            .trips
            .values()
            .filter(|t| t.organizer_id == *organizer)
            .cloned()
            .collect();
        Ok(sorted_by(trips, |t: &Trip| {
            (std::cmp::Reverse(t.created_at), std::cmp::Reverse(t.id))
        }))
    }

    async fn list_by_event(&self, event: &EventId) -> Result<Vec<Trip>, RepositoryError> {
        let trips = self
            .lock()?
            .trips
            .values()
            .filter(|t| t.event_id == *event)
            .cloned()
            .collect();
        Ok(sorted_by(trips, |t: &Trip| (t.date, t.id)))
    }
}

#[async_trait]
impl ParticipantRepository for MemoryStore {
    async fn insert(&self, participant: &Participant) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_participant(participant)?;
        tables.participants.insert(participant.id, participant.clone());
        Ok(())
    }

    async fn delete(&self, id: &ParticipantId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.participants.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &ParticipantId) -> Result<Option<Participant>, RepositoryError> {
        Ok(self.lock()?.participants.get(id).cloned())
    }

    async fn find_by_user_and_trip(
        &self,
        user: &UserId,
        trip: &TripId,
    ) -> Result<Option<Participant>, RepositoryError> {
        Ok(self
            .lock()?
            .participants
            .values()
            .find(|p| p.user_id == *user && p.trip_id == *trip)
            .cloned())
    }

    async fn list_by_trip(&self, trip: &TripId) -> Result<Vec<Participant>, RepositoryError> {
        let members = self
            .lock()?
            .participants
            .values()
            .filter(|p| p.trip_id == *trip)
            .cloned()
            .collect();
        Ok(sorted_by(members, |p: &Participant| (p.joined_at, p.id)))
    }

    async fn list_by_user(&self, user: &UserId) -> Result<Vec<Participant>, RepositoryError> {
        let memberships = self
            .lock()?
            .participants
            .values()
            .filter(|p| p.user_id == *user)
            .cloned()
            .collect();
        Ok(sorted_by(memberships, |p: &Participant| {
            (std::cmp::Reverse(p.joined_at), std::cmp::Reverse(p.id))
        }))
    }

    async fn count_by_trip(&self, trip: &TripId) -> Result<i64, RepositoryError> {
        let count = self
            .lock()?
            .participants
            .values()
            .filter(|p| p.trip_id == *trip)
            .count();
        i64::try_from(count).map_err(|err| RepositoryError::query(err.to_string()))
    }
}

#[async_trait]
impl CostItemRepository for MemoryStore {
    async fn insert(&self, item: &CostItem) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        require(tables.trips.contains_key(&item.trip_id), "cost_items_trip_id_fkey")?;
        require(
            tables.users.contains_key(&item.creator_id),
            "cost_items_creator_id_fkey",
        )?;
        tables.cost_items.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(&self, item: &CostItem) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        let stored = tables
            .cost_items
            .get_mut(&item.id)
            .ok_or_else(|| RepositoryError::not_found("cost item not found"))?;
        stored.label.clone_from(&item.label);
        stored.total_amount = item.total_amount;
        Ok(())
    }

    async fn delete(&self, id: &CostItemId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.cost_items.remove(id).is_some())
    }

    async fn find_by_id(&self, id: &CostItemId) -> Result<Option<CostItem>, RepositoryError> {
        Ok(self.lock()?.cost_items.get(id).cloned())
    }

    async fn list_by_trip(&self, trip: &TripId) -> Result<Vec<CostItem>, RepositoryError> {
        let items = self
            .lock()?
            .cost_items
            .values()
            .filter(|item| item.trip_id == *trip)
            .cloned()
            .collect();
        Ok(sorted_by(items, |i: &CostItem| {
            (std::cmp::Reverse(i.created_at), std::cmp::Reverse(i.id))
        }))
    }
}

#[async_trait]
impl VehicleOfferRepository for MemoryStore {
    async fn insert(&self, offer: &VehicleOffer) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_offer(offer)?;
        tables.vehicle_offers.insert(offer.id, offer.clone());
        Ok(())
    }

    async fn update(&self, offer: &VehicleOffer) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        tables.check_offer(offer)?;
        let stored = tables
            .vehicle_offers
            .get_mut(&offer.id)
            .ok_or_else(|| RepositoryError::not_found("vehicle offer not found"))?;
        let company_id = stored.company_id;
        *stored = VehicleOffer {
            company_id,
            created_at: stored.created_at,
            ..offer.clone()
        };
        Ok(())
    }

    async fn delete(&self, id: &VehicleOfferId) -> Result<bool, RepositoryError> {
        Ok(self.lock()?.vehicle_offers.remove(id).is_some())
    }

    async fn find_by_id(
        &self,
        id: &VehicleOfferId,
    ) -> Result<Option<VehicleOffer>, RepositoryError> {
        Ok(self.lock()?.vehicle_offers.get(id).cloned())
    }

    async fn list(&self, trip: Option<TripId>) -> Result<Vec<VehicleOffer>, RepositoryError> {
        let offers = self
            .lock()?
            .vehicle_offers
            .values()
            .filter(|o| trip.is_none_or(|trip| o.trip_id == Some(trip)))
            .cloned()
            .collect();
        Ok(sorted_by(offers, |o: &VehicleOffer| {
            (std::cmp::Reverse(o.created_at), std::cmp::Reverse(o.id))
        }))
    }

    async fn list_by_company(
        &self,
        company: &CompanyId,
    ) -> Result<Vec<VehicleOffer>, RepositoryError> {
        let offers = self
            .lock()?
            .vehicle_offers
            .values()
            .filter(|o| o.company_id == *company)
            .cloned()
            .collect();
        Ok(sorted_by(offers, |o: &VehicleOffer| {
            (std::cmp::Reverse(o.created_at), std::cmp::Reverse(o.id))
        }))
    }
}

#[async_trait]
impl StorageHealth for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.lock().map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
