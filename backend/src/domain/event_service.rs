//! Event use-cases.
//!
//! Only the owner of an event's organising company may edit or delete it;
//! events created without a company are therefore read-only after creation.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{CompanyRepository, EventRepository, RepositoryError};
use crate::domain::{
    Action, AuthorizationPolicy, CallerIdentity, CompanyId, Error, Event, EventDraft, EventId,
    EventsFilter, Identity, Page, Resource, UserId, require_identity,
};

/// Event use-cases.
pub struct EventService<E: ?Sized, C: ?Sized> {
    events: Arc<E>,
    companies: Arc<C>,
    policy: AuthorizationPolicy,
}

impl<E: ?Sized, C: ?Sized> Clone for EventService<E, C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            companies: Arc::clone(&self.companies),
            policy: self.policy,
        }
    }
}

impl<E, C> EventService<E, C>
where
    E: EventRepository + ?Sized,
    C: CompanyRepository + ?Sized,
{
    /// Create a new service with the given repositories.
    pub fn new(events: Arc<E>, companies: Arc<C>, policy: AuthorizationPolicy) -> Self {
        Self {
            events,
            companies,
            policy,
        }
    }

    async fn load(&self, id: &EventId) -> Result<Event, Error> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("event not found"))
    }

    async fn company_owner(&self, company: Option<CompanyId>) -> Result<Option<UserId>, Error> {
        let Some(company_id) = company else {
            return Ok(None);
        };
        let company = self
            .companies
            .find_by_id(&company_id)
            .await?
            .ok_or_else(|| Error::not_found("company not found"))?;
        Ok(Some(company.owner_id))
    }

    async fn authorize(
        &self,
        identity: &Identity,
        event: &Event,
        action: Action,
    ) -> Result<(), Error> {
        let company_owner = self.company_owner(event.organizer_company_id).await?;
        self.policy
            .authorize(identity, Resource::Event { company_owner }, action)
            .into_result()
    }

    /// Create an event organised by the caller.
    pub async fn create(&self, caller: &CallerIdentity, draft: EventDraft) -> Result<Event, Error> {
        let identity = require_identity(caller)?;
        let company_owner = self.company_owner(draft.organizer_company_id).await?;
        self.policy
            .authorize(&identity, Resource::NewEvent { company_owner }, Action::Create)
            .into_result()?;

        let event = draft.into_event(Utc::now());
        self.events.insert(&event).await?;
        info!(event_id = %event.id, user_id = %identity.user_id, "event created");
        Ok(event)
    }

    /// Update an event the caller organizes.
    pub async fn update(
        &self,
        caller: &CallerIdentity,
        id: &EventId,
        draft: EventDraft,
    ) -> Result<Event, Error> {
        let identity = require_identity(caller)?;
        let mut event = self.load(id).await?;
        self.authorize(&identity, &event, Action::Update).await?;

        draft.apply_to(&mut event);
        self.events.update(&event).await?;
        info!(event_id = %event.id, "event updated");
        Ok(event)
    }

    /// Delete an event. Fails with a conflict while trips still target it.
    pub async fn delete(&self, caller: &CallerIdentity, id: &EventId) -> Result<bool, Error> {
        let identity = require_identity(caller)?;
        let event = self.load(id).await?;
        self.authorize(&identity, &event, Action::Delete).await?;

        let removed = self.events.delete(id).await.map_err(|err| match err {
            RepositoryError::Conflict { .. } => Error::conflict("event still has trips"),
            other => other.into(),
        })?;
        info!(event_id = %id, removed, "event deleted");
        Ok(removed)
    }

    /// Filtered events ordered by date ascending.
    pub async fn list(&self, filter: EventsFilter, page: Page) -> Result<Vec<Event>, Error> {
        Ok(self.events.list(&filter.normalised(), page).await?)
    }

    /// Look an event up by id.
    pub async fn get(&self, id: &EventId) -> Result<Option<Event>, Error> {
        Ok(self.events.find_by_id(id).await?)
    }

    /// Events organised by one company.
    pub async fn for_company(&self, company: &CompanyId) -> Result<Vec<Event>, Error> {
        Ok(self.events.list_by_company(company).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCompanyRepository, MockEventRepository};
    use crate::domain::{CompanyDraft, ErrorCode, Role};
    use rstest::{fixture, rstest};

    #[fixture]
    fn caller() -> Identity {
        Identity {
            user_id: UserId::random(),
            role: Role::Company,
        }
    }

    fn event_draft(company: Option<CompanyId>) -> EventDraft {
        EventDraft::try_new("Rock Fest", None, "Lisbon", "Arena", Utc::now(), company)
            .expect("valid draft")
    }

    fn company_owned_by(owner: UserId) -> crate::domain::Company {
        CompanyDraft::try_new("Promoters", None, "hi@promoters.test")
            .expect("valid")
            .into_company(owner, Utc::now())
    }

    fn service(
        events: MockEventRepository,
        companies: MockCompanyRepository,
    ) -> EventService<MockEventRepository, MockCompanyRepository> {
        EventService::new(Arc::new(events), Arc::new(companies), AuthorizationPolicy::default())
    }

    #[rstest]
    #[tokio::test]
    async fn create_for_foreign_company_is_forbidden(caller: Identity) {
        let company = company_owned_by(UserId::random());
        let company_id = company.id;
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(company)));
        let mut events = MockEventRepository::new();
        events.expect_insert().never();

        let err = service(events, companies)
            .create(&Ok(caller), event_draft(Some(company_id)))
            .await
            .expect_err("forbidden");
        assert_eq!(err.message(), "you can only create events for your own companies");
    }

    #[rstest]
    #[tokio::test]
    async fn create_for_missing_company_is_not_found(caller: Identity) {
        let mut companies = MockCompanyRepository::new();
        companies.expect_find_by_id().return_once(|_| Ok(None));

        let err = service(MockEventRepository::new(), companies)
            .create(&Ok(caller), event_draft(Some(CompanyId::random())))
            .await
            .expect_err("missing company");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn create_without_company_is_allowed(caller: Identity) {
        let mut events = MockEventRepository::new();
        events.expect_insert().times(1).return_once(|_| Ok(()));

        let event = service(events, MockCompanyRepository::new())
            .create(&Ok(caller), event_draft(None))
            .await
            .expect("created");
        assert!(event.organizer_company_id.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn company_owner_may_update(caller: Identity) {
        let company = company_owned_by(caller.user_id);
        let event = event_draft(Some(company.id)).into_event(Utc::now());
        let id = event.id;
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(company)));
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().return_once(move |_| Ok(Some(event)));
        events.expect_update().times(1).return_once(|_| Ok(()));

        let updated = service(events, companies)
            .update(
                &Ok(caller),
                &id,
                EventDraft::try_new("Rock Fest II", None, "Porto", "Park", Utc::now(), None)
                    .expect("valid"),
            )
            .await
            .expect("updated");
        assert_eq!(updated.title, "Rock Fest II");
        assert!(updated.organizer_company_id.is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn companyless_event_cannot_be_deleted(caller: Identity) {
        let event = event_draft(None).into_event(Utc::now());
        let id = event.id;
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().return_once(move |_| Ok(Some(event)));
        events.expect_delete().never();

        let err = service(events, MockCompanyRepository::new())
            .delete(&Ok(caller), &id)
            .await
            .expect_err("forbidden");
        assert_eq!(err.message(), "only the organizer can delete the event");
    }

    #[rstest]
    #[tokio::test]
    async fn delete_with_trips_is_conflict(caller: Identity) {
        let company = company_owned_by(caller.user_id);
        let event = event_draft(Some(company.id)).into_event(Utc::now());
        let id = event.id;
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(company)));
        let mut events = MockEventRepository::new();
        events.expect_find_by_id().return_once(move |_| Ok(Some(event)));
        events
            .expect_delete()
            .return_once(|_| Err(RepositoryError::conflict("trips_event_id_fkey")));

        let err = service(events, companies)
            .delete(&Ok(caller), &id)
            .await
            .expect_err("conflict");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "event still has trips");
    }
}
