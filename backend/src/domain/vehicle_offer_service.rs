//! Vehicle offer use-cases.
//!
//! Offers belong to a company. When the caller names no company, their
//! oldest company is used; callers without a company cannot post offers.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{CompanyRepository, TripRepository, VehicleOfferRepository};
use crate::domain::{
    Action, AuthorizationPolicy, CallerIdentity, Company, CompanyId, Error, Identity, Resource,
    TripId, UserId, VehicleOffer, VehicleOfferDraft, VehicleOfferId, require_identity,
};

/// Vehicle offer use-cases for company owners.
pub struct VehicleOfferService<V: ?Sized, C: ?Sized, T: ?Sized> {
    offers: Arc<V>,
    companies: Arc<C>,
    trips: Arc<T>,
    policy: AuthorizationPolicy,
}

impl<V: ?Sized, C: ?Sized, T: ?Sized> Clone for VehicleOfferService<V, C, T> {
    fn clone(&self) -> Self {
        Self {
            offers: Arc::clone(&self.offers),
            companies: Arc::clone(&self.companies),
            trips: Arc::clone(&self.trips),
            policy: self.policy,
        }
    }
}

impl<V, C, T> VehicleOfferService<V, C, T>
where
    V: VehicleOfferRepository + ?Sized,
    C: CompanyRepository + ?Sized,
    T: TripRepository + ?Sized,
{
    /// Create a new service with the given repositories.
    pub fn new(offers: Arc<V>, companies: Arc<C>, trips: Arc<T>, policy: AuthorizationPolicy) -> Self {
        Self {
            offers,
            companies,
            trips,
            policy,
        }
    }

    async fn load(&self, id: &VehicleOfferId) -> Result<VehicleOffer, Error> {
        self.offers
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("vehicle offer not found"))
    }

    async fn company_owner(&self, company: &CompanyId) -> Result<UserId, Error> {
        self.companies
            .find_by_id(company)
            .await?
            .map(|company| company.owner_id)
            .ok_or_else(|| Error::not_found("company not found"))
    }

    /// Resolve the offering company: the named one, else the caller's first.
    async fn offering_company(
        &self,
        identity: &Identity,
        requested: Option<CompanyId>,
    ) -> Result<CompanyId, Error> {
        let (company, company_owner) = match requested {
            Some(id) => (Some(id), Some(self.company_owner(&id).await?)),
            None => {
                let first: Option<Company> = self
                    .companies
                    .list_by_owner(&identity.user_id)
                    .await?
                    .into_iter()
                    .next();
                (first.as_ref().map(|c| c.id), first.map(|c| c.owner_id))
            }
        };
        self.policy
            .authorize(identity, Resource::NewVehicleOffer { company_owner }, Action::Create)
            .into_result()?;
        company.ok_or_else(|| Error::forbidden("only companies can create vehicle offers"))
    }

    async fn ensure_trip(&self, trip: Option<TripId>) -> Result<(), Error> {
        let Some(id) = trip else {
            return Ok(());
        };
        match self.trips.find_by_id(&id).await? {
            Some(_) => Ok(()),
            None => Err(Error::not_found("trip not found")),
        }
    }

    async fn authorize(
        &self,
        identity: &Identity,
        offer: &VehicleOffer,
        action: Action,
    ) -> Result<(), Error> {
        let company_owner = self.company_owner(&offer.company_id).await?;
        self.policy
            .authorize(identity, Resource::VehicleOffer { company_owner }, action)
            .into_result()
    }

    /// Publish an offer on behalf of one of the caller's companies.
    pub async fn create(
        &self,
        caller: &CallerIdentity,
        draft: VehicleOfferDraft,
    ) -> Result<VehicleOffer, Error> {
        let identity = require_identity(caller)?;
        let company = self.offering_company(&identity, draft.company_id).await?;
        self.ensure_trip(draft.trip_id).await?;

        let offer = draft.into_offer(company, Utc::now());
        self.offers.insert(&offer).await?;
        info!(
            offer_id = %offer.id,
            company_id = %offer.company_id,
            capacity = offer.capacity,
            "vehicle offer created"
        );
        Ok(offer)
    }

    /// Update an offer of a company the caller owns.
    pub async fn update(
        &self,
        caller: &CallerIdentity,
        id: &VehicleOfferId,
        draft: VehicleOfferDraft,
    ) -> Result<VehicleOffer, Error> {
        let identity = require_identity(caller)?;
        let mut offer = self.load(id).await?;
        self.authorize(&identity, &offer, Action::Update).await?;
        if draft.trip_id != offer.trip_id {
            self.ensure_trip(draft.trip_id).await?;
        }

        draft.apply_to(&mut offer);
        self.offers.update(&offer).await?;
        info!(offer_id = %offer.id, "vehicle offer updated");
        Ok(offer)
    }

    /// Delete an offer of a company the caller owns.
    pub async fn delete(
        &self,
        caller: &CallerIdentity,
        id: &VehicleOfferId,
    ) -> Result<bool, Error> {
        let identity = require_identity(caller)?;
        let offer = self.load(id).await?;
        self.authorize(&identity, &offer, Action::Delete).await?;

        let removed = self.offers.delete(id).await?;
        info!(offer_id = %id, removed, "vehicle offer deleted");
        Ok(removed)
    }

    /// Offers for one trip, or all offers; newest first.
    pub async fn list(&self, trip: Option<TripId>) -> Result<Vec<VehicleOffer>, Error> {
        Ok(self.offers.list(trip).await?)
    }

    /// Look an offer up by id.
    pub async fn get(&self, id: &VehicleOfferId) -> Result<Option<VehicleOffer>, Error> {
        Ok(self.offers.find_by_id(id).await?)
    }

    /// Offers published by one company.
    pub async fn for_company(&self, company: &CompanyId) -> Result<Vec<VehicleOffer>, Error> {
        Ok(self.offers.list_by_company(company).await?)
    }
}
