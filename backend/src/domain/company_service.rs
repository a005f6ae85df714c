//! Company use-cases.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::ports::{CompanyRepository, RepositoryError};
use crate::domain::{
    Action, AuthorizationPolicy, CallerIdentity, Company, CompanyDraft, CompanyId, Error, Page,
    Resource, UserId, require_identity,
};

/// Company CRUD guarded by ownership.
pub struct CompanyService<C: ?Sized> {
    companies: Arc<C>,
    policy: AuthorizationPolicy,
}

impl<C: ?Sized> Clone for CompanyService<C> {
    fn clone(&self) -> Self {
        Self {
            companies: Arc::clone(&self.companies),
            policy: self.policy,
        }
    }
}

impl<C> CompanyService<C>
where
    C: CompanyRepository + ?Sized,
{
    /// Create a new service over the company repository.
    pub fn new(companies: Arc<C>, policy: AuthorizationPolicy) -> Self {
        Self { companies, policy }
    }

    async fn load(&self, id: &CompanyId) -> Result<Company, Error> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("company not found"))
    }

    /// Create a company owned by the caller.
    pub async fn create(
        &self,
        caller: &CallerIdentity,
        draft: CompanyDraft,
    ) -> Result<Company, Error> {
        let identity = require_identity(caller)?;
        self.policy
            .authorize(&identity, Resource::NewCompany, Action::Create)
            .into_result()?;

        let company = draft.into_company(identity.user_id, Utc::now());
        self.companies.insert(&company).await?;
        info!(company_id = %company.id, user_id = %identity.user_id, "company created");
        Ok(company)
    }

    /// Update one of the caller's companies.
    pub async fn update(
        &self,
        caller: &CallerIdentity,
        id: &CompanyId,
        draft: CompanyDraft,
    ) -> Result<Company, Error> {
        let identity = require_identity(caller)?;
        let mut company = self.load(id).await?;
        self.policy
            .authorize(
                &identity,
                Resource::Company {
                    owner: company.owner_id,
                },
                Action::Update,
            )
            .into_result()?;

        draft.apply_to(&mut company);
        self.companies.update(&company).await?;
        info!(company_id = %company.id, "company updated");
        Ok(company)
    }

    /// Delete a company. Fails with a conflict while events or offers still
    /// reference it.
    pub async fn delete(&self, caller: &CallerIdentity, id: &CompanyId) -> Result<bool, Error> {
        let identity = require_identity(caller)?;
        let company = self.load(id).await?;
        self.policy
            .authorize(
                &identity,
                Resource::Company {
                    owner: company.owner_id,
                },
                Action::Delete,
            )
            .into_result()?;

        let removed = self.companies.delete(id).await.map_err(|err| match err {
            RepositoryError::Conflict { .. } => {
                Error::conflict("company still has events or vehicle offers")
            }
            other => other.into(),
        })?;
        info!(company_id = %id, removed, "company deleted");
        Ok(removed)
    }

    /// Newest first.
    pub async fn list(&self, page: Page) -> Result<Vec<Company>, Error> {
        Ok(self.companies.list(page).await?)
    }

    /// Companies owned by the caller; empty when anonymous.
    pub async fn mine(&self, caller: &CallerIdentity) -> Result<Vec<Company>, Error> {
        match caller {
            Ok(identity) => self.for_owner(&identity.user_id).await,
            Err(_) => Ok(Vec::new()),
        }
    }

    /// Companies owned by one user, newest first.
    pub async fn for_owner(&self, owner: &UserId) -> Result<Vec<Company>, Error> {
        Ok(self.companies.list_by_owner(owner).await?)
    }

    /// Look a company up by id.
    pub async fn get(&self, id: &CompanyId) -> Result<Option<Company>, Error> {
        Ok(self.companies.find_by_id(id).await?)
    }
}
