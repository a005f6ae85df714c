//! PostgreSQL-backed `CompanyRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CompanyRepository, RepositoryError};
use crate::domain::{Company, CompanyId, Page, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CompanyRow, CompanyUpdate, NewCompanyRow};
use super::pool::DbPool;
use super::schema::companies;

/// Diesel-backed implementation of the `CompanyRepository` port.
#[derive(Clone)]
pub struct DieselCompanyRepository {
    pool: DbPool,
}

impl DieselCompanyRepository {
    /// Create a repository backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_companies(rows: Vec<CompanyRow>) -> Result<Vec<Company>, RepositoryError> {
    rows.into_iter().map(Company::try_from).collect()
}

#[async_trait]
impl CompanyRepository for DieselCompanyRepository {
    async fn insert(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(companies::table)
            .values(NewCompanyRow::from(company))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(companies::table.find(company.id.as_uuid()))
            .set(CompanyUpdate::from(company))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(RepositoryError::not_found("company not found"));
        }
        Ok(())
    }

    async fn delete(&self, id: &CompanyId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(companies::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CompanyRow> = companies::table
            .find(id.as_uuid())
            .select(CompanyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Company::try_from).transpose()
    }

    async fn list(&self, page: Page) -> Result<Vec<Company>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CompanyRow> = companies::table
            .select(CompanyRow::as_select())
            .order_by((companies::created_at.desc(), companies::id.desc()))
            .limit(page.limit())
            .offset(page.offset())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_companies(rows)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Company>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CompanyRow> = companies::table
            .filter(companies::owner_id.eq(owner.as_uuid()))
            .select(CompanyRow::as_select())
            .order_by((companies::created_at.asc(), companies::id.asc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_companies(rows)
    }
}
