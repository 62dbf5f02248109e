//! Tender persistence.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::{Tender, TenderStatus};

/// Store boundary for tenders.
#[async_trait]
pub trait TenderStore: Send + Sync {
    async fn create(&self, tender: &Tender) -> DatabaseResult<Tender>;
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Tender>>;
    /// All tenders, newest first.
    async fn list(&self) -> DatabaseResult<Vec<Tender>>;
    /// Updates the lifecycle state, `NotFound` when the tender is missing.
    async fn set_status(&self, id: Uuid, status: TenderStatus) -> DatabaseResult<Tender>;
}

/// In-memory store for tests and local development.
#[derive(Default)]
pub struct InMemoryTenderStore {
    tenders: DashMap<Uuid, Tender>,
}

impl InMemoryTenderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenderStore for InMemoryTenderStore {
    async fn create(&self, tender: &Tender) -> DatabaseResult<Tender> {
        if self.tenders.contains_key(&tender.id) {
            return Err(DatabaseError::Duplicate);
        }
        self.tenders.insert(tender.id, tender.clone());
        Ok(tender.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Tender>> {
        Ok(self.tenders.get(&id).map(|tender| tender.clone()))
    }

    async fn list(&self) -> DatabaseResult<Vec<Tender>> {
        let mut tenders: Vec<Tender> = self.tenders.iter().map(|tender| tender.clone()).collect();
        tenders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tenders)
    }

    async fn set_status(&self, id: Uuid, status: TenderStatus) -> DatabaseResult<Tender> {
        let mut tender = self.tenders.get_mut(&id).ok_or(DatabaseError::NotFound)?;
        tender.status = status;
        Ok(tender.clone())
    }
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgTenderStore {
    pool: DatabasePool,
}

impl PgTenderStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenderStore for PgTenderStore {
    async fn create(&self, tender: &Tender) -> DatabaseResult<Tender> {
        let created = sqlx::query_as::<_, Tender>(
            r#"
            INSERT INTO tenders (
                id, title, description, category, budget,
                deadline, status, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(tender.id)
        .bind(&tender.title)
        .bind(&tender.description)
        .bind(&tender.category)
        .bind(tender.budget)
        .bind(tender.deadline)
        .bind(tender.status.as_str())
        .bind(tender.created_by)
        .bind(tender.created_at)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Tender>> {
        let tender = sqlx::query_as::<_, Tender>("SELECT * FROM tenders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(tender)
    }

    async fn list(&self) -> DatabaseResult<Vec<Tender>> {
        let tenders =
            sqlx::query_as::<_, Tender>("SELECT * FROM tenders ORDER BY created_at DESC")
                .fetch_all(self.pool.pool())
                .await?;

        Ok(tenders)
    }

    async fn set_status(&self, id: Uuid, status: TenderStatus) -> DatabaseResult<Tender> {
        sqlx::query_as::<_, Tender>("UPDATE tenders SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(self.pool.pool())
            .await?
            .ok_or(DatabaseError::NotFound)
    }
}
