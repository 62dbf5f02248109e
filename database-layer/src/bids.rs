//! Bid persistence.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::connection::DatabasePool;
use crate::error::{DatabaseError, DatabaseResult};
use crate::models::Bid;
use crate::tenders::TenderStore;

/// Store boundary for bids.
#[async_trait]
pub trait BidStore: Send + Sync {
    /// Persists a bid, `InvalidReference` when the tender does not exist.
    async fn create(&self, bid: &Bid) -> DatabaseResult<Bid>;
    /// All bids, newest first.
    async fn list(&self) -> DatabaseResult<Vec<Bid>>;
}

/// In-memory store enforcing the tender reference the way the foreign key
/// on the `bids` table does.
pub struct InMemoryBidStore {
    bids: DashMap<Uuid, Bid>,
    tenders: Arc<dyn TenderStore>,
}

impl InMemoryBidStore {
    pub fn new(tenders: Arc<dyn TenderStore>) -> Self {
        Self {
            bids: DashMap::new(),
            tenders,
        }
    }
}

#[async_trait]
impl BidStore for InMemoryBidStore {
    async fn create(&self, bid: &Bid) -> DatabaseResult<Bid> {
        if self.tenders.find_by_id(bid.tender_id).await?.is_none() {
            return Err(DatabaseError::InvalidReference);
        }
        self.bids.insert(bid.id, bid.clone());
        Ok(bid.clone())
    }

    async fn list(&self) -> DatabaseResult<Vec<Bid>> {
        let mut bids: Vec<Bid> = self.bids.iter().map(|bid| bid.clone()).collect();
        bids.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(bids)
    }
}

/// Postgres-backed store, the tender reference is enforced by the schema.
#[derive(Clone)]
pub struct PgBidStore {
    pool: DatabasePool,
}

impl PgBidStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BidStore for PgBidStore {
    async fn create(&self, bid: &Bid) -> DatabaseResult<Bid> {
        let created = sqlx::query_as::<_, Bid>(
            r#"
            INSERT INTO bids (
                id, tender_id, supplier_id, organization_id,
                amount, notes, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(bid.id)
        .bind(bid.tender_id)
        .bind(bid.supplier_id)
        .bind(bid.organization_id)
        .bind(bid.amount)
        .bind(&bid.notes)
        .bind(bid.submitted_at)
        .fetch_one(self.pool.pool())
        .await?;

        Ok(created)
    }

    async fn list(&self) -> DatabaseResult<Vec<Bid>> {
        let bids = sqlx::query_as::<_, Bid>("SELECT * FROM bids ORDER BY submitted_at DESC")
            .fetch_all(self.pool.pool())
            .await?;

        Ok(bids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tender, TenderStatus};
    use crate::tenders::InMemoryTenderStore;
    use chrono::{Duration, Utc};

    fn sample_tender() -> Tender {
        Tender {
            id: Uuid::new_v4(),
            title: "Fleet maintenance".to_string(),
            description: "Annual vehicle servicing".to_string(),
            category: "services".to_string(),
            budget: 800_000,
            deadline: Utc::now() + Duration::days(14),
            status: TenderStatus::Open,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn sample_bid(tender_id: Uuid, age_minutes: i64) -> Bid {
        Bid {
            id: Uuid::new_v4(),
            tender_id,
            supplier_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            amount: 750_000,
            notes: Some("Includes parts".to_string()),
            submitted_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn bids_against_existing_tenders_are_accepted() {
        let tenders = Arc::new(InMemoryTenderStore::new());
        let tender = sample_tender();
        tenders.create(&tender).await.expect("create tender");

        let store = InMemoryBidStore::new(tenders);
        let bid = sample_bid(tender.id, 0);
        let created = store.create(&bid).await.expect("create bid");
        assert_eq!(created.tender_id, tender.id);
    }

    #[tokio::test]
    async fn bids_against_missing_tenders_are_invalid_references() {
        let tenders = Arc::new(InMemoryTenderStore::new());
        let store = InMemoryBidStore::new(tenders);

        let err = store
            .create(&sample_bid(Uuid::new_v4(), 0))
            .await
            .expect_err("must fail");
        assert!(matches!(err, DatabaseError::InvalidReference));
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let tenders = Arc::new(InMemoryTenderStore::new());
        let tender = sample_tender();
        tenders.create(&tender).await.expect("create tender");

        let store = InMemoryBidStore::new(tenders);
        let older = sample_bid(tender.id, 10);
        let newer = sample_bid(tender.id, 1);
        store.create(&older).await.expect("create older");
        store.create(&newer).await.expect("create newer");

        let bids = store.list().await.expect("list");
        assert_eq!(bids.len(), 2);
        assert_eq!(bids[0].id, newer.id);
        assert_eq!(bids[1].id, older.id);
    }
}
