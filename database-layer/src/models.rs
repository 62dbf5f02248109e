//! Procurement domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a tender. Stored as lowercase TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TenderStatus {
    Open,
    Awarded,
    Closed,
}

impl TenderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenderStatus::Open => "open",
            TenderStatus::Awarded => "awarded",
            TenderStatus::Closed => "closed",
        }
    }
}

impl std::fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string no longer matches the enum.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown tender status: {0}")]
pub struct ParseStatusError(pub String);

impl std::str::FromStr for TenderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TenderStatus::Open),
            "awarded" => Ok(TenderStatus::Awarded),
            "closed" => Ok(TenderStatus::Closed),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for TenderStatus {
    type Error = ParseStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A published procurement opportunity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Tender {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Budget in minor currency units.
    pub budget: i64,
    pub deadline: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: TenderStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for publishing a tender.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTender {
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: i64,
    pub deadline: DateTime<Utc>,
}

/// A supplier's offer against a tender.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub tender_id: Uuid,
    pub supplier_id: Uuid,
    pub organization_id: Uuid,
    /// Offered amount in minor currency units.
    pub amount: i64,
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}
