use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use database_layer::Bid;

use crate::auth::Principal;
use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::ProcureServer;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_length};

/// Offer against a tender; the tender comes from the URL.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "amount": 23750000,
    "notes": "Includes night works at no extra cost"
}))]
pub struct SubmitBidRequest {
    /// Offered amount in minor currency units
    #[serde(default)]
    pub amount: i64,
    /// Free-form remarks for the reviewing officer
    pub notes: Option<String>,
}

impl RequestValidation for SubmitBidRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_field!(self.amount, self.amount > 0, "Amount must be positive");
        if let Some(notes) = &self.notes {
            validate_length!(notes, 1, 2000, "Notes must be between 1 and 2000 characters");
        }
        Ok(())
    }
}

/// Submit a bid for a tender
///
/// The supplier and organization are taken from the authenticated
/// principal, never from the payload.
#[utoipa::path(
    post,
    path = "/api/v1/tenders/{id}/bids",
    tag = "bids",
    params(
        ("id" = Uuid, Path, description = "Tender ID")
    ),
    request_body = SubmitBidRequest,
    responses(
        (status = 201, description = "Bid recorded", body = Bid),
        (status = 400, description = "Validation failed or tender does not exist"),
        (status = 403, description = "Caller is not a supplier with an organization")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_bid(
    State(server): State<ProcureServer>,
    principal: Principal,
    Path(tender_id): Path<Uuid>,
    Json(request): Json<SubmitBidRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Bid>>), ApiError> {
    request.validate()?;

    // The organization guard runs upstream; rechecking keeps this handler
    // safe if it is ever mounted without that layer.
    let organization_id = principal.organization_id.ok_or_else(|| {
        ApiError::authorization("You must belong to an organization to perform this action")
    })?;

    let bid = Bid {
        id: Uuid::new_v4(),
        tender_id,
        supplier_id: principal.id,
        organization_id,
        amount: request.amount,
        notes: request.notes,
        submitted_at: Utc::now(),
    };
    let created = server.bids.create(&bid).await?;

    tracing::info!(
        bid_id = %created.id,
        tender_id = %tender_id,
        supplier_id = %principal.id,
        "bid submitted"
    );
    Ok((StatusCode::CREATED, Json(api_success(created))))
}

/// List bids submitted for a tender
#[utoipa::path(
    get,
    path = "/api/v1/tenders/{id}/bids",
    tag = "bids",
    params(
        ("id" = Uuid, Path, description = "Tender ID")
    ),
    responses(
        (status = 200, description = "Bids for the tender, newest first", body = Vec<Bid>),
        (status = 403, description = "Role not allowed to review bids")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_bids(
    State(server): State<ProcureServer>,
    Path(tender_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Bid>>>, ApiError> {
    let bids = server
        .bids
        .list()
        .await?
        .into_iter()
        .filter(|bid| bid.tender_id == tender_id)
        .collect::<Vec<_>>();
    Ok(Json(api_success(bids)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_amount_passes_validation() {
        let request = SubmitBidRequest {
            amount: 1_000_00,
            notes: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn defaulted_amount_fails_validation() {
        let request = SubmitBidRequest {
            amount: 0,
            notes: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn oversized_notes_fail_validation() {
        let request = SubmitBidRequest {
            amount: 1_000_00,
            notes: Some("x".repeat(2001)),
        };
        assert!(request.validate().is_err());
    }
}
