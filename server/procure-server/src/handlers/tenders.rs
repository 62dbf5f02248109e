use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use database_layer::{CreateTender, Tender, TenderStatus};

use crate::auth::Principal;
use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::ProcureServer;
use crate::validation::RequestValidation;
use crate::{validate_field, validate_length, validate_required};

impl RequestValidation for CreateTender {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.title, "Title is required");
        validate_length!(
            self.title,
            3,
            200,
            "Title must be between 3 and 200 characters"
        );
        validate_required!(self.description, "Description is required");
        validate_required!(self.category, "Category is required");
        validate_field!(self.budget, self.budget > 0, "Budget must be positive");
        validate_field!(
            self.deadline,
            self.deadline > Utc::now(),
            "Deadline must be in the future"
        );
        Ok(())
    }
}

/// List all tenders
#[utoipa::path(
    get,
    path = "/api/v1/tenders",
    tag = "tenders",
    responses(
        (status = 200, description = "Tenders, newest first", body = Vec<Tender>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tenders(
    State(server): State<ProcureServer>,
) -> Result<Json<ApiResponse<Vec<Tender>>>, ApiError> {
    let tenders = server.tenders.list().await?;
    Ok(Json(api_success(tenders)))
}

/// Fetch one tender
#[utoipa::path(
    get,
    path = "/api/v1/tenders/{id}",
    tag = "tenders",
    params(
        ("id" = Uuid, Path, description = "Tender ID")
    ),
    responses(
        (status = 200, description = "Tender found", body = Tender),
        (status = 404, description = "No tender with this ID"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_tender(
    State(server): State<ProcureServer>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Tender>>, ApiError> {
    let tender = server
        .tenders
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("record not found"))?;
    Ok(Json(api_success(tender)))
}

/// Publish a tender
#[utoipa::path(
    post,
    path = "/api/v1/tenders",
    tag = "tenders",
    request_body = CreateTender,
    responses(
        (status = 201, description = "Tender published", body = Tender),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Role not allowed to publish tenders")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_tender(
    State(server): State<ProcureServer>,
    principal: Principal,
    Json(request): Json<CreateTender>,
) -> Result<(StatusCode, Json<ApiResponse<Tender>>), ApiError> {
    request.validate()?;

    let tender = Tender {
        id: Uuid::new_v4(),
        title: request.title,
        description: request.description,
        category: request.category,
        budget: request.budget,
        deadline: request.deadline,
        status: TenderStatus::Open,
        created_by: principal.id,
        created_at: Utc::now(),
    };
    let created = server.tenders.create(&tender).await?;

    tracing::info!(tender_id = %created.id, created_by = %principal.id, "tender published");
    Ok((StatusCode::CREATED, Json(api_success(created))))
}

/// Award a tender
///
/// Gated on the `tender:award` permission; no assignment path exists for
/// permissions yet, so every caller is denied upstream of this handler.
#[utoipa::path(
    post,
    path = "/api/v1/tenders/{id}/award",
    tag = "tenders",
    params(
        ("id" = Uuid, Path, description = "Tender ID")
    ),
    responses(
        (status = 200, description = "Tender awarded", body = Tender),
        (status = 403, description = "Caller lacks the awarding permission"),
        (status = 404, description = "No tender with this ID")
    ),
    security(("bearer_auth" = []))
)]
pub async fn award_tender(
    State(server): State<ProcureServer>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Tender>>, ApiError> {
    let awarded = server.tenders.set_status(id, TenderStatus::Awarded).await?;

    tracing::info!(tender_id = %id, awarded_by = %principal.id, "tender awarded");
    Ok(Json(api_success(awarded)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft() -> CreateTender {
        CreateTender {
            title: "Road resurfacing, district 4".to_string(),
            description: "Full resurfacing of 12km of arterial road".to_string(),
            category: "infrastructure".to_string(),
            budget: 250_000_00,
            deadline: Utc::now() + Duration::days(30),
        }
    }

    #[test]
    fn complete_draft_passes_validation() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn past_deadline_fails_validation() {
        let mut request = draft();
        request.deadline = Utc::now() - Duration::days(1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn zero_budget_fails_validation() {
        let mut request = draft();
        request.budget = 0;
        assert!(request.validate().is_err());
    }
}
