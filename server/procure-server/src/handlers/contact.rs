use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{api_success, ApiError, ApiResponse};

/// Contact form submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContactRequest {
    /// Sender's name
    #[schema(example = "Dana Osei")]
    #[serde(default)]
    pub name: String,
    /// Address used for the reply
    #[schema(example = "dana@example.com")]
    #[serde(default)]
    pub email: String,
    /// Message body
    #[serde(default)]
    pub message: String,
}

/// Acknowledgement for a received message
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactResponse {
    pub message: String,
}

/// Receive a contact-form message
///
/// Unlike the trait-based validators this collects every failing field so
/// the form can surface all of them at once.
#[utoipa::path(
    post,
    path = "/api/v1/contact",
    tag = "contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message received", body = ContactResponse),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn submit_contact(
    Json(request): Json<ContactRequest>,
) -> Result<Json<ApiResponse<ContactResponse>>, ApiError> {
    let mut failures = Vec::new();
    if request.name.trim().is_empty() {
        failures.push("Name is required");
    }
    if request.email.trim().is_empty() {
        failures.push("Email is required");
    } else if !(request.email.contains('@') && request.email.contains('.')) {
        failures.push("Please provide a valid email");
    }
    if request.message.trim().is_empty() {
        failures.push("Message is required");
    }
    if !failures.is_empty() {
        return Err(ApiError::validation(failures.join(". ")));
    }

    tracing::info!(email = %request.email, "contact message received");
    Ok(Json(api_success(ContactResponse {
        message: "Thank you for contacting us. We will get back to you shortly.".to_string(),
    })))
}
