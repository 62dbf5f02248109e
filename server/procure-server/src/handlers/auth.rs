use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use auth_identity::{CreateUser, Role, UserPublic};

use crate::auth::Principal;
use crate::error::{api_success, ApiError, ApiResponse};
use crate::server::ProcureServer;
use crate::validation::RequestValidation;
use crate::{validate_email, validate_length, validate_required};

/// Self-service registration request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "email": "citizen@example.com",
    "password": "SecureP@ssw0rd",
    "full_name": "Dana Osei"
}))]
pub struct RegisterRequest {
    /// Email address, becomes the login identifier
    #[schema(example = "citizen@example.com")]
    #[serde(default)]
    pub email: String,
    /// Password, at least 8 characters
    #[serde(default)]
    pub password: String,
    /// Optional display name
    pub full_name: Option<String>,
}

impl RequestValidation for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.email, "Please provide email and password");
        validate_required!(self.password, "Please provide email and password");
        validate_email!(self.email, "Please provide a valid email");
        validate_length!(
            self.password,
            8,
            128,
            "Password must be between 8 and 128 characters"
        );
        Ok(())
    }
}

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "email": "testuser@gov.com",
    "password": "SecureP@ssw0rd"
}))]
pub struct LoginRequest {
    /// Registered email address
    #[schema(example = "testuser@gov.com")]
    #[serde(default)]
    pub email: String,
    /// Account password
    #[serde(default)]
    pub password: String,
}

impl RequestValidation for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_required!(self.email, "Please provide email and password");
        validate_required!(self.password, "Please provide email and password");
        Ok(())
    }
}

/// Issued session
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Signed bearer token for the `Authorization` header
    pub token: String,
    /// Token lifetime in seconds
    #[schema(example = 43200)]
    pub expires_in: i64,
    /// Public profile of the authenticated account
    pub user: UserPublic,
}

fn issue_session(server: &ProcureServer, user: auth_identity::User) -> Result<SessionResponse, ApiError> {
    let token = server
        .tokens
        .issue(user.id)
        .map_err(|error| ApiError::internal(format!("failed to issue session token: {error}")))?;
    Ok(SessionResponse {
        token,
        expires_in: server.tokens.expires_in_seconds(),
        user: UserPublic::from(user),
    })
}

/// Register a new citizen account
///
/// Accounts created here always start as `CITIZEN`; elevated roles are
/// assigned out of band.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Validation failed or email already in use")
    )
)]
pub async fn register(
    State(server): State<ProcureServer>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), ApiError> {
    request.validate()?;

    let user = server
        .identity
        .register(CreateUser {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            role: Role::Citizen,
            organization_id: None,
        })
        .await?;

    let session = issue_session(&server, user)?;
    Ok((StatusCode::CREATED, Json(api_success(session))))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authentication successful", body = SessionResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 429, description = "Too many attempts from this address")
    )
)]
pub async fn login(
    State(server): State<ProcureServer>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    request.validate()?;

    let user = server
        .identity
        .authenticate(&request.email, &request.password)
        .await?;

    tracing::debug!(user_id = %user.id, role = %user.role, "login succeeded");
    let session = issue_session(&server, user)?;
    Ok(Json(api_success(session)))
}

/// Current account's public profile
///
/// Reads the store again rather than echoing the principal, so the reply
/// reflects any profile change made since the token was issued.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Current profile", body = UserPublic),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(server): State<ProcureServer>,
    principal: Principal,
) -> Result<Json<ApiResponse<UserPublic>>, ApiError> {
    let user = server
        .users
        .find_by_id(principal.id)
        .await?
        .ok_or_else(|| {
            ApiError::authentication("The user belonging to this token no longer exists.")
        })?;

    Ok(Json(api_success(UserPublic::from(user))))
}
