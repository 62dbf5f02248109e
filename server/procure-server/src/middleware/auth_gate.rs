//! The authentication gate.
//!
//! Verifies the bearer token, re-reads the subject from the user store
//! (every request, no caching, so deactivation bites immediately), and
//! attaches the [`Principal`] for the guards and handlers downstream.

use super::AuditPrincipal;
use crate::auth::Principal;
use crate::error::ApiError;
use crate::server::ProcureServer;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

pub async fn require_authentication(
    State(server): State<ProcureServer>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        ApiError::authentication("You are not logged in! Please log in to get access.")
    })?;

    let subject = server.tokens.verify(token)?;

    let user = server
        .users
        .find_by_id(subject)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| {
            ApiError::authentication("The user belonging to this token no longer exists.")
        })?;

    if !user.is_active {
        return Err(ApiError::authentication(
            "Your account has been deactivated. Please contact an administrator.",
        ));
    }

    let principal = Principal::from(&user);
    let principal_id = principal.id;
    tracing::Span::current().record("principal_id", tracing::field::display(principal_id));

    request.extensions_mut().insert(principal);
    let mut response = next.run(request).await;

    // The audit middleware sits outside this gate and reads the resolved
    // identity off the response.
    response.extensions_mut().insert(AuditPrincipal(principal_id));
    Ok(response)
}

/// `Authorization: Bearer <token>`, or nothing. A header carrying another
/// scheme or an empty token counts as absent.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_authorization(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn extracts_the_bearer_token() {
        let headers = headers_with_authorization("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn other_schemes_are_ignored() {
        let headers = headers_with_authorization("Basic dXNlcjpwdw==");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn empty_bearer_tokens_are_ignored() {
        let headers = headers_with_authorization("Bearer ");
        assert_eq!(bearer_token(&headers), None);
    }
}
