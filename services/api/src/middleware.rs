//! Bearer token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, state::AppState};

/// Identity of the authenticated caller, resolved from a bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub name: String,
}

/// Resolve the Authorization header into a `CurrentUser` request extension
///
/// Requests without a valid token pass through unauthenticated; handlers
/// decide whether an identity is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(key) = bearer_token(req.headers()) {
        let user = state.token_repository.user_for_key(key).await.map_err(|e| {
            error!("Failed to resolve bearer token: {}", e);
            ApiError::InternalServerError
        })?;

        if let Some(user) = user {
            req.extensions_mut().insert(CurrentUser {
                id: user.id,
                email: user.email,
                name: user.name,
            });
        }
    }

    Ok(next.run(req).await)
}

/// Extract the bearer token from the Authorization header, if present
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}
