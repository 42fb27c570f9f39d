use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::logging;

/// Authenticated actor for the current request, resolved from the bearer
/// token and passed explicitly to handlers via request extensions.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub id: i64,
    /// The credential presented on this request; logout revokes exactly this
    pub token_id: i64,
}

impl From<auth::AuthenticatedCredential> for AuthUser {
    fn from(cred: auth::AuthenticatedCredential) -> Self {
        Self { id: cred.user_id, token_id: cred.token_id }
    }
}

/// Authentication gate for protected routes. Rejects with 401 before the
/// handler ever runs.
pub async fn require_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Unauthenticated."))?;

    let pool = DatabaseManager::pool().await?;
    let credential = auth::authenticate(&pool, &token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Unauthenticated."))?;

    request.extensions_mut().insert(AuthUser::from(credential));
    Ok(next.run(request).await)
}

/// Best-effort actor resolution for routes that do not require auth. The
/// todo endpoints accept anonymous requests; when a valid bearer token is
/// present anyway, the actor is attached so the audit trail can name them.
pub async fn optional_auth(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    if let Some(token) = extract_bearer_token(&headers) {
        match resolve(&token).await {
            Ok(Some(credential)) => {
                request.extensions_mut().insert(AuthUser::from(credential));
            }
            Ok(None) => {}
            Err(e) => {
                // An unreachable store must not block anonymous endpoints
                logging::error("Failed to resolve bearer token: ", &e.to_string());
            }
        }
    }

    next.run(request).await
}

async fn resolve(
    token: &str,
) -> Result<Option<auth::AuthenticatedCredential>, crate::database::manager::StoreError> {
    let pool = DatabaseManager::pool().await?;
    auth::authenticate(&pool, token).await
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))?;

    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();

    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
