// POST /logout - revoke the credential presented on this request

use axum::{
    extract::Extension,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Only the token used for this request is revoked; other live tokens for
/// the same user keep authenticating.
pub async fn logout(Extension(user): Extension<AuthUser>) -> Result<Response, ApiError> {
    let pool = DatabaseManager::pool().await?;
    auth::revoke(&pool, user.token_id).await?;

    Ok(Json(json!({ "message": "Logout Success" })).into_response())
}
