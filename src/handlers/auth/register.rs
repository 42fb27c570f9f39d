// POST /register - create a user and hand back their first access token

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

use crate::auth;
use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::users::{NewUser, UserStore};
use crate::error::ApiError;
use crate::validation::{self, field_string, Rule};

const REGISTER_RULES: &[(&str, &[Rule])] = &[
    ("name", &[Rule::Required]),
    ("email", &[Rule::Required, Rule::Email]),
    ("password", &[Rule::Required, Rule::Confirmed]),
    ("password_confirmation", &[Rule::Required]),
];

/// Register a new account. On success the response carries the user's public
/// projection plus the plaintext token - the only time it is ever shown.
pub async fn register(Json(payload): Json<Value>) -> Result<Response, ApiError> {
    validation::validate(&payload, REGISTER_RULES).map_err(validation::into_api_error)?;

    let password = field_string(&payload, "password").unwrap_or_default();
    let hashed = bcrypt::hash(&password, config::config().security.bcrypt_cost)
        .map_err(|e| {
            crate::logging::error("Failed to hash password: ", &e.to_string());
            ApiError::internal_server_error("Server Error")
        })?;

    let pool = DatabaseManager::pool().await?;
    let user = UserStore::new(pool.clone())
        .create(NewUser {
            name: field_string(&payload, "name").unwrap_or_default(),
            email: field_string(&payload, "email").unwrap_or_default(),
            password: hashed,
        })
        .await?;

    let token = auth::issue(&pool, user.id).await?;

    Ok((StatusCode::CREATED, Json(json!({ "data": user, "token": token }))).into_response())
}
