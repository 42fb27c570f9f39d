//! Todo endpoints. Every operation follows the same shape: validate,
//! perform the store operation, record the audit trail, respond.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::audit::AuditRecorder;
use crate::database::manager::{DatabaseManager, StoreError};
use crate::database::models::Todo;
use crate::database::todos::{NewTodo, TodoChanges, TodoStore};
use crate::error::ApiError;
use crate::logging;
use crate::middleware::AuthUser;
use crate::validation::{self, field_string, Rule};

const CREATE_RULES: &[(&str, &[Rule])] = &[
    ("title", &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(255)]),
    ("description", &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(255)]),
    ("completed", &[Rule::Required, Rule::OneOf(&["0", "1"])]),
];

// Same bounds as creation, but every field is optional
const UPDATE_RULES: &[(&str, &[Rule])] = &[
    ("title", &[Rule::MinLen(3), Rule::MaxLen(255)]),
    ("description", &[Rule::MinLen(3), Rule::MaxLen(255)]),
    ("completed", &[Rule::OneOf(&["0", "1"])]),
];

/// GET /todos - full collection, newest first
pub async fn index(actor: Option<Extension<AuthUser>>) -> Result<Response, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let todos = TodoStore::new(pool.clone()).list_latest().await?;

    logging::info("Accessed Todo List");
    // Best-effort: an audit fault is swallowed by the recorder and the list
    // is returned regardless
    AuditRecorder::new(pool).record(actor_id(&actor), "Accessed Todo List", "GET").await;

    Ok(Json(todos).into_response())
}

/// POST /todos - create one todo
pub async fn store(
    actor: Option<Extension<AuthUser>>,
    Json(payload): Json<Value>,
) -> Result<Response, ApiError> {
    validation::validate(&payload, CREATE_RULES).map_err(validation::into_api_error)?;

    // Presence guaranteed by the Required rules above
    let new = NewTodo {
        title: field_string(&payload, "title").unwrap_or_default(),
        description: field_string(&payload, "description").unwrap_or_default(),
        completed: field_string(&payload, "completed").as_deref() == Some("1"),
    };

    let created = create_todo(new).await;
    match created {
        Ok((pool, todo)) => {
            logging::info("Todo List Created");
            AuditRecorder::new(pool).record(actor_id(&actor), "Todo List Created", "POST").await;

            Ok((
                StatusCode::CREATED,
                Json(json!({ "message": "Todo Created Sucessfully", "data": todo })),
            )
                .into_response())
        }
        Err(e) => {
            // Store fault detail goes to the sinks only; the client sees a
            // generic message and no audit row is written for this path
            logging::error("Failed : ", &e.to_string());

            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Failed To Create Todo" })),
            )
                .into_response())
        }
    }
}

/// GET /todos/:id - single todo
pub async fn show(
    actor: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let audit = AuditRecorder::new(pool.clone());

    match lookup(&pool, &id).await? {
        None => {
            logging::warn("Todo List Not Found");
            audit.record(actor_id(&actor), "Todo List Not Found", "GET").await;

            Ok(not_found_response())
        }
        Some(todo) => {
            logging::info("Todo Retrieved Successfully");
            audit.record(actor_id(&actor), "Todo Retrieved Successfully", "GET").await;

            Ok(Json(json!({ "message": "Todo Retrieved Successfully", "data": todo }))
                .into_response())
        }
    }
}

/// PUT /todos/:id - update in place
pub async fn update(
    actor: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    payload: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    // Every field is optional on update, so a missing body is an empty change
    // set rather than an extractor rejection
    let Json(payload) = payload.unwrap_or_else(|| Json(json!({})));

    let pool = DatabaseManager::pool().await?;
    let audit = AuditRecorder::new(pool.clone());

    let Some(todo) = lookup(&pool, &id).await? else {
        logging::warn("Todo List For Edit Not Found");
        audit.record(actor_id(&actor), "Todo List For Edit Not Found", "PUT").await;

        return Ok(not_found_response());
    };

    validation::validate(&payload, UPDATE_RULES).map_err(validation::into_api_error)?;

    let changes = TodoChanges {
        title: field_string(&payload, "title"),
        description: field_string(&payload, "description"),
        completed: field_string(&payload, "completed").map(|v| v == "1"),
    };

    match TodoStore::new(pool.clone()).update(&todo, changes).await {
        Ok(updated) => {
            logging::info("Todo List Updated");
            audit.record(actor_id(&actor), "Todo List Updated", "PUT").await;

            Ok(Json(json!({ "message": "Todo Updated Sucessfully", "data": updated }))
                .into_response())
        }
        Err(e) => {
            logging::error("Failed : ", &e.to_string());
            audit.record(actor_id(&actor), "Todo List Failed Updated", "PUT").await;

            // A failed update reports 200 with a failure message and no
            // data, unlike the 500 on create. Kept for wire compatibility.
            Ok(Json(json!({ "message": "Todo List Failed Updated" })).into_response())
        }
    }
}

/// DELETE /todos/:id
pub async fn destroy(
    actor: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let audit = AuditRecorder::new(pool.clone());

    let Some(todo) = lookup(&pool, &id).await? else {
        logging::warn("Todo List For Delete Not Found");
        audit.record(actor_id(&actor), "Todo List For Delete Not Found", "DELETE").await;

        return Ok(not_found_response());
    };

    match TodoStore::new(pool.clone()).delete(&todo).await {
        Ok(()) => {
            logging::info("Todo List Deleted");
            audit.record(actor_id(&actor), "Todo List Deleted", "DELETE").await;

            Ok(Json(json!({ "message": "Todo Deleted Sucessfully" })).into_response())
        }
        Err(e) => {
            logging::error("Failed : ", &e.to_string());
            audit.record(actor_id(&actor), "Todo List Failed Deleted", "DELETE").await;

            // Same degraded-200 policy as update
            Ok(Json(json!({ "message": "Todo List Failed Deleted" })).into_response())
        }
    }
}

fn actor_id(actor: &Option<Extension<AuthUser>>) -> Option<i64> {
    actor.as_ref().map(|Extension(user)| user.id)
}

/// Resolve a path segment to a todo. Non-numeric ids fall through to the
/// not-found path rather than erroring.
async fn lookup(pool: &PgPool, id: &str) -> Result<Option<Todo>, StoreError> {
    match id.parse::<i64>() {
        Ok(id) => TodoStore::new(pool.clone()).find_by_id(id).await,
        Err(_) => Ok(None),
    }
}

async fn create_todo(new: NewTodo) -> Result<(PgPool, Todo), StoreError> {
    let pool = DatabaseManager::pool().await?;
    let todo = TodoStore::new(pool.clone()).create(new).await?;
    Ok((pool, todo))
}

fn not_found_response() -> Response {
    ApiError::not_found("Todo Not Found").into_response()
}
