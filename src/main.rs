use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

mod audit;
mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod logging;
mod middleware;
mod validation;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Todo API in {:?} mode", config.environment);

    // A missing database only degrades /health at this point; handlers report
    // store faults per-request
    if let Err(e) = crate::database::manager::DatabaseManager::migrate().await {
        tracing::warn!("Skipping migrations: {}", e);
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("TODO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Todo API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    let config = crate::config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(todo_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
    }
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::auth;

    Router::new()
        .route("/register", post(auth::register))
        // Logout needs a live credential before the handler runs
        .route(
            "/logout",
            post(auth::logout).route_layer(axum::middleware::from_fn(middleware::require_auth)),
        )
}

fn todo_routes() -> Router {
    use handlers::todos;

    Router::new()
        // Collection operations
        .route("/todos", get(todos::index).post(todos::store))
        // Record operations
        .route(
            "/todos/:id",
            get(todos::show).put(todos::update).delete(todos::destroy),
        )
        // These endpoints accept anonymous requests; a valid bearer token
        // still names the actor for the audit trail
        .layer(axum::middleware::from_fn(middleware::optional_auth))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "name": "Todo API (Rust)",
        "version": version,
        "description": "Authenticated todo CRUD API with an audit trail, built with Rust (Axum)",
        "endpoints": {
            "home": "/ (public)",
            "register": "POST /register (public)",
            "logout": "POST /logout (bearer token)",
            "todos": "GET|POST /todos, GET|PUT|DELETE /todos/:id (public)",
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
