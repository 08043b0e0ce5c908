pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

pub use config::AppConfig;
pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let client_routes = Router::new()
        .route("/sessions/start", post(handlers::sessions::start))
        .route("/sessions/:id/end", post(handlers::sessions::end))
        .route("/data/story", post(handlers::data::save_story))
        .route("/data/needs", post(handlers::data::save_needs))
        .route("/data/affect", post(handlers::data::save_affect))
        .route("/data/conversation", post(handlers::data::save_conversation))
        .route("/data/assignment", post(handlers::data::save_assignment))
        .route("/data/ecosystem", post(handlers::data::save_ecosystem))
        .route("/data/load", get(handlers::load::load))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::client_session_middleware,
        ));

    let practitioner_routes = Router::new()
        .route("/practitioner/clients", get(handlers::practitioner::list_clients))
        .route("/practitioner/client/:id", get(handlers::practitioner::get_client))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::practitioner_gate_middleware,
        ));

    let request_timeout = Duration::from_secs(state.config.security.request_timeout_secs);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login-or-register", post(handlers::auth::login_or_register))
        // Chat proxy (no auth, mirrors the original deployment)
        .route("/api/messages", post(handlers::messages::relay_messages))
        // Gated route groups
        .merge(client_routes)
        .merge(practitioner_routes)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Crossing API",
        "version": version,
        "description": "Backend for the Crossing therapeutic journaling app",
        "endpoints": {
            "auth": "/auth/login-or-register (public)",
            "sessions": "/sessions/start, /sessions/:id/end (client token)",
            "data": "/data/{story,needs,affect,conversation,assignment,ecosystem,load} (client token)",
            "practitioner": "/practitioner/clients, /practitioner/client/:id (practitioner pin)",
            "messages": "/api/messages (public proxy)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string()
            })),
        ),
    }
}
