//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                            - Liveness check (exempt)
//! GET    /health/ready                      - Readiness check, pings the DB (exempt)
//!
//! # Bot
//! POST   /api/bot/webhook                   - Telegram webhook receiver (exempt)
//!
//! # Users (authenticated)
//! GET    /api/users/me                      - Current caller profile
//!
//! # Admin management (admin flag required)
//! GET    /api/users/admins                  - List admins
//! POST   /api/users/admins                  - Grant/revoke by Telegram id
//! DELETE /api/users/admins/{telegram_id}    - Revoke admin
//! ```

pub mod users;
pub mod webhook;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_gate, dev_bypass, request_id_middleware};
use crate::state::AppState;

/// Assemble the application router with the full middleware stack.
///
/// The authentication gate is layered over every route; exemptions are
/// decided inside the gate so the precedence order lives in one place.
/// The dev bypass layer only exists when the configuration asks for it.
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/bot/webhook", post(webhook::receive))
        .route("/api/users/me", get(users::me))
        .route(
            "/api/users/admins",
            get(users::admin_list).post(users::admin_add),
        )
        .route("/api/users/admins/{telegram_id}", delete(users::admin_remove))
        .layer(from_fn_with_state(state.clone(), auth_gate));

    if state.config().dev_auth_enabled {
        tracing::warn!("development auth bypass is ENABLED; do not run this in production");
        app = app.layer(from_fn_with_state(state.clone(), dev_bypass));
    }

    app.layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe; verifies the database is reachable.
async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(err) => {
            tracing::error!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
