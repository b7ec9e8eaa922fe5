//! Development-only authentication bypass.
//!
//! Lets local frontend development talk to the API without a real Telegram
//! launch context: a trusted `x-dev-user-id` header stands in for a signed
//! credential. The layer is only registered when `KIOSK_DEV_AUTH` is set,
//! and the handler re-checks the flag, so the path is unreachable in
//! production.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use kiosk_core::{Principal, TelegramId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Trusted local header carrying a raw Telegram id.
pub const DEV_USER_HEADER: &str = "x-dev-user-id";

/// Development bypass middleware.
///
/// Runs before the authentication gate. On a parseable header it resolves
/// the identity through the same keyed upsert the gate uses (the allowlist
/// still decides the admin flag at creation) and attaches [`CurrentUser`],
/// so the gate passes the request through at its already-authenticated
/// check. An absent or unparseable header falls through to the normal
/// chain.
pub async fn dev_bypass(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config().dev_auth_enabled {
        return next.run(request).await;
    }

    let dev_user_id = request
        .headers()
        .get(DEV_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok());

    let Some(id) = dev_user_id else {
        return next.run(request).await;
    };

    let id = TelegramId::new(id);
    let mut principal = Principal::from_id(id);
    principal.first_name = format!("Dev User {id}");

    let is_admin_on_create = state.auth().is_allowlisted_admin(id);
    let repository = UserRepository::new(state.pool());
    match repository.upsert(&principal, is_admin_on_create).await {
        Ok((user, _created)) => {
            tracing::debug!(telegram_id = %id, "dev bypass authenticated");
            request.extensions_mut().insert(CurrentUser { principal, user });
            next.run(request).await
        }
        Err(err) => AppError::Database(err).into_response(),
    }
}
