//! User and admin management route handlers.
//!
//! All handlers here read the identity the authentication gate attached;
//! none of them re-validate credentials.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use kiosk_core::TelegramId;

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::UserResponse;
use crate::state::AppState;

/// GET /api/users/me - the authenticated caller's profile.
pub async fn me(RequireAuth(current): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse::from(&current.user))
}

/// GET /api/users/admins - list all admins.
pub async fn admin_list(
    State(state): State<AppState>,
    RequireAdmin(_current): RequireAdmin,
) -> Result<Json<Vec<UserResponse>>> {
    let admins = UserRepository::new(state.pool()).list_admins().await?;

    Ok(Json(admins.iter().map(UserResponse::from).collect()))
}

/// Request body for granting or revoking admin status.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateRequest {
    pub telegram_id: TelegramId,
    #[serde(default = "default_true")]
    pub is_admin: bool,
}

const fn default_true() -> bool {
    true
}

/// POST /api/users/admins - grant (or revoke) admin status by Telegram id.
///
/// The target must have opened the app at least once; admin status is a
/// flag on an existing row, never a row-creating operation.
pub async fn admin_add(
    State(state): State<AppState>,
    RequireAdmin(_current): RequireAdmin,
    Json(body): Json<AdminUpdateRequest>,
) -> Result<Json<UserResponse>> {
    let user = UserRepository::new(state.pool())
        .set_admin(body.telegram_id, body.is_admin)
        .await
        .map_err(not_found_or_database)?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/admins/{telegram_id} - revoke admin status.
pub async fn admin_remove(
    State(state): State<AppState>,
    RequireAdmin(_current): RequireAdmin,
    Path(telegram_id): Path<i64>,
) -> Result<Json<UserResponse>> {
    let user = UserRepository::new(state.pool())
        .set_admin(TelegramId::new(telegram_id), false)
        .await
        .map_err(not_found_or_database)?;

    Ok(Json(UserResponse::from(&user)))
}

/// Map a missing target row to 404; everything else stays a server error.
fn not_found_or_database(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => {
            AppError::NotFound("User not found. They must open the app first.".to_string())
        }
        other => AppError::Database(other),
    }
}
