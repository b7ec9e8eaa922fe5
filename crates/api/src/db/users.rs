//! User repository for database operations.
//!
//! All authentication-driven mutation of the `users` table goes through
//! [`UserRepository::upsert`], a single atomic statement keyed on
//! `telegram_id`. Queries are runtime-checked (`sqlx::query_as`) so the
//! workspace builds without a live database.

use sqlx::PgPool;

use kiosk_core::{Principal, TelegramId};

use super::RepositoryError;
use crate::models::user::User;

/// Row shape returned by the upsert, carrying the created-vs-updated flag
/// alongside the user columns.
#[derive(sqlx::FromRow)]
struct UpsertedUser {
    #[sqlx(flatten)]
    user: User,
    created: bool,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert-or-update the user row for a verified principal.
    ///
    /// Implemented as one atomic `INSERT ... ON CONFLICT DO UPDATE` rather
    /// than read-then-write, so two concurrent first-contact logins for the
    /// same `telegram_id` cannot create two rows. On insert, display fields
    /// come from the principal and `is_admin` from `is_admin_on_create`.
    /// On update, only the display fields and `updated_at` are overwritten;
    /// `is_admin` and `is_active` are left untouched.
    ///
    /// Returns the stored user and whether this call created the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert(
        &self,
        principal: &Principal,
        is_admin_on_create: bool,
    ) -> Result<(User, bool), RepositoryError> {
        let row: UpsertedUser = sqlx::query_as(
            r"
            INSERT INTO users (telegram_id, first_name, last_name, username, photo_url, is_admin)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (telegram_id) DO UPDATE
            SET first_name = EXCLUDED.first_name,
                last_name  = EXCLUDED.last_name,
                username   = EXCLUDED.username,
                photo_url  = EXCLUDED.photo_url,
                updated_at = NOW()
            RETURNING id, telegram_id, first_name, last_name, username, photo_url,
                      is_admin, is_active, created_at, updated_at,
                      (xmax = 0) AS created
            ",
        )
        .bind(principal.id)
        .bind(&principal.first_name)
        .bind(&principal.last_name)
        .bind(&principal.username)
        .bind(&principal.photo_url)
        .bind(is_admin_on_create)
        .fetch_one(self.pool)
        .await?;

        Ok((row.user, row.created))
    }

    /// Get a user by their Telegram id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_telegram_id(
        &self,
        telegram_id: TelegramId,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as(
            r"
            SELECT id, telegram_id, first_name, last_name, username, photo_url,
                   is_admin, is_active, created_at, updated_at
            FROM users
            WHERE telegram_id = $1
            ",
        )
        .bind(telegram_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Set the admin flag for an existing user.
    ///
    /// Authentication never calls this; it exists for the admin management
    /// surface. The flag it sets (or clears) survives later logins because
    /// the upsert does not touch `is_admin` on update.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user with that Telegram id
    /// exists (they must open the app first).
    /// Returns `RepositoryError::Database` for other failures.
    pub async fn set_admin(
        &self,
        telegram_id: TelegramId,
        is_admin: bool,
    ) -> Result<User, RepositoryError> {
        let user: Option<User> = sqlx::query_as(
            r"
            UPDATE users
            SET is_admin = $2, updated_at = NOW()
            WHERE telegram_id = $1
            RETURNING id, telegram_id, first_name, last_name, username, photo_url,
                      is_admin, is_active, created_at, updated_at
            ",
        )
        .bind(telegram_id)
        .bind(is_admin)
        .fetch_optional(self.pool)
        .await?;

        user.ok_or(RepositoryError::NotFound)
    }

    /// List all admins, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_admins(&self) -> Result<Vec<User>, RepositoryError> {
        let admins = sqlx::query_as(
            r"
            SELECT id, telegram_id, first_name, last_name, username, photo_url,
                   is_admin, is_active, created_at, updated_at
            FROM users
            WHERE is_admin = TRUE
            ORDER BY created_at DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(admins)
    }
}
