//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use kiosk_core::{Principal, TelegramId, UserId};

/// A stored user (domain type).
///
/// Created by the authentication gate on first contact with a Telegram
/// identity; display fields mirror the most recent verified credential.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// The Telegram identity this row belongs to. Unique.
    pub telegram_id: TelegramId,
    /// First name as of the latest authentication.
    pub first_name: String,
    /// Last name, empty if unset.
    pub last_name: String,
    /// Username, empty if unset.
    pub username: String,
    /// Profile photo URL, empty if unset.
    pub photo_url: String,
    /// Admin flag; assigned from the allowlist at creation, toggled only by
    /// the admin management surface afterwards.
    pub is_admin: bool,
    /// Soft-delete flag; authentication never flips this.
    pub is_active: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Human-readable name: "first last", falling back to the Telegram id.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut name = self.first_name.clone();
        if !self.last_name.is_empty() {
            if !name.is_empty() {
                name.push(' ');
            }
            name.push_str(&self.last_name);
        }
        if name.is_empty() {
            self.telegram_id.to_string()
        } else {
            name
        }
    }
}

/// API representation of a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub telegram_id: TelegramId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub photo_url: String,
    pub is_admin: bool,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            telegram_id: user.telegram_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            photo_url: user.photo_url.clone(),
            is_admin: user.is_admin,
            display_name: user.display_name(),
            created_at: user.created_at,
        }
    }
}

/// The authenticated caller, attached to request extensions by the gate
/// (or the development bypass) and read by downstream handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Identity extracted from the verified credential.
    pub principal: Principal,
    /// The stored user row backing that identity.
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_names(first: &str, last: &str) -> User {
        User {
            id: UserId::new(1),
            telegram_id: TelegramId::new(99),
            first_name: first.to_string(),
            last_name: last.to_string(),
            username: String::new(),
            photo_url: String::new(),
            is_admin: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_joins_first_and_last() {
        assert_eq!(user_with_names("Ada", "Lovelace").display_name(), "Ada Lovelace");
    }

    #[test]
    fn test_display_name_first_only() {
        assert_eq!(user_with_names("Ada", "").display_name(), "Ada");
    }

    #[test]
    fn test_display_name_falls_back_to_telegram_id() {
        assert_eq!(user_with_names("", "").display_name(), "99");
    }
}
