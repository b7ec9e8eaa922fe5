//! The verified caller identity.

use serde::{Deserialize, Serialize};

use super::id::TelegramId;

/// A verified caller identity, extracted from the `user` field of a signed
/// launch credential after signature verification succeeds.
///
/// Only `id` is mandatory; Telegram omits the other fields for users who
/// have not set them, and sends additional fields (`language_code`,
/// `is_premium`, ...) that are covered by the signature but not interpreted
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The caller's Telegram user id.
    pub id: TelegramId,
    /// First name as shown in Telegram.
    #[serde(default)]
    pub first_name: String,
    /// Last name, empty if unset.
    #[serde(default)]
    pub last_name: String,
    /// Username (without `@`), empty if unset.
    #[serde(default)]
    pub username: String,
    /// Profile photo URL, empty if unset.
    #[serde(default)]
    pub photo_url: String,
}

impl Principal {
    /// Create a principal carrying only an id, with all display fields empty.
    ///
    /// Used by the development bypass, which has no signed payload to draw
    /// display fields from.
    #[must_use]
    pub fn from_id(id: TelegramId) -> Self {
        Self {
            id,
            first_name: String::new(),
            last_name: String::new(),
            username: String::new(),
            photo_url: String::new(),
        }
    }
}
