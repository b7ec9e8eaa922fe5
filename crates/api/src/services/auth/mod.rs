//! Launch credential verification.
//!
//! Telegram Mini Apps hand every client a signed "init data" string. The
//! functions here verify that string against the key derived from the bot
//! token, following Telegram's published algorithm:
//!
//! 1. Parse the credential as a query string (first value wins per key).
//! 2. Remove `hash`.
//! 3. Check `auth_date` freshness.
//! 4. Sort the remaining parameters by key and join as `key=value` lines.
//! 5. Compute HMAC-SHA256 over that string and compare against `hash` in
//!    constant time.
//! 6. Parse the `user` parameter into a [`Principal`].
//!
//! Verification is a pure function: no I/O, no clock reads beyond the
//! supplied `now`. Identical inputs always yield identical outcomes.

pub mod error;

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::form_urlencoded;

use kiosk_core::Principal;

pub use error::AuthError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a credential's `auth_date`, in seconds.
pub const CREDENTIAL_MAX_AGE_SECS: i64 = 86_400;

/// Fixed key used to derive the verification secret from the bot token.
const KEY_DERIVATION_CONTEXT: &[u8] = b"WebAppData";

/// Derive the process-wide verification secret from the bot token.
///
/// Computed as `HMAC-SHA256(key = "WebAppData", message = bot_token)`.
/// Called once at startup; the result is carried in application state and
/// never recomputed per request.
#[must_use]
pub fn derive_secret(bot_token: &str) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(KEY_DERIVATION_CONTEXT)
        .expect("HMAC-SHA256 accepts keys of any length");
    mac.update(bot_token.as_bytes());
    mac.finalize().into_bytes().into()
}

/// Verify a raw launch credential and extract the caller identity.
///
/// `now` is the caller-supplied current unix time; staleness is judged only
/// against it. A credential dated in the future is not rejected, only one
/// older than [`CREDENTIAL_MAX_AGE_SECS`].
///
/// # Errors
///
/// - [`AuthError::InvalidSignature`] if `hash` is absent, undecodable, or
///   does not match the recomputed HMAC.
/// - [`AuthError::StaleCredential`] if `auth_date` is absent, unparsable,
///   or outside the freshness window.
/// - [`AuthError::MalformedPrincipal`] if the signature matches but the
///   `user` field is absent or not valid JSON.
pub fn validate_init_data(raw: &str, secret: &[u8], now: i64) -> Result<Principal, AuthError> {
    // Duplicate keys resolve to their first occurrence.
    let mut params: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    let received_hash = params.remove("hash").ok_or(AuthError::InvalidSignature)?;

    let auth_date = params
        .get("auth_date")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or(AuthError::StaleCredential)?;
    if now - auth_date > CREDENTIAL_MAX_AGE_SECS {
        return Err(AuthError::StaleCredential);
    }

    // BTreeMap iterates in ascending byte order of the raw keys, which is
    // exactly the canonical ordering the signature covers.
    let data_check_string = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let expected = hex::decode(&received_hash).map_err(|_| AuthError::InvalidSignature)?;
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|_| AuthError::InvalidSignature)?;
    mac.update(data_check_string.as_bytes());
    // verify_slice is the constant-time comparison; never compare digests
    // with ordinary equality.
    mac.verify_slice(&expected)
        .map_err(|_| AuthError::InvalidSignature)?;

    let user_json = params.get("user").ok_or(AuthError::MalformedPrincipal)?;
    serde_json::from_str(user_json).map_err(|_| AuthError::MalformedPrincipal)
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kiosk_core::TelegramId;

    const BOT_TOKEN: &str = "7213960:AAH8LkPoWbyqPPjrXAmBpTF6jXWE7wZMfIw";
    const NOW: i64 = 1_700_000_000;

    fn secret() -> [u8; 32] {
        derive_secret(BOT_TOKEN)
    }

    fn sign(pairs: &[(&str, &str)]) -> String {
        test_support::sign(pairs, &secret())
    }

    fn fresh_credential() -> String {
        sign(&[
            ("auth_date", &(NOW - 10).to_string()),
            ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
            ("user", r#"{"id":279058397,"first_name":"Vladislav","username":"vdkfrost"}"#),
        ])
    }

    #[test]
    fn test_valid_credential_yields_principal() {
        let principal = validate_init_data(&fresh_credential(), &secret(), NOW).unwrap();

        assert_eq!(principal.id, TelegramId::new(279_058_397));
        assert_eq!(principal.first_name, "Vladislav");
        assert_eq!(principal.username, "vdkfrost");
    }

    #[test]
    fn test_validation_is_deterministic() {
        let raw = fresh_credential();
        let first = validate_init_data(&raw, &secret(), NOW).unwrap();
        let second = validate_init_data(&raw, &secret(), NOW).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stale_credential_rejected_despite_valid_signature() {
        let raw = sign(&[
            ("auth_date", &(NOW - 90_000).to_string()),
            ("user", r#"{"id":1}"#),
        ]);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::StaleCredential)
        );
    }

    #[test]
    fn test_credential_at_window_edge_accepted() {
        let raw = sign(&[
            ("auth_date", &(NOW - CREDENTIAL_MAX_AGE_SECS).to_string()),
            ("user", r#"{"id":1}"#),
        ]);

        assert!(validate_init_data(&raw, &secret(), NOW).is_ok());
    }

    #[test]
    fn test_future_auth_date_not_rejected() {
        // Only staleness is checked; clock skew into the future passes.
        let raw = sign(&[
            ("auth_date", &(NOW + 300).to_string()),
            ("user", r#"{"id":1}"#),
        ]);

        assert!(validate_init_data(&raw, &secret(), NOW).is_ok());
    }

    #[test]
    fn test_missing_auth_date_is_stale() {
        let raw = sign(&[("user", r#"{"id":1}"#)]);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::StaleCredential)
        );
    }

    #[test]
    fn test_unparsable_auth_date_is_stale() {
        let raw = sign(&[("auth_date", "yesterday"), ("user", r#"{"id":1}"#)]);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::StaleCredential)
        );
    }

    #[test]
    fn test_missing_hash_rejected() {
        let raw = format!("auth_date={}&user=%7B%22id%22%3A1%7D", NOW - 10);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_flipped_hash_digit_rejected() {
        let raw = fresh_credential();
        let hash_pos = raw.rfind("hash=").unwrap() + "hash=".len();
        let original = raw.as_bytes()[hash_pos] as char;
        let flipped = if original == '0' { '1' } else { '0' };
        let mut tampered = raw.clone();
        tampered.replace_range(hash_pos..=hash_pos, &flipped.to_string());

        assert_eq!(
            validate_init_data(&tampered, &secret(), NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_parameter_rejected() {
        let raw = fresh_credential().replace("Vladislav", "Mallory");

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_empty_hash_rejected() {
        let raw = format!("auth_date={}&user=%7B%22id%22%3A1%7D&hash=", NOW - 10);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_non_hex_hash_rejected() {
        let raw = format!("auth_date={}&user=%7B%22id%22%3A1%7D&hash=zzzz", NOW - 10);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = derive_secret("000000:not-the-real-token");

        assert_eq!(
            validate_init_data(&fresh_credential(), &other, NOW),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_missing_user_rejected_after_signature_success() {
        let raw = sign(&[("auth_date", &(NOW - 10).to_string())]);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::MalformedPrincipal)
        );
    }

    #[test]
    fn test_non_json_user_rejected() {
        let raw = sign(&[
            ("auth_date", &(NOW - 10).to_string()),
            ("user", "not-json"),
        ]);

        assert_eq!(
            validate_init_data(&raw, &secret(), NOW),
            Err(AuthError::MalformedPrincipal)
        );
    }

    #[test]
    fn test_duplicate_key_first_occurrence_wins() {
        // The signature covers the first occurrence; a trailing duplicate
        // must not change the canonical string.
        let raw = format!("{}&query_id=spoofed", fresh_credential());

        assert!(validate_init_data(&raw, &secret(), NOW).is_ok());
    }

    #[test]
    fn test_derive_secret_is_deterministic_and_token_bound() {
        let derived = derive_secret(BOT_TOKEN);
        assert_eq!(derived, derive_secret(BOT_TOKEN));
        assert_ne!(derived, derive_secret("another:token"));
    }
}
