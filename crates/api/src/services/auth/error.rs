//! Authentication error types.

use thiserror::Error;

/// Errors that can occur while verifying a launch credential.
///
/// Every variant is surfaced to the client as the same generic 401 response;
/// the distinction exists for internal logging only, so a rejected request
/// never tells an attacker which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential header was present on the request.
    #[error("missing credential header")]
    MissingCredential,

    /// The credential was unparsable, the hash field was absent, or the
    /// HMAC did not match.
    #[error("invalid credential signature")]
    InvalidSignature,

    /// `auth_date` was absent, unparsable, or outside the freshness window.
    #[error("credential outside freshness window")]
    StaleCredential,

    /// The `user` field was absent or not valid JSON.
    #[error("malformed principal payload")]
    MalformedPrincipal,
}
