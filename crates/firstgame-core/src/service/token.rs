//! TokenCodec trait for signed, expiring session tokens.
//!
//! The JWT adapter lives in firstgame-infra.

use firstgame_types::auth::CallerIdentity;
use firstgame_types::error::AuthError;

pub trait TokenCodec: Send + Sync {
    /// Sign a token binding the identity's id, email and permissions.
    fn issue(&self, identity: &CallerIdentity) -> Result<String, AuthError>;

    /// Check signature, shape and expiry, and return the embedded identity.
    ///
    /// Must fail with `InvalidToken` or `TokenExpired`, never anything else,
    /// for tokens the caller controls.
    fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}
