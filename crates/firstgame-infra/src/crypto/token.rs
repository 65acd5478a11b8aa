//! HS256 session tokens.
//!
//! Implements the `TokenCodec` trait from `firstgame-core` with
//! `jsonwebtoken`. The claims bind the character id, email and permission
//! set at login time; expiry is checked with zero leeway.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use firstgame_core::service::token::TokenCodec;
use firstgame_types::auth::CallerIdentity;
use firstgame_types::character::CharacterId;
use firstgame_types::error::AuthError;
use firstgame_types::permission::PermissionSet;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: CharacterId,
    email: String,
    permissions: PermissionSet,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtTokenCodec {
    /// Codec signing with `secret`; tokens expire `ttl_secs` after issue.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);
        validation
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, identity: &CallerIdentity) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: identity.id,
            email: identity.email.clone(),
            permissions: identity.permissions.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(CallerIdentity {
            id: data.claims.id,
            email: data.claims.email,
            permissions: data.claims.permissions,
        })
    }
}
