//! Token issuance, token verification and permission gates.
//!
//! Two independent gates live here:
//!
//! - [`PermissionAuthority`]: signed session tokens plus capability checks
//!   against the permission set embedded in the token.
//! - [`AdminGate`]: the static bootstrap code for creating elevated accounts.
//!   It never consults a token or a permission set.

use firstgame_types::auth::{CallerIdentity, Credential};
use firstgame_types::character::CharacterId;
use firstgame_types::error::AuthError;
use firstgame_types::permission::Permission;

use crate::repository::character::CharacterRepository;
use crate::service::hash::CredentialHasher;
use crate::service::token::TokenCodec;

/// Issues and verifies session tokens and enforces required permissions.
pub struct PermissionAuthority<C: CharacterRepository, H: CredentialHasher, T: TokenCodec> {
    characters: C,
    hasher: H,
    codec: T,
}

impl<C: CharacterRepository, H: CredentialHasher, T: TokenCodec> PermissionAuthority<C, H, T> {
    pub fn new(characters: C, hasher: H, codec: T) -> Self {
        Self {
            characters,
            hasher,
            codec,
        }
    }

    /// Exchange an email/password pair for a signed token.
    ///
    /// Unknown email and wrong password fail identically so callers cannot
    /// probe which emails are registered.
    pub async fn issue_token(&self, credential: &Credential) -> Result<String, AuthError> {
        let character = self
            .characters
            .get_by_email(&credential.email)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?;

        let Some(character) = character else {
            tracing::debug!(email = %credential.email, "login for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let verified = character
            .password
            .as_deref()
            .is_some_and(|hash| self.hasher.verify_password(&credential.password, hash));
        if !verified {
            tracing::debug!(character_id = %character.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = CallerIdentity {
            id: character.id,
            email: character.email,
            permissions: character.permissions,
        };
        let token = self.codec.issue(&identity)?;
        tracing::info!(character_id = %identity.id, "issued session token");
        Ok(token)
    }

    /// Verify a bearer token and return the identity it carries.
    pub fn verify_token(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.codec.verify(token)
    }

    /// Fail with `MissingPermission` unless the caller's token carries
    /// `permission`. Plain membership: no permission implies another.
    pub fn require_permission(
        &self,
        caller: &CallerIdentity,
        permission: Permission,
    ) -> Result<(), AuthError> {
        if caller.has(permission) {
            Ok(())
        } else {
            tracing::debug!(character_id = %caller.id, %permission, "permission denied");
            Err(AuthError::MissingPermission(permission))
        }
    }

    /// Gate for routes addressing one character: pass with `any`, or with
    /// `own` when the caller is the target. The reported missing permission
    /// is `any` for foreign targets and `own` for the caller's own record.
    pub fn require_owner_or_any(
        &self,
        caller: &CallerIdentity,
        target: &CharacterId,
        own: Permission,
        any: Permission,
    ) -> Result<(), AuthError> {
        if caller.has(any) {
            return Ok(());
        }
        if &caller.id == target {
            self.require_permission(caller, own)
        } else {
            self.require_permission(caller, any)
        }
    }
}

/// The admin bootstrap gate: a fixed out-of-band code compared verbatim with
/// the code supplied on the request.
///
/// An empty configured code disables the gate entirely (every attempt is
/// rejected).
#[derive(Clone)]
pub struct AdminGate {
    code: String,
}

impl AdminGate {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn check(&self, supplied: Option<&str>) -> Result<(), AuthError> {
        match supplied {
            Some(code) if !self.code.is_empty() && code == self.code => Ok(()),
            _ => {
                tracing::warn!("admin bootstrap rejected: wrong or missing admin code");
                Err(AuthError::WrongAdminCode)
            }
        }
    }
}
