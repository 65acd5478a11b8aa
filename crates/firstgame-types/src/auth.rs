//! Credential and identity types exchanged with the permission authority.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::CharacterId;
use crate::permission::{Permission, PermissionSet};

/// Login payload.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"****")
            .finish()
    }
}

/// The verified identity carried by a session token.
///
/// Permissions come from the token payload, not from a fresh store lookup,
/// so they reflect the set granted at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    pub id: CharacterId,
    pub email: String,
    pub permissions: PermissionSet,
}

impl CallerIdentity {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

/// Response body of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
}
