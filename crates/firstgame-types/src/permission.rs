//! Flat capability strings and the sets a character carries.
//!
//! Permissions are checked by membership only. No permission implies another,
//! and there are no roles.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single named privilege. Serialized as its exact variant name
/// (e.g. `"ViewOwnUser"`), which is also what tokens carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    ViewOwnUser,
    CreateUser,
    UpdateOwnUser,
    DeleteOwnUser,
    UpdateAnyUser,
    ViewAnyUser,
    DeleteAnyUser,
}

impl Permission {
    pub const ALL: [Permission; 7] = [
        Permission::ViewOwnUser,
        Permission::CreateUser,
        Permission::UpdateOwnUser,
        Permission::DeleteOwnUser,
        Permission::UpdateAnyUser,
        Permission::ViewAnyUser,
        Permission::DeleteAnyUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewOwnUser => "ViewOwnUser",
            Permission::CreateUser => "CreateUser",
            Permission::UpdateOwnUser => "UpdateOwnUser",
            Permission::DeleteOwnUser => "DeleteOwnUser",
            Permission::UpdateAnyUser => "UpdateAnyUser",
            Permission::ViewAnyUser => "ViewAnyUser",
            Permission::DeleteAnyUser => "DeleteAnyUser",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown permission: '{s}'"))
    }
}

/// The capability set granted to a character.
///
/// Serialized as a plain JSON array of permission names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<Permission>);

impl PermissionSet {
    /// Set assigned by public self-registration.
    pub fn standard() -> Self {
        [
            Permission::ViewOwnUser,
            Permission::CreateUser,
            Permission::UpdateOwnUser,
            Permission::DeleteOwnUser,
        ]
        .into_iter()
        .collect()
    }

    /// Set assigned to accounts created through the admin bootstrap.
    /// A strict superset of [`PermissionSet::standard`].
    pub fn elevated() -> Self {
        let mut set = Self::standard();
        set.0.extend([
            Permission::UpdateAnyUser,
            Permission::ViewAnyUser,
            Permission::DeleteAnyUser,
        ]);
        set
    }

    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
