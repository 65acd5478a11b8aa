use thiserror::Error;

use crate::permission::Permission;

/// Errors raised by token issuance, token verification and permission gates.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("missing permission '{0}'")]
    MissingPermission(Permission),

    #[error("wrong admin code")]
    WrongAdminCode,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to character accounts, equipment and progression.
#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("character not found")]
    NotFound,

    #[error("email '{0}' already exists")]
    EmailTaken(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("credential hashing failed: {0}")]
    Credential(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in firstgame-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
