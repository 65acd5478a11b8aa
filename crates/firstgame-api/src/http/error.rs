//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use firstgame_types::error::{AuthError, CharacterError};

use crate::http::response::{ApiResponse, new_request_id};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Token and permission failures.
    Auth(AuthError),
    /// Character, equipment and progression failures.
    Character(CharacterError),
    /// Request body or parameter rejected before dispatch.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<CharacterError> for AppError {
    fn from(e: CharacterError) -> Self {
        match e {
            // Keep admin-gate failures in the auth family.
            CharacterError::Auth(auth) => AppError::Auth(auth),
            other => AppError::Character(other),
        }
    }
}

fn auth_parts(e: &AuthError) -> (StatusCode, &'static str, String) {
    match e {
        AuthError::InvalidCredentials => (
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            "Invalid email or password".to_string(),
        ),
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Missing bearer token. Provide one via 'Authorization: Bearer <token>'.".to_string(),
        ),
        AuthError::InvalidToken(_) => (
            StatusCode::UNAUTHORIZED,
            "INVALID_TOKEN",
            "Invalid token".to_string(),
        ),
        AuthError::TokenExpired => (
            StatusCode::UNAUTHORIZED,
            "TOKEN_EXPIRED",
            "Token expired".to_string(),
        ),
        AuthError::MissingPermission(permission) => (
            StatusCode::FORBIDDEN,
            "MISSING_PERMISSION",
            format!("Missing permission '{permission}'"),
        ),
        AuthError::WrongAdminCode => (
            StatusCode::FORBIDDEN,
            "WRONG_ADMIN_CODE",
            "Wrong admin code".to_string(),
        ),
        AuthError::Signing(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "Internal error".to_string(),
        ),
        AuthError::StorageError(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "STORAGE_ERROR",
            "Storage error".to_string(),
        ),
    }
}

impl AppError {
    /// Status, machine-readable code and client-facing message.
    pub fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Auth(e) => auth_parts(e),
            AppError::Character(CharacterError::Auth(e)) => auth_parts(e),
            AppError::Character(CharacterError::NotFound) => (
                StatusCode::NOT_FOUND,
                "CHARACTER_NOT_FOUND",
                "Character not found".to_string(),
            ),
            AppError::Character(CharacterError::EmailTaken(email)) => (
                StatusCode::BAD_REQUEST,
                "EMAIL_TAKEN",
                format!("Email '{email}' already exists"),
            ),
            AppError::Character(CharacterError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Character(CharacterError::Credential(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal error".to_string(),
            ),
            AppError::Character(CharacterError::StorageError(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                "Storage error".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal error".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let request_id = new_request_id();

        if status.is_server_error() {
            // Details stay in the log; clients only see the code.
            tracing::error!(%request_id, error = ?self, "request failed");
        } else {
            tracing::debug!(%request_id, code, "request rejected");
        }

        (status, Json(ApiResponse::error(code, &message, request_id))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstgame_types::permission::Permission;

    fn status_of(err: impl Into<AppError>) -> (StatusCode, &'static str) {
        let err = err.into();
        let (_, code, _) = err.parts();
        (err.into_response().status(), code)
    }

    #[test]
    fn test_unauthorized_family() {
        assert_eq!(
            status_of(AuthError::InvalidCredentials),
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        );
        assert_eq!(
            status_of(AuthError::MissingToken),
            (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
        );
        assert_eq!(
            status_of(AuthError::InvalidToken("bad".to_string())),
            (StatusCode::UNAUTHORIZED, "INVALID_TOKEN")
        );
        assert_eq!(
            status_of(AuthError::TokenExpired),
            (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED")
        );
    }

    #[test]
    fn test_forbidden_family() {
        assert_eq!(
            status_of(AuthError::MissingPermission(Permission::ViewAnyUser)),
            (StatusCode::FORBIDDEN, "MISSING_PERMISSION")
        );
        // Admin gate failures surface through the registrar.
        assert_eq!(
            status_of(CharacterError::Auth(AuthError::WrongAdminCode)),
            (StatusCode::FORBIDDEN, "WRONG_ADMIN_CODE")
        );
    }

    #[test]
    fn test_bad_request_and_not_found() {
        assert_eq!(
            status_of(CharacterError::EmailTaken("a@b.c".to_string())),
            (StatusCode::BAD_REQUEST, "EMAIL_TAKEN")
        );
        assert_eq!(
            status_of(CharacterError::InvalidInput("nope".to_string())),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            status_of(AppError::Validation("bad json".to_string())),
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        );
        assert_eq!(
            status_of(CharacterError::NotFound),
            (StatusCode::NOT_FOUND, "CHARACTER_NOT_FOUND")
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::from(CharacterError::StorageError("disk on fire".to_string()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "STORAGE_ERROR");
        assert!(!message.contains("disk on fire"));
    }
}
