//! Bearer token authentication extractor.
//!
//! Extracts the session token from `Authorization: Bearer <token>` and
//! verifies it through the permission authority. Handlers then check the
//! permissions the route needs against the extracted identity.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use firstgame_types::auth::CallerIdentity;
use firstgame_types::error::AuthError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Verified identity of the caller. Extracting this validates the token.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerIdentity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let identity = state.authority.verify_token(token)?;
        Ok(Caller(identity))
    }
}

/// The token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingToken);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("invalid Authorization header encoding".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(AuthError::MissingToken)
            } else {
                Ok(token)
            }
        }
        _ => Err(AuthError::InvalidToken(
            "expected 'Authorization: Bearer <token>'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let h = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&h).unwrap(), "abc.def.ghi");

        let h = headers("bearer   abc.def.ghi ");
        assert_eq!(bearer_token(&h).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(AuthError::MissingToken)
        ));
    }

    #[test]
    fn test_wrong_scheme() {
        assert!(matches!(
            bearer_token(&headers("Basic dXNlcjpwdw==")),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            bearer_token(&headers("abc.def.ghi")),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
