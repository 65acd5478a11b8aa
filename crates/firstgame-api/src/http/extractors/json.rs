//! JSON body extractor with a schema step before dispatch.
//!
//! Malformed JSON, unknown fields and payloads that fail their own
//! `validate()` are all rejected as `400 VALIDATION_ERROR` in the envelope
//! format, before any handler logic runs.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use firstgame_types::auth::Credential;
use firstgame_types::character::{
    CreateCharacterRequest, ReplaceCharacterRequest, UpdateCharacterRequest, validate_email,
};
use firstgame_types::equipment::NewEquipment;
use firstgame_types::error::CharacterError;

use crate::http::error::AppError;

/// Payload-level checks run after deserialization.
pub trait Validate {
    fn validate(&self) -> Result<(), CharacterError>;
}

impl Validate for CreateCharacterRequest {
    fn validate(&self) -> Result<(), CharacterError> {
        CreateCharacterRequest::validate(self)
    }
}

impl Validate for UpdateCharacterRequest {
    fn validate(&self) -> Result<(), CharacterError> {
        UpdateCharacterRequest::validate(self)
    }
}

impl Validate for ReplaceCharacterRequest {
    fn validate(&self) -> Result<(), CharacterError> {
        ReplaceCharacterRequest::validate(self)
    }
}

impl Validate for NewEquipment {
    fn validate(&self) -> Result<(), CharacterError> {
        NewEquipment::validate(self)
    }
}

impl Validate for Credential {
    fn validate(&self) -> Result<(), CharacterError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(CharacterError::InvalidInput(
                "password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `Json<T>` that also runs [`Validate`].
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}
