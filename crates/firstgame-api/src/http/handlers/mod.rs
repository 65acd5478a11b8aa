//! HTTP request handlers for the REST API.

pub mod admin;
pub mod character;
pub mod loadout;

use firstgame_types::character::CharacterId;
use firstgame_types::error::CharacterError;

use crate::http::error::AppError;

/// Path ids that are not UUIDs cannot name a character.
pub(crate) fn parse_character_id(raw: &str) -> Result<CharacterId, AppError> {
    raw.parse()
        .map_err(|_| AppError::Character(CharacterError::NotFound))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Json;
    use axum::extract::State;
    use tempfile::TempDir;

    use firstgame_types::auth::{CallerIdentity, Credential};
    use firstgame_types::character::{Character, CreateCharacterRequest};
    use firstgame_types::config::GameConfig;

    use crate::http::extractors::auth::Caller;
    use crate::http::extractors::json::ValidatedJson;
    use crate::state::AppState;

    /// Fully wired state over a throwaway data directory.
    pub async fn test_state() -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        let state = AppState::init_with(tmp.path().to_path_buf(), GameConfig::default())
            .await
            .unwrap();
        (tmp, state)
    }

    /// Register through the public handler and log in as the new character.
    pub async fn register_and_login(state: &AppState, name: &str, email: &str) -> (Character, Caller) {
        let Json(resp) = super::character::register(
            State(state.clone()),
            ValidatedJson(CreateCharacterRequest::new(name, email, "secret-pw")),
        )
        .await
        .unwrap();
        let character = resp.data.unwrap();
        (character, login(state, email).await)
    }

    pub async fn login(state: &AppState, email: &str) -> Caller {
        let token = state
            .authority
            .issue_token(&Credential {
                email: email.to_string(),
                password: "secret-pw".to_string(),
            })
            .await
            .unwrap();
        let identity: CallerIdentity = state.authority.verify_token(&token).unwrap();
        Caller(identity)
    }
}
