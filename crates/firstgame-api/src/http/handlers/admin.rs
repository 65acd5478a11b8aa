//! Admin bootstrap and roster handlers.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};

use firstgame_types::character::{Character, CreateCharacterRequest};
use firstgame_types::permission::Permission;

use crate::http::error::AppError;
use crate::http::extractors::auth::Caller;
use crate::http::extractors::json::ValidatedJson;
use crate::http::extractors::query::{AdminQuery, CharacterListQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /admin?admin_code=... - Register an account with the elevated set.
pub async fn register_admin(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    ValidatedJson(body): ValidatedJson<CreateCharacterRequest>,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    let character = state
        .registrar
        .register_admin(query.admin_code.as_deref(), body)
        .await?;
    tracing::info!(character_id = %character.id, "admin account registered");

    let href = format!("/characters/{}", character.id);
    Ok(Json(ApiResponse::timed(character, start).with_link("self", &href)))
}

/// GET /admin/characters - Every character, password-free.
pub async fn list_characters(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<CharacterListQuery>,
) -> Result<Json<ApiResponse<Vec<Character>>>, AppError> {
    let start = Instant::now();
    state
        .authority
        .require_permission(&caller, Permission::ViewAnyUser)?;

    let characters = state.registrar.list(Some(query.into_filter())).await?;
    Ok(Json(ApiResponse::timed(characters, start)))
}
