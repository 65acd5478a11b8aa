//! Character account handlers: registration, login and profile CRUD.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, Query, State};

use firstgame_types::auth::{Credential, IssuedToken};
use firstgame_types::character::{
    Character, CreateCharacterRequest, ReplaceCharacterRequest, UpdateCharacterRequest,
};
use firstgame_types::permission::Permission;

use super::parse_character_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Caller;
use crate::http::extractors::json::ValidatedJson;
use crate::http::extractors::query::{CharacterListQuery, CountQuery};
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn character_response(character: Character, start: Instant) -> ApiResponse<Character> {
    let href = format!("/characters/{}", character.id);
    let loadout = format!("/updatecharacter/{}", character.id);
    ApiResponse::timed(character, start)
        .with_link("self", &href)
        .with_link("loadout", &loadout)
}

/// POST /characters - Public registration with the standard permission set.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateCharacterRequest>,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    let character = state.registrar.register(body).await?;
    Ok(Json(character_response(character, start)))
}

/// POST /characters/login - Exchange a credential for a session token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<Credential>,
) -> Result<Json<ApiResponse<IssuedToken>>, AppError> {
    let start = Instant::now();
    let token = state.authority.issue_token(&body).await?;
    Ok(Json(ApiResponse::timed(IssuedToken { token }, start)))
}

/// GET /characters/me - The caller's own profile.
pub async fn me(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    state
        .authority
        .require_permission(&caller, Permission::ViewOwnUser)?;

    let character = state.registrar.get(&caller.id).await?;
    Ok(Json(character_response(character, start)))
}

/// GET /characters/count - Public character count.
pub async fn count(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let count = state.registrar.count(Some(query.into_filter())).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({ "count": count }),
        start,
    )))
}

/// GET /characters - List characters.
pub async fn list(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Query(query): Query<CharacterListQuery>,
) -> Result<Json<ApiResponse<Vec<Character>>>, AppError> {
    let start = Instant::now();
    state
        .authority
        .require_permission(&caller, Permission::ViewAnyUser)?;

    let characters = state.registrar.list(Some(query.into_filter())).await?;
    Ok(Json(
        ApiResponse::timed(characters, start).with_link("self", "/characters"),
    ))
}

/// GET /characters/{id}
pub async fn get(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    let id = parse_character_id(&id)?;
    state.authority.require_owner_or_any(
        &caller,
        &id,
        Permission::ViewOwnUser,
        Permission::ViewAnyUser,
    )?;

    let character = state.registrar.get(&id).await?;
    Ok(Json(character_response(character, start)))
}

/// PATCH /characters/{id} - Partial update.
pub async fn update(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateCharacterRequest>,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    let id = parse_character_id(&id)?;
    state.authority.require_owner_or_any(
        &caller,
        &id,
        Permission::UpdateOwnUser,
        Permission::UpdateAnyUser,
    )?;

    let character = state.registrar.update(&id, body).await?;
    Ok(Json(character_response(character, start)))
}

/// PUT /characters/{id} - Replace every writable field.
pub async fn replace(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<ReplaceCharacterRequest>,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    let id = parse_character_id(&id)?;
    state.authority.require_owner_or_any(
        &caller,
        &id,
        Permission::UpdateOwnUser,
        Permission::UpdateAnyUser,
    )?;

    let character = state.registrar.replace(&id, body).await?;
    Ok(Json(character_response(character, start)))
}

/// DELETE /characters/{id} - Remove the character and its equipment.
pub async fn delete(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = parse_character_id(&id)?;
    state.authority.require_owner_or_any(
        &caller,
        &id,
        Permission::DeleteOwnUser,
        Permission::DeleteAnyUser,
    )?;

    state.ledger.delete_character_cascade(&id).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({ "deleted": true, "id": id }),
        start,
    )))
}
