//! Equipment slot and level-up handlers under `/updatecharacter/{id}`.
//!
//! Mutations need `UpdateOwnUser` on the caller's own character or
//! `UpdateAnyUser`; reading the loadout needs the matching view permissions.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};

use firstgame_types::auth::CallerIdentity;
use firstgame_types::character::{Character, CharacterId};
use firstgame_types::equipment::{Equipment, EquipmentKind, Loadout, NewEquipment};
use firstgame_types::permission::Permission;

use super::parse_character_id;
use crate::http::error::AppError;
use crate::http::extractors::auth::Caller;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn authorize_update(
    state: &AppState,
    caller: &CallerIdentity,
    raw_id: &str,
) -> Result<CharacterId, AppError> {
    let id = parse_character_id(raw_id)?;
    state.authority.require_owner_or_any(
        caller,
        &id,
        Permission::UpdateOwnUser,
        Permission::UpdateAnyUser,
    )?;
    Ok(id)
}

async fn equip_slot(
    state: AppState,
    caller: CallerIdentity,
    raw_id: String,
    kind: EquipmentKind,
    item: NewEquipment,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    let start = Instant::now();
    let id = authorize_update(&state, &caller, &raw_id)?;

    let equipped = state.ledger.equip(&id, kind, item).await?;
    let href = format!("/updatecharacter/{id}");
    Ok(Json(ApiResponse::timed(equipped, start).with_link("loadout", &href)))
}

async fn unequip_slot(
    state: AppState,
    caller: CallerIdentity,
    raw_id: String,
    kind: EquipmentKind,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let id = authorize_update(&state, &caller, &raw_id)?;

    state.ledger.unequip(&id, kind).await?;
    Ok(Json(ApiResponse::timed(
        serde_json::json!({ "unequipped": kind }),
        start,
    )))
}

/// PATCH /updatecharacter/{id}/weapon
pub async fn equip_weapon(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<NewEquipment>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    equip_slot(state, caller, id, EquipmentKind::Weapon, body).await
}

/// PATCH /updatecharacter/{id}/armor
pub async fn equip_armor(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<NewEquipment>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    equip_slot(state, caller, id, EquipmentKind::Armor, body).await
}

/// PATCH /updatecharacter/{id}/skill
pub async fn equip_skill(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<NewEquipment>,
) -> Result<Json<ApiResponse<Equipment>>, AppError> {
    equip_slot(state, caller, id, EquipmentKind::Skill, body).await
}

/// DELETE /updatecharacter/{id}/weapon
pub async fn unequip_weapon(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    unequip_slot(state, caller, id, EquipmentKind::Weapon).await
}

/// DELETE /updatecharacter/{id}/armor
pub async fn unequip_armor(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    unequip_slot(state, caller, id, EquipmentKind::Armor).await
}

/// DELETE /updatecharacter/{id}/skill
pub async fn unequip_skill(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    unequip_slot(state, caller, id, EquipmentKind::Skill).await
}

/// PATCH /updatecharacter/{id}/levelup
pub async fn level_up(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Character>>, AppError> {
    let start = Instant::now();
    let id = authorize_update(&state, &caller, &id)?;

    let character = state.progression.level_up(&id).await?;
    let href = format!("/characters/{id}");
    Ok(Json(ApiResponse::timed(character, start).with_link("self", &href)))
}

/// GET /updatecharacter/{id} - Current weapon, armor and skill.
pub async fn get_loadout(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Loadout>>, AppError> {
    let start = Instant::now();
    let id = parse_character_id(&id)?;
    state.authority.require_owner_or_any(
        &caller,
        &id,
        Permission::ViewOwnUser,
        Permission::ViewAnyUser,
    )?;

    let loadout = state.ledger.get_loadout(&id).await?;
    let href = format!("/characters/{id}");
    Ok(Json(ApiResponse::timed(loadout, start).with_link("character", &href)))
}
