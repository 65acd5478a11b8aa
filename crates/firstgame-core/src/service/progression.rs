//! Experience-driven level progression.

use chrono::Utc;
use firstgame_types::character::limits::MAX_EXP;
use firstgame_types::character::{Character, CharacterId};
use firstgame_types::error::{CharacterError, RepositoryError};

use crate::repository::character::CharacterRepository;
use crate::service::lock::CharacterLocks;

/// Experience threshold growth per level gained.
pub const EXP_STEP: i64 = 100;
pub const HEALTH_PER_LEVEL: i64 = 10;
pub const MANA_PER_LEVEL: i64 = 5;
pub const ATTACK_PER_LEVEL: i64 = 3;
pub const DEFENCE_PER_LEVEL: i64 = 1;

/// Consume banked experience and apply the per-level growth. Returns the
/// number of levels gained; zero leaves `character` untouched.
///
/// Pools are refilled only when at least one level was gained. Experience
/// outside `1..=MAX_EXP` (threshold) or `0..=MAX_EXP` (banked) is rejected
/// before the loop runs, and any stat that would leave `i64` fails the whole
/// call with `character` unchanged.
pub fn apply_level_ups(character: &mut Character) -> Result<i64, CharacterError> {
    if !(1..=MAX_EXP).contains(&character.next_level_exp) {
        return Err(CharacterError::InvalidInput(format!(
            "nextLevelExp must be between 1 and {MAX_EXP}"
        )));
    }
    if !(0..=MAX_EXP).contains(&character.current_exp) {
        return Err(CharacterError::InvalidInput(format!(
            "currentExp must be between 0 and {MAX_EXP}"
        )));
    }

    let mut current_exp = character.current_exp;
    let mut next_level_exp = character.next_level_exp;
    let mut levels: i64 = 0;
    while current_exp >= next_level_exp {
        levels += 1;
        current_exp -= next_level_exp;
        next_level_exp = grow(next_level_exp, EXP_STEP)?;
    }
    if levels == 0 {
        return Ok(0);
    }

    let level = grow(character.level, levels)?;
    let max_health = grow(character.max_health, per_level(HEALTH_PER_LEVEL, levels)?)?;
    let max_mana = grow(character.max_mana, per_level(MANA_PER_LEVEL, levels)?)?;
    let attack = grow(character.attack, per_level(ATTACK_PER_LEVEL, levels)?)?;
    let defence = grow(character.defence, per_level(DEFENCE_PER_LEVEL, levels)?)?;

    character.current_exp = current_exp;
    character.next_level_exp = next_level_exp;
    character.level = level;
    character.max_health = max_health;
    character.current_health = max_health;
    character.max_mana = max_mana;
    character.current_mana = max_mana;
    character.attack = attack;
    character.defence = defence;
    Ok(levels)
}

fn grow(value: i64, by: i64) -> Result<i64, CharacterError> {
    value.checked_add(by).ok_or_else(overflow)
}

fn per_level(rate: i64, levels: i64) -> Result<i64, CharacterError> {
    rate.checked_mul(levels).ok_or_else(overflow)
}

fn overflow() -> CharacterError {
    CharacterError::InvalidInput("level-up would overflow a stat".to_string())
}

pub struct ProgressionEngine<C: CharacterRepository> {
    characters: C,
    locks: CharacterLocks,
}

impl<C: CharacterRepository> ProgressionEngine<C> {
    pub fn new(characters: C, locks: CharacterLocks) -> Self {
        Self { characters, locks }
    }

    /// Level the character up as far as its experience allows and persist
    /// the result once. Calling it again with no new experience is a no-op.
    pub async fn level_up(&self, character_id: &CharacterId) -> Result<Character, CharacterError> {
        let _guard = self.locks.acquire(character_id).await;

        let mut character = self
            .characters
            .get_by_id(character_id)
            .await
            .map_err(|e| CharacterError::StorageError(e.to_string()))?
            .ok_or(CharacterError::NotFound)?;

        let levels = apply_level_ups(&mut character)?;
        if levels == 0 {
            tracing::debug!(%character_id, "not enough experience to level up");
            return Ok(character.redact());
        }

        character.updated_at = Utc::now();
        let saved = self
            .characters
            .update(&character)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CharacterError::NotFound,
                other => CharacterError::StorageError(other.to_string()),
            })?;

        tracing::info!(%character_id, levels, level = saved.level, "character levelled up");
        Ok(saved.redact())
    }
}
