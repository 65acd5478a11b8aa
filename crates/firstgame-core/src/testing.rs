//! In-memory port fakes shared by the service tests.
//!
//! The fakes yield to the scheduler before touching their maps so concurrent
//! tests actually interleave at every store access, like a real database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use firstgame_types::auth::CallerIdentity;
use firstgame_types::character::{Character, CharacterId, CreateCharacterRequest};
use firstgame_types::equipment::{Equipment, EquipmentKind};
use firstgame_types::error::{AuthError, RepositoryError};
use firstgame_types::permission::PermissionSet;

use crate::repository::character::{CharacterFilter, CharacterRepository};
use crate::repository::equipment::EquipmentRepository;
use crate::service::hash::CredentialHasher;
use crate::service::token::TokenCodec;

#[derive(Clone, Default)]
pub struct MemoryCharacters {
    rows: Arc<Mutex<HashMap<CharacterId, Character>>>,
}

impl MemoryCharacters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, character: Character) {
        self.rows.lock().unwrap().insert(character.id, character);
    }

    pub fn get(&self, id: &CharacterId) -> Option<Character> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    fn matches(character: &Character, filter: &CharacterFilter) -> bool {
        filter.email.as_ref().is_none_or(|e| &character.email == e)
            && filter.level.is_none_or(|l| character.level == l)
    }
}

impl CharacterRepository for MemoryCharacters {
    async fn create(&self, character: &Character) -> Result<Character, RepositoryError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|c| c.email == character.email) {
            return Err(RepositoryError::Conflict(format!(
                "email '{}' already exists",
                character.email
            )));
        }
        rows.insert(character.id, character.clone());
        Ok(character.clone())
    }

    async fn get_by_id(&self, id: &CharacterId) -> Result<Option<Character>, RepositoryError> {
        tokio::task::yield_now().await;
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Character>, RepositoryError> {
        tokio::task::yield_now().await;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list(&self, filter: Option<CharacterFilter>) -> Result<Vec<Character>, RepositoryError> {
        tokio::task::yield_now().await;
        let filter = filter.unwrap_or_default();
        let mut all: Vec<Character> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| Self::matches(c, &filter))
            .cloned()
            .collect();
        all.sort_by_key(|c| c.created_at);
        let offset = filter.offset.unwrap_or(0).max(0) as usize;
        let limit = filter.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self, filter: Option<CharacterFilter>) -> Result<i64, RepositoryError> {
        tokio::task::yield_now().await;
        let filter = filter.unwrap_or_default();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| Self::matches(c, &filter))
            .count() as i64)
    }

    async fn update(&self, character: &Character) -> Result<Character, RepositoryError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&character.id) {
            return Err(RepositoryError::NotFound);
        }
        if rows
            .values()
            .any(|c| c.id != character.id && c.email == character.email)
        {
            return Err(RepositoryError::Conflict(format!(
                "email '{}' already exists",
                character.email
            )));
        }
        rows.insert(character.id, character.clone());
        Ok(character.clone())
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), RepositoryError> {
        tokio::task::yield_now().await;
        match self.rows.lock().unwrap().remove(id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Equipment store that, like a document store, does not enforce one record
/// per slot on its own.
#[derive(Clone, Default)]
pub struct MemoryEquipment {
    rows: Arc<Mutex<Vec<Equipment>>>,
    fail_creates: Arc<AtomicBool>,
}

impl MemoryEquipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `create` fail with a query error.
    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    pub fn count_for(&self, kind: EquipmentKind, character_id: &CharacterId) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind && &e.character_id == character_id)
            .count()
    }

    pub fn count_owned_by(&self, character_id: &CharacterId) -> usize {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.character_id == character_id)
            .count()
    }
}

impl EquipmentRepository for MemoryEquipment {
    async fn find_by_character(
        &self,
        kind: EquipmentKind,
        character_id: &CharacterId,
    ) -> Result<Option<Equipment>, RepositoryError> {
        tokio::task::yield_now().await;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.kind == kind && &e.character_id == character_id)
            .cloned())
    }

    async fn create(&self, equipment: &Equipment) -> Result<Equipment, RepositoryError> {
        tokio::task::yield_now().await;
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("equipment insert failed".to_string()));
        }
        self.rows.lock().unwrap().push(equipment.clone());
        Ok(equipment.clone())
    }

    async fn delete_by_character(
        &self,
        kind: EquipmentKind,
        character_id: &CharacterId,
    ) -> Result<u64, RepositoryError> {
        tokio::task::yield_now().await;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|e| !(e.kind == kind && &e.character_id == character_id));
        Ok((before - rows.len()) as u64)
    }
}

/// Reversible "hash" for tests: `plain$<password>`.
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> Result<String, String> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

/// Unsigned JSON tokens with a fixed prefix. Anything else is rejected.
pub struct JsonTokens;

impl TokenCodec for JsonTokens {
    fn issue(&self, identity: &CallerIdentity) -> Result<String, AuthError> {
        let json = serde_json::to_string(identity).map_err(|e| AuthError::Signing(e.to_string()))?;
        Ok(format!("test.{json}"))
    }

    fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let json = token
            .strip_prefix("test.")
            .ok_or_else(|| AuthError::InvalidToken("bad prefix".to_string()))?;
        serde_json::from_str(json).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

/// A stored character with default stats.
pub fn make_character(name: &str, email: &str, permissions: PermissionSet) -> Character {
    let stats = CreateCharacterRequest::new(name, email, "pw").stats();
    let now = Utc::now();
    let mut character = Character {
        id: CharacterId::new(),
        name: name.to_string(),
        email: email.to_string(),
        password: Some("plain$pw".to_string()),
        permissions,
        level: 0,
        current_exp: 0,
        next_level_exp: 0,
        max_health: 0,
        current_health: 0,
        max_mana: 0,
        current_mana: 0,
        attack: 0,
        defence: 0,
        created_at: now,
        updated_at: now,
    };
    stats.apply_to(&mut character);
    character
}
