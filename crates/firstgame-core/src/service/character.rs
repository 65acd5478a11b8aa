//! Character account registration and profile management.
//!
//! Creates accounts with email-uniqueness enforcement and a permission set
//! chosen by the entry point (public registration vs. admin bootstrap), and
//! makes sure no stored credential hash ever leaves this service.

use chrono::Utc;
use firstgame_types::character::{
    Character, CharacterId, CreateCharacterRequest, ReplaceCharacterRequest, StatBlock,
    UpdateCharacterRequest,
};
use firstgame_types::error::{CharacterError, RepositoryError};
use firstgame_types::permission::PermissionSet;

use crate::repository::character::{CharacterFilter, CharacterRepository};
use crate::service::authority::AdminGate;
use crate::service::hash::CredentialHasher;
use crate::service::lock::CharacterLocks;

/// Service owning the character account lifecycle (except deletion, which
/// cascades through the equipment ledger).
pub struct CharacterAccountRegistrar<C: CharacterRepository, H: CredentialHasher> {
    characters: C,
    hasher: H,
    admin_gate: AdminGate,
    locks: CharacterLocks,
}

impl<C: CharacterRepository, H: CredentialHasher> CharacterAccountRegistrar<C, H> {
    pub fn new(characters: C, hasher: H, admin_gate: AdminGate, locks: CharacterLocks) -> Self {
        Self {
            characters,
            hasher,
            admin_gate,
            locks,
        }
    }

    /// Public self-registration with the standard permission set.
    pub async fn register(&self, request: CreateCharacterRequest) -> Result<Character, CharacterError> {
        self.create_account(request, PermissionSet::standard()).await
    }

    /// Elevated registration, gated only by the static admin code.
    pub async fn register_admin(
        &self,
        admin_code: Option<&str>,
        request: CreateCharacterRequest,
    ) -> Result<Character, CharacterError> {
        self.admin_gate.check(admin_code)?;
        self.create_account(request, PermissionSet::elevated()).await
    }

    async fn create_account(
        &self,
        request: CreateCharacterRequest,
        permissions: PermissionSet,
    ) -> Result<Character, CharacterError> {
        request.validate()?;
        self.ensure_email_free(&request.email, None).await?;

        let password_hash = self
            .hasher
            .hash_password(&request.password)
            .map_err(CharacterError::Credential)?;

        let now = Utc::now();
        let stats = request.stats();
        let mut character = Character {
            id: CharacterId::new(),
            name: request.name.trim().to_string(),
            email: request.email.clone(),
            password: Some(password_hash),
            permissions,
            level: stats.level,
            current_exp: stats.current_exp,
            next_level_exp: stats.next_level_exp,
            max_health: stats.max_health,
            current_health: stats.current_health,
            max_mana: stats.max_mana,
            current_mana: stats.current_mana,
            attack: stats.attack,
            defence: stats.defence,
            created_at: now,
            updated_at: now,
        };

        // The pre-check above can race; the store's unique constraint is the
        // backstop and maps to the same error.
        character = self
            .characters
            .create(&character)
            .await
            .map_err(|e| map_write_error(e, &request.email))?;

        tracing::info!(
            character_id = %character.id,
            permissions = character.permissions.len(),
            "registered character"
        );
        Ok(character.redact())
    }

    /// Get a character by ID.
    pub async fn get(&self, id: &CharacterId) -> Result<Character, CharacterError> {
        self.load(id).await.map(Character::redact)
    }

    /// List characters with optional filtering and pagination.
    pub async fn list(&self, filter: Option<CharacterFilter>) -> Result<Vec<Character>, CharacterError> {
        let characters = self
            .characters
            .list(filter)
            .await
            .map_err(|e| CharacterError::StorageError(e.to_string()))?;
        Ok(characters.into_iter().map(Character::redact).collect())
    }

    pub async fn count(&self, filter: Option<CharacterFilter>) -> Result<i64, CharacterError> {
        self.characters
            .count(filter)
            .await
            .map_err(|e| CharacterError::StorageError(e.to_string()))
    }

    /// Partial update. The merged record is validated as a whole, and a new
    /// password is hashed before it is stored.
    pub async fn update(
        &self,
        id: &CharacterId,
        request: UpdateCharacterRequest,
    ) -> Result<Character, CharacterError> {
        request.validate()?;
        let _guard = self.locks.acquire(id).await;
        let mut character = self.load(id).await?;

        if let Some(email) = &request.email {
            self.ensure_email_free(email, Some(id)).await?;
            character.email = email.clone();
        }
        if let Some(name) = &request.name {
            character.name = name.trim().to_string();
        }
        if let Some(password) = &request.password {
            character.password = Some(
                self.hasher
                    .hash_password(password)
                    .map_err(CharacterError::Credential)?,
            );
        }
        request.apply_stats(&mut character);
        StatBlock::of(&character).validate()?;

        self.save(character).await
    }

    /// Replace every writable field. Identity, permissions and timestamps of
    /// creation are preserved.
    pub async fn replace(
        &self,
        id: &CharacterId,
        request: ReplaceCharacterRequest,
    ) -> Result<Character, CharacterError> {
        request.validate()?;
        let _guard = self.locks.acquire(id).await;
        let mut character = self.load(id).await?;

        self.ensure_email_free(&request.email, Some(id)).await?;
        character.name = request.name.trim().to_string();
        character.email = request.email.clone();
        character.password = Some(
            self.hasher
                .hash_password(&request.password)
                .map_err(CharacterError::Credential)?,
        );
        request.stats().apply_to(&mut character);

        self.save(character).await
    }

    async fn save(&self, mut character: Character) -> Result<Character, CharacterError> {
        character.updated_at = Utc::now();
        let email = character.email.clone();
        let saved = self
            .characters
            .update(&character)
            .await
            .map_err(|e| map_write_error(e, &email))?;
        tracing::info!(character_id = %saved.id, "updated character");
        Ok(saved.redact())
    }

    async fn load(&self, id: &CharacterId) -> Result<Character, CharacterError> {
        self.characters
            .get_by_id(id)
            .await
            .map_err(|e| CharacterError::StorageError(e.to_string()))?
            .ok_or(CharacterError::NotFound)
    }

    /// `EmailTaken` if another character (not `owner`) already uses `email`.
    async fn ensure_email_free(
        &self,
        email: &str,
        owner: Option<&CharacterId>,
    ) -> Result<(), CharacterError> {
        let existing = self
            .characters
            .get_by_email(email)
            .await
            .map_err(|e| CharacterError::StorageError(e.to_string()))?;
        match existing {
            Some(found) if Some(&found.id) != owner => {
                Err(CharacterError::EmailTaken(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn map_write_error(error: RepositoryError, email: &str) -> CharacterError {
    match error {
        RepositoryError::Conflict(_) => CharacterError::EmailTaken(email.to_string()),
        RepositoryError::NotFound => CharacterError::NotFound,
        other => CharacterError::StorageError(other.to_string()),
    }
}
