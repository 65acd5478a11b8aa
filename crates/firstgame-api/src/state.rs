//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository/hasher/codec traits, but AppState
//! pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use firstgame_core::service::authority::{AdminGate, PermissionAuthority};
use firstgame_core::service::character::CharacterAccountRegistrar;
use firstgame_core::service::ledger::EquipmentLedger;
use firstgame_core::service::lock::CharacterLocks;
use firstgame_core::service::progression::ProgressionEngine;
use firstgame_infra::config::load_game_config;
use firstgame_infra::crypto::key::load_signing_key;
use firstgame_infra::crypto::password::Argon2CredentialHasher;
use firstgame_infra::crypto::token::JwtTokenCodec;
use firstgame_infra::filesystem::resolve_data_dir;
use firstgame_infra::sqlite::character::SqliteCharacterRepository;
use firstgame_infra::sqlite::equipment::SqliteEquipmentRepository;
use firstgame_infra::sqlite::pool::{DatabasePool, database_url};
use firstgame_types::config::GameConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthority =
    PermissionAuthority<SqliteCharacterRepository, Argon2CredentialHasher, JwtTokenCodec>;

pub type ConcreteRegistrar =
    CharacterAccountRegistrar<SqliteCharacterRepository, Argon2CredentialHasher>;

pub type ConcreteLedger = EquipmentLedger<SqliteCharacterRepository, SqliteEquipmentRepository>;

pub type ConcreteProgression = ProgressionEngine<SqliteCharacterRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub authority: Arc<ConcreteAuthority>,
    pub registrar: Arc<ConcreteRegistrar>,
    pub ledger: Arc<ConcreteLedger>,
    pub progression: Arc<ConcreteProgression>,
    pub config: Arc<GameConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load `config.toml` and wire everything.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_game_config(&data_dir).await;
        Self::init_with(data_dir, config).await
    }

    /// Connect to the database under `data_dir` and wire the services.
    pub async fn init_with(data_dir: PathBuf, config: GameConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let signing_key = load_signing_key(&data_dir).await?;
        let codec = JwtTokenCodec::new(&signing_key, config.auth.token_ttl_secs);

        let characters = SqliteCharacterRepository::new(db_pool.clone());
        let equipment = SqliteEquipmentRepository::new(db_pool.clone());

        // One registry shared by every service that mutates a character.
        let locks = CharacterLocks::new();

        let authority = PermissionAuthority::new(
            characters.clone(),
            Argon2CredentialHasher::new(),
            codec,
        );
        let registrar = CharacterAccountRegistrar::new(
            characters.clone(),
            Argon2CredentialHasher::new(),
            AdminGate::new(config.auth.admin_code.clone()),
            locks.clone(),
        );
        let ledger = EquipmentLedger::new(characters.clone(), equipment, locks.clone())
            .with_reverse_skill_modifiers(config.ledger.reverse_skill_modifiers);
        let progression = ProgressionEngine::new(characters, locks);

        tracing::debug!(data_dir = %data_dir.display(), "application state ready");

        Ok(Self {
            authority: Arc::new(authority),
            registrar: Arc::new(registrar),
            ledger: Arc::new(ledger),
            progression: Arc::new(progression),
            config: Arc::new(config),
            data_dir,
        })
    }
}
