//! Game configuration loader.
//!
//! Reads `config.toml` from the data directory (`~/.firstgame/` in production)
//! and deserializes it into [`GameConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use firstgame_types::config::GameConfig;

/// Environment variable overriding `auth.admin_code`.
pub const ADMIN_CODE_ENV: &str = "FIRSTGAME_ADMIN_CODE";

/// Load configuration from `{data_dir}/config.toml`, then apply environment
/// overrides.
pub async fn load_game_config(data_dir: &Path) -> GameConfig {
    let config = read_config_file(data_dir).await;
    apply_env_overrides(config, std::env::var(ADMIN_CODE_ENV).ok())
}

async fn read_config_file(data_dir: &Path) -> GameConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GameConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GameConfig::default();
        }
    };

    match toml::from_str::<GameConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GameConfig::default()
        }
    }
}

/// A non-empty `admin_code` from the environment replaces the file value.
pub fn apply_env_overrides(mut config: GameConfig, admin_code: Option<String>) -> GameConfig {
    if let Some(code) = admin_code.filter(|c| !c.is_empty()) {
        config.auth.admin_code = code;
    }
    config
}
