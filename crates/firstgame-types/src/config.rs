//! Global configuration types for firstgame.
//!
//! `GameConfig` represents the top-level `config.toml` in the data directory.
//! Every section and field has a default, so an empty file is valid.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Where the REST API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token lifetime and the admin bootstrap secret.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token lifetime in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,

    /// Static code compared verbatim against `?admin_code=` on `POST /admin`.
    #[serde(default = "default_admin_code")]
    pub admin_code: String,
}

fn default_token_ttl_secs() -> i64 {
    6 * 60 * 60
}

fn default_admin_code() -> String {
    "901029".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl_secs(),
            admin_code: default_admin_code(),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("admin_code", &"****")
            .finish()
    }
}

/// Equipment ledger policy switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// When true, detaching a skill reverses its modifiers like weapons and
    /// armor do. Off by default: skill detach only deletes the record.
    #[serde(default)]
    pub reverse_skill_modifiers: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_default_values() {
        let config = GameConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.token_ttl_secs, 21_600);
        assert_eq!(config.auth.admin_code, "901029");
        assert!(!config.ledger.reverse_skill_modifiers);
    }

    #[test]
    fn test_game_config_deserialize_empty() {
        let config: GameConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.admin_code, "901029");
    }

    #[test]
    fn test_game_config_deserialize_with_values() {
        let toml_str = r#"
[server]
port = 8080

[auth]
token_ttl_secs = 600
admin_code = "letmein"

[ledger]
reverse_skill_modifiers = true
"#;
        let config: GameConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.auth.token_ttl_secs, 600);
        assert_eq!(config.auth.admin_code, "letmein");
        assert!(config.ledger.reverse_skill_modifiers);
    }

    #[test]
    fn test_auth_config_debug_hides_admin_code() {
        let rendered = format!("{:?}", AuthConfig::default());
        assert!(!rendered.contains("901029"));
    }
}
