//! Data directory layout.
//!
//! Everything firstgame persists lives under one directory: the SQLite
//! database, `config.toml` and the token signing key.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FIRSTGAME_DATA_DIR";

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `FIRSTGAME_DATA_DIR` environment variable
/// 2. `~/.firstgame`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".firstgame");
    }

    // Last resort: current directory
    PathBuf::from(".firstgame")
}
