//! Token signing secret management.
//!
//! The HS256 secret comes from `FIRSTGAME_TOKEN_SECRET` when set. Otherwise a
//! random 32-byte key is generated on first start and persisted hex-encoded
//! at `{data_dir}/token.key`, so tokens survive restarts.
//!
//! SECURITY: Error types never contain key material.

use std::path::{Path, PathBuf};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use thiserror::Error;

/// Environment variable holding an explicit signing secret.
pub const TOKEN_SECRET_ENV: &str = "FIRSTGAME_TOKEN_SECRET";

const KEY_FILE: &str = "token.key";
const KEY_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupted signing key in {0}")]
    Corrupted(PathBuf),
}

/// Load the signing secret from the environment or the key file, creating
/// the file if neither exists.
pub async fn load_signing_key(data_dir: &Path) -> Result<Vec<u8>, KeyError> {
    resolve_signing_key(std::env::var(TOKEN_SECRET_ENV).ok(), data_dir).await
}

/// Same as [`load_signing_key`] with the environment value passed in.
pub async fn resolve_signing_key(
    env_secret: Option<String>,
    data_dir: &Path,
) -> Result<Vec<u8>, KeyError> {
    if let Some(secret) = env_secret.filter(|s| !s.is_empty()) {
        tracing::debug!("using token secret from {TOKEN_SECRET_ENV}");
        return Ok(secret.into_bytes());
    }

    let path = data_dir.join(KEY_FILE);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            let key = hex_decode(content.trim()).map_err(|_| KeyError::Corrupted(path.clone()))?;
            if key.len() != KEY_LEN {
                return Err(KeyError::Corrupted(path));
            }
            Ok(key)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let key = rand_bytes();
            tokio::fs::create_dir_all(data_dir)
                .await
                .map_err(|source| KeyError::Io {
                    path: data_dir.to_path_buf(),
                    source,
                })?;
            tokio::fs::write(&path, hex_encode(&key))
                .await
                .map_err(|source| KeyError::Io {
                    path: path.clone(),
                    source,
                })?;
            restrict_permissions(&path).await?;
            tracing::info!(path = %path.display(), "generated new token signing key");
            Ok(key.to_vec())
        }
        Err(source) => Err(KeyError::Io { path, source }),
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), KeyError> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .await
        .map_err(|source| KeyError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), KeyError> {
    Ok(())
}

/// Generate 32 random bytes using the OS CSPRNG.
fn rand_bytes() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut key);
    key
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>, String> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return Err("odd length or non-ascii hex string".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}
