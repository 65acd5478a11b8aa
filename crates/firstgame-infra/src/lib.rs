//! Infrastructure layer for firstgame.
//!
//! Contains implementations of the ports defined in `firstgame-core`:
//! SQLite storage, Argon2 credential hashing, HS256 session tokens and the
//! signing-key file, plus config loading and data-directory resolution.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod sqlite;
