//! Cryptographic operations for firstgame.
//!
//! - `password`: Argon2id PHC hashing of account passwords
//! - `token`: HS256 signed session tokens
//! - `key`: the token signing secret (env override or `token.key` file)

pub mod key;
pub mod password;
pub mod token;
