//! CredentialHasher trait for storing and checking passwords.
//!
//! Defined in firstgame-core so services never see a concrete algorithm. The
//! Argon2 adapter lives in firstgame-infra.

pub trait CredentialHasher: Send + Sync {
    /// Produce a self-describing hash string (salt included) for storage.
    fn hash_password(&self, password: &str) -> Result<String, String>;

    /// Check `password` against a hash produced by [`Self::hash_password`].
    /// Malformed hashes verify as `false`.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}
