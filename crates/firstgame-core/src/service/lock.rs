//! Per-character serialization point.
//!
//! Every read-modify-write on a character's stat fields (equip, unequip,
//! level-up, profile update) runs while holding that character's lock, so two
//! concurrent requests on the same id cannot interleave and lose an update.
//! Different characters never contend.

use std::sync::Arc;

use dashmap::DashMap;
use firstgame_types::character::CharacterId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-character async mutexes. Cheap to clone; clones share the
/// same registry.
#[derive(Clone, Default)]
pub struct CharacterLocks {
    inner: Arc<DashMap<CharacterId, Arc<Mutex<()>>>>,
}

impl CharacterLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn acquire(&self, id: &CharacterId) -> OwnedMutexGuard<()> {
        let mutex = self
            .inner
            .entry(*id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    /// Drop the registry entry of a deleted character. Call while holding its
    /// guard.
    pub fn forget(&self, id: &CharacterId) {
        self.inner.remove(id);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
