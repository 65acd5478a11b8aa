//! Equipment repository trait definition.
//!
//! Weapons, armor and skills share one shape, so one trait serves all three
//! collections; `kind` selects the collection.

use firstgame_types::character::CharacterId;
use firstgame_types::equipment::{Equipment, EquipmentKind};
use firstgame_types::error::RepositoryError;

pub trait EquipmentRepository: Send + Sync {
    /// The record of `kind` owned by `character_id`, if any.
    fn find_by_character(
        &self,
        kind: EquipmentKind,
        character_id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Option<Equipment>, RepositoryError>> + Send;

    /// Insert a record into the collection named by `equipment.kind`.
    fn create(
        &self,
        equipment: &Equipment,
    ) -> impl std::future::Future<Output = Result<Equipment, RepositoryError>> + Send;

    /// Remove every record of `kind` owned by `character_id`. Returns the
    /// number removed; zero is not an error.
    fn delete_by_character(
        &self,
        kind: EquipmentKind,
        character_id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
