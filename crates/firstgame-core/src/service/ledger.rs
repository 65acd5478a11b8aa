//! Equipment ledger: keeps a character's effective `attack`/`defence` in step
//! with whatever is attached to its weapon, armor and skill slots.
//!
//! Every mutation holds the character's lock for the whole
//! read-modify-write, so concurrent equips on one character cannot lose a
//! stat delta.

use chrono::Utc;
use firstgame_types::character::{Character, CharacterId};
use firstgame_types::equipment::{Equipment, EquipmentKind, Loadout, NewEquipment};
use firstgame_types::error::{CharacterError, RepositoryError};

use crate::repository::character::CharacterRepository;
use crate::repository::equipment::EquipmentRepository;
use crate::service::lock::CharacterLocks;

pub struct EquipmentLedger<C: CharacterRepository, E: EquipmentRepository> {
    characters: C,
    equipment: E,
    locks: CharacterLocks,
    reverse_skill_modifiers: bool,
}

impl<C: CharacterRepository, E: EquipmentRepository> EquipmentLedger<C, E> {
    pub fn new(characters: C, equipment: E, locks: CharacterLocks) -> Self {
        Self {
            characters,
            equipment,
            locks,
            reverse_skill_modifiers: false,
        }
    }

    /// Make skill detach subtract the skill's modifiers like weapons and armor
    /// do. Off by default: a detached skill leaves its bonus behind.
    pub fn with_reverse_skill_modifiers(mut self, enabled: bool) -> Self {
        self.reverse_skill_modifiers = enabled;
        self
    }

    /// Attach `item` to the `kind` slot, replacing whatever was there.
    ///
    /// The replaced item's own modifiers are subtracted, so after a
    /// replacement the character carries base + new modifiers only. The new
    /// stats are computed before anything is written; a result outside `i64`
    /// is `InvalidInput` and leaves the character and its slot untouched.
    ///
    /// If the new record cannot be written after the stats were saved, the
    /// new modifiers are taken back off so the character matches the slot,
    /// which is empty at that point.
    pub async fn equip(
        &self,
        character_id: &CharacterId,
        kind: EquipmentKind,
        item: NewEquipment,
    ) -> Result<Equipment, CharacterError> {
        item.validate()?;
        let _guard = self.locks.acquire(character_id).await;

        let mut character = self.load(character_id).await?;
        let old = self.find(kind, character_id).await?;
        let (old_attack, old_defence) = old
            .as_ref()
            .map_or((0, 0), |old| (old.attack, old.defence));
        let (attack, defence) = shifted(&character, item.attack, item.defence)?;
        let attack = attack.checked_sub(old_attack).ok_or_else(out_of_range)?;
        let defence = defence.checked_sub(old_defence).ok_or_else(out_of_range)?;

        if let Some(old) = old {
            self.equipment
                .delete_by_character(kind, character_id)
                .await
                .map_err(storage)?;
            tracing::debug!(%character_id, %kind, replaced = %old.id, "detached previous item");
        }

        character.attack = attack;
        character.defence = defence;
        let character = self.persist(character).await?;

        let equipment = Equipment::from_request(kind, *character_id, &item);
        let equipment = match self.equipment.create(&equipment).await {
            Ok(equipment) => equipment,
            Err(e) => {
                tracing::error!(%character_id, %kind, error = %e, "equipment write failed, taking bonus back");
                let mut rollback = character;
                rollback.attack = rollback.attack.saturating_sub(item.attack);
                rollback.defence = rollback.defence.saturating_sub(item.defence);
                self.persist(rollback).await?;
                return Err(storage(e));
            }
        };
        tracing::info!(
            %character_id,
            %kind,
            attack = equipment.attack,
            defence = equipment.defence,
            "equipped item"
        );
        Ok(equipment)
    }

    /// Detach the `kind` slot. An empty slot is a no-op.
    ///
    /// Weapons and armor give their modifiers back. Skills are removed
    /// without touching the character unless reversal is enabled.
    pub async fn unequip(
        &self,
        character_id: &CharacterId,
        kind: EquipmentKind,
    ) -> Result<(), CharacterError> {
        let _guard = self.locks.acquire(character_id).await;

        if kind == EquipmentKind::Skill && !self.reverse_skill_modifiers {
            let removed = self
                .equipment
                .delete_by_character(kind, character_id)
                .await
                .map_err(storage)?;
            tracing::info!(%character_id, %kind, removed, "unequipped skill without stat reversal");
            return Ok(());
        }

        let Some(item) = self.find(kind, character_id).await? else {
            tracing::debug!(%character_id, %kind, "unequip on empty slot");
            return Ok(());
        };

        let mut character = self.load(character_id).await?;
        let (attack, defence) = shifted(
            &character,
            item.attack.checked_neg().ok_or_else(out_of_range)?,
            item.defence.checked_neg().ok_or_else(out_of_range)?,
        )?;
        character.attack = attack;
        character.defence = defence;
        self.persist(character).await?;

        self.equipment
            .delete_by_character(kind, character_id)
            .await
            .map_err(storage)?;
        tracing::info!(%character_id, %kind, item = %item.id, "unequipped item");
        Ok(())
    }

    /// Current contents of the three slots. Empty slots are `None`.
    pub async fn get_loadout(&self, character_id: &CharacterId) -> Result<Loadout, CharacterError> {
        self.load(character_id).await?;

        let mut loadout = Loadout::default();
        for kind in EquipmentKind::ALL {
            loadout.set(kind, self.find(kind, character_id).await?);
        }
        Ok(loadout)
    }

    /// Delete the character together with everything attached to it.
    pub async fn delete_character_cascade(
        &self,
        character_id: &CharacterId,
    ) -> Result<(), CharacterError> {
        let _guard = self.locks.acquire(character_id).await;
        self.load(character_id).await?;

        let mut removed = 0;
        for kind in EquipmentKind::ALL {
            removed += self
                .equipment
                .delete_by_character(kind, character_id)
                .await
                .map_err(storage)?;
        }

        self.characters
            .delete(character_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CharacterError::NotFound,
                other => storage(other),
            })?;
        self.locks.forget(character_id);

        tracing::info!(%character_id, equipment_removed = removed, "deleted character");
        Ok(())
    }

    async fn load(&self, id: &CharacterId) -> Result<Character, CharacterError> {
        self.characters
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(CharacterError::NotFound)
    }

    async fn find(
        &self,
        kind: EquipmentKind,
        id: &CharacterId,
    ) -> Result<Option<Equipment>, CharacterError> {
        self.equipment.find_by_character(kind, id).await.map_err(storage)
    }

    async fn persist(&self, mut character: Character) -> Result<Character, CharacterError> {
        character.updated_at = Utc::now();
        self.characters.update(&character).await.map_err(|e| match e {
            RepositoryError::NotFound => CharacterError::NotFound,
            other => storage(other),
        })
    }
}

/// `character`'s attack and defence moved by the given deltas.
fn shifted(character: &Character, attack: i64, defence: i64) -> Result<(i64, i64), CharacterError> {
    Ok((
        character.attack.checked_add(attack).ok_or_else(out_of_range)?,
        character.defence.checked_add(defence).ok_or_else(out_of_range)?,
    ))
}

fn out_of_range() -> CharacterError {
    CharacterError::InvalidInput("equipment modifiers push a stat out of range".to_string())
}

fn storage(e: RepositoryError) -> CharacterError {
    CharacterError::StorageError(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryCharacters, MemoryEquipment, make_character};
    use firstgame_types::permission::PermissionSet;
    use std::sync::Arc;

    struct Fixture {
        characters: MemoryCharacters,
        equipment: MemoryEquipment,
        ledger: EquipmentLedger<MemoryCharacters, MemoryEquipment>,
        hero: Character,
    }

    fn fixture() -> Fixture {
        let characters = MemoryCharacters::new();
        let equipment = MemoryEquipment::new();
        let hero = make_character("Hero", "hero@example.com", PermissionSet::standard());
        characters.insert(hero.clone());
        let ledger = EquipmentLedger::new(characters.clone(), equipment.clone(), CharacterLocks::new());
        Fixture {
            characters,
            equipment,
            ledger,
            hero,
        }
    }

    #[tokio::test]
    async fn test_equip_then_unequip_restores_stats() {
        let f = fixture();
        let id = f.hero.id;

        f.ledger
            .equip(&id, EquipmentKind::Weapon, NewEquipment::new("Sword", 5, 0))
            .await
            .unwrap();
        let armed = f.characters.get(&id).unwrap();
        assert_eq!(armed.attack, f.hero.attack + 5);
        assert_eq!(armed.defence, f.hero.defence);

        f.ledger.unequip(&id, EquipmentKind::Weapon).await.unwrap();
        let back = f.characters.get(&id).unwrap();
        assert_eq!(back.attack, f.hero.attack);
        assert_eq!(back.defence, f.hero.defence);
        assert_eq!(f.equipment.count_for(EquipmentKind::Weapon, &id), 0);
    }

    #[tokio::test]
    async fn test_replacement_leaves_one_record_with_new_modifiers() {
        let f = fixture();
        let id = f.hero.id;

        f.ledger
            .equip(&id, EquipmentKind::Armor, NewEquipment::new("Leather", 0, 3))
            .await
            .unwrap();
        let plate = f
            .ledger
            .equip(&id, EquipmentKind::Armor, NewEquipment::new("Plate", 1, 8))
            .await
            .unwrap();

        assert_eq!(f.equipment.count_for(EquipmentKind::Armor, &id), 1);
        let character = f.characters.get(&id).unwrap();
        assert_eq!(character.attack, f.hero.attack + 1);
        assert_eq!(character.defence, f.hero.defence + 8);

        let loadout = f.ledger.get_loadout(&id).await.unwrap();
        assert_eq!(loadout.armor, Some(plate));
    }

    #[tokio::test]
    async fn test_equip_unknown_character_is_not_found() {
        let f = fixture();
        let err = f
            .ledger
            .equip(
                &CharacterId::new(),
                EquipmentKind::Weapon,
                NewEquipment::new("Sword", 5, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterError::NotFound));
    }

    #[tokio::test]
    async fn test_equip_rejects_nameless_item() {
        let f = fixture();
        let err = f
            .ledger
            .equip(&f.hero.id, EquipmentKind::Weapon, NewEquipment::new("", 5, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterError::InvalidInput(_)));
        assert_eq!(f.equipment.count_owned_by(&f.hero.id), 0);
    }

    #[tokio::test]
    async fn test_equip_rejects_out_of_range_modifier() {
        let f = fixture();
        let err = f
            .ledger
            .equip(&f.hero.id, EquipmentKind::Weapon, NewEquipment::new("Big", i64::MAX, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterError::InvalidInput(_)));
        assert_eq!(f.characters.get(&f.hero.id).unwrap(), f.hero);
        assert_eq!(f.equipment.count_owned_by(&f.hero.id), 0);
    }

    #[tokio::test]
    async fn test_equip_overflowing_stat_leaves_slot_alone() {
        let f = fixture();
        let mut strong = f.hero.clone();
        strong.attack = i64::MAX - 1;
        f.characters.insert(strong.clone());
        let dagger = f
            .ledger
            .equip(&strong.id, EquipmentKind::Weapon, NewEquipment::new("Dagger", 1, 0))
            .await
            .unwrap();
        let armed = f.characters.get(&strong.id).unwrap();
        assert_eq!(armed.attack, i64::MAX);

        let err = f
            .ledger
            .equip(&strong.id, EquipmentKind::Weapon, NewEquipment::new("Axe", 3, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterError::InvalidInput(_)));
        assert_eq!(f.characters.get(&strong.id).unwrap(), armed);
        let loadout = f.ledger.get_loadout(&strong.id).await.unwrap();
        assert_eq!(loadout.weapon, Some(dagger));
    }

    #[tokio::test]
    async fn test_failed_record_write_takes_bonus_back() {
        let f = fixture();
        let id = f.hero.id;
        f.ledger
            .equip(&id, EquipmentKind::Weapon, NewEquipment::new("Sword", 5, 2))
            .await
            .unwrap();

        f.equipment.fail_creates();
        let err = f
            .ledger
            .equip(&id, EquipmentKind::Weapon, NewEquipment::new("Axe", 9, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, CharacterError::StorageError(_)));

        // The sword was already detached, so the character is back to base.
        let character = f.characters.get(&id).unwrap();
        assert_eq!(character.attack, f.hero.attack);
        assert_eq!(character.defence, f.hero.defence);
        assert_eq!(f.equipment.count_owned_by(&id), 0);
    }

    #[tokio::test]
    async fn test_unequip_empty_slot_is_noop() {
        let f = fixture();
        f.ledger
            .unequip(&f.hero.id, EquipmentKind::Weapon)
            .await
            .unwrap();
        assert_eq!(f.characters.get(&f.hero.id).unwrap(), f.hero);
    }

    #[tokio::test]
    async fn test_skill_detach_keeps_modifiers_by_default() {
        let f = fixture();
        let id = f.hero.id;

        f.ledger
            .equip(&id, EquipmentKind::Skill, NewEquipment::new("Focus", 2, 2))
            .await
            .unwrap();
        f.ledger.unequip(&id, EquipmentKind::Skill).await.unwrap();

        let character = f.characters.get(&id).unwrap();
        assert_eq!(character.attack, f.hero.attack + 2);
        assert_eq!(character.defence, f.hero.defence + 2);
        assert_eq!(f.equipment.count_for(EquipmentKind::Skill, &id), 0);
    }

    #[tokio::test]
    async fn test_skill_detach_reverses_when_enabled() {
        let f = fixture();
        let id = f.hero.id;
        let ledger = EquipmentLedger::new(f.characters.clone(), f.equipment.clone(), CharacterLocks::new())
            .with_reverse_skill_modifiers(true);

        ledger
            .equip(&id, EquipmentKind::Skill, NewEquipment::new("Focus", 2, 2))
            .await
            .unwrap();
        ledger.unequip(&id, EquipmentKind::Skill).await.unwrap();

        let character = f.characters.get(&id).unwrap();
        assert_eq!(character.attack, f.hero.attack);
        assert_eq!(character.defence, f.hero.defence);
    }

    #[tokio::test]
    async fn test_skill_replacement_subtracts_old_skill() {
        let f = fixture();
        let id = f.hero.id;

        f.ledger
            .equip(&id, EquipmentKind::Skill, NewEquipment::new("Focus", 2, 0))
            .await
            .unwrap();
        f.ledger
            .equip(&id, EquipmentKind::Skill, NewEquipment::new("Rage", 4, 0))
            .await
            .unwrap();

        assert_eq!(f.characters.get(&id).unwrap().attack, f.hero.attack + 4);
        assert_eq!(f.equipment.count_for(EquipmentKind::Skill, &id), 1);
    }

    #[tokio::test]
    async fn test_loadout_of_unknown_character_is_not_found() {
        let f = fixture();
        assert!(matches!(
            f.ledger.get_loadout(&CharacterId::new()).await,
            Err(CharacterError::NotFound)
        ));

        let empty = f.ledger.get_loadout(&f.hero.id).await.unwrap();
        assert_eq!(empty, Loadout::default());
    }

    #[tokio::test]
    async fn test_cascade_delete_leaves_no_orphans() {
        let f = fixture();
        let id = f.hero.id;
        for kind in EquipmentKind::ALL {
            f.ledger
                .equip(&id, kind, NewEquipment::new("Thing", 1, 1))
                .await
                .unwrap();
        }
        assert_eq!(f.equipment.count_owned_by(&id), 3);

        f.ledger.delete_character_cascade(&id).await.unwrap();

        assert!(f.characters.get(&id).is_none());
        assert_eq!(f.equipment.count_owned_by(&id), 0);
        assert!(matches!(
            f.ledger.get_loadout(&id).await,
            Err(CharacterError::NotFound)
        ));
        assert!(matches!(
            f.ledger.delete_character_cascade(&id).await,
            Err(CharacterError::NotFound)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_equips_do_not_lose_updates() {
        let f = fixture();
        let id = f.hero.id;
        let ledger = Arc::new(f.ledger);

        let mut handles = Vec::new();
        for i in 0..16 {
            let ledger = Arc::clone(&ledger);
            let kind = EquipmentKind::ALL[i % 3];
            handles.push(tokio::spawn(async move {
                ledger
                    .equip(&id, kind, NewEquipment::new("Item", i as i64, 1))
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // One record per slot, and the stats equal base + whatever survived.
        let loadout = ledger.get_loadout(&id).await.unwrap();
        let mut attack = f.hero.attack;
        let mut defence = f.hero.defence;
        for kind in EquipmentKind::ALL {
            assert_eq!(f.equipment.count_for(kind, &id), 1);
            let item = loadout.slot(kind).unwrap();
            attack += item.attack;
            defence += item.defence;
        }
        let character = f.characters.get(&id).unwrap();
        assert_eq!(character.attack, attack);
        assert_eq!(character.defence, defence);
    }
}
