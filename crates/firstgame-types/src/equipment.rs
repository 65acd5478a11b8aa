use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::character::CharacterId;
use crate::error::CharacterError;

/// Unique identifier for an equipment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipmentId(pub Uuid);

impl EquipmentId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for EquipmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EquipmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Equipment slot. A character holds at most one item per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    Weapon,
    Armor,
    Skill,
}

impl EquipmentKind {
    pub const ALL: [EquipmentKind; 3] = [
        EquipmentKind::Weapon,
        EquipmentKind::Armor,
        EquipmentKind::Skill,
    ];
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentKind::Weapon => write!(f, "weapon"),
            EquipmentKind::Armor => write!(f, "armor"),
            EquipmentKind::Skill => write!(f, "skill"),
        }
    }
}

impl FromStr for EquipmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weapon" => Ok(EquipmentKind::Weapon),
            "armor" => Ok(EquipmentKind::Armor),
            "skill" => Ok(EquipmentKind::Skill),
            other => Err(format!("invalid equipment slot: '{other}'")),
        }
    }
}

/// An attached equipment record. `attack`/`defence` are the stat deltas it
/// contributes while attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: EquipmentId,
    pub kind: EquipmentKind,
    pub name: String,
    pub attack: i64,
    pub defence: i64,
    pub character_id: CharacterId,
    pub created_at: DateTime<Utc>,
}

impl Equipment {
    pub fn from_request(
        kind: EquipmentKind,
        character_id: CharacterId,
        request: &NewEquipment,
    ) -> Self {
        Self {
            id: EquipmentId::new(),
            kind,
            name: request.name.trim().to_string(),
            attack: request.attack,
            defence: request.defence,
            character_id,
            created_at: Utc::now(),
        }
    }
}

/// Largest absolute `attack`/`defence` modifier an item may carry.
pub const MAX_MODIFIER: i64 = 1_000_000;

/// Payload for equipping an item. Skills commonly carry zero modifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEquipment {
    pub name: String,
    #[serde(default)]
    pub attack: i64,
    #[serde(default)]
    pub defence: i64,
}

impl NewEquipment {
    pub fn new(name: &str, attack: i64, defence: i64) -> Self {
        Self {
            name: name.to_string(),
            attack,
            defence,
        }
    }

    pub fn validate(&self) -> Result<(), CharacterError> {
        if self.name.trim().is_empty() {
            return Err(CharacterError::InvalidInput(
                "equipment name cannot be empty".to_string(),
            ));
        }
        if self.attack.unsigned_abs() > MAX_MODIFIER as u64
            || self.defence.unsigned_abs() > MAX_MODIFIER as u64
        {
            return Err(CharacterError::InvalidInput(format!(
                "equipment modifiers must be within {MAX_MODIFIER} of zero"
            )));
        }
        Ok(())
    }
}

/// The three slots of a character. A missing slot is a normal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loadout {
    pub weapon: Option<Equipment>,
    pub armor: Option<Equipment>,
    pub skill: Option<Equipment>,
}

impl Loadout {
    pub fn slot(&self, kind: EquipmentKind) -> Option<&Equipment> {
        match kind {
            EquipmentKind::Weapon => self.weapon.as_ref(),
            EquipmentKind::Armor => self.armor.as_ref(),
            EquipmentKind::Skill => self.skill.as_ref(),
        }
    }

    pub fn set(&mut self, kind: EquipmentKind, item: Option<Equipment>) {
        match kind {
            EquipmentKind::Weapon => self.weapon = item,
            EquipmentKind::Armor => self.armor = item,
            EquipmentKind::Skill => self.skill = item,
        }
    }
}
