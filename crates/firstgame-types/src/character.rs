use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::CharacterError;
use crate::permission::PermissionSet;

/// Unique identifier for a character, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Starting values for a freshly registered character.
pub mod defaults {
    pub const LEVEL: i64 = 1;
    pub const CURRENT_EXP: i64 = 0;
    pub const NEXT_LEVEL_EXP: i64 = 100;
    pub const MAX_HEALTH: i64 = 100;
    pub const MAX_MANA: i64 = 50;
    pub const ATTACK: i64 = 10;
    pub const DEFENCE: i64 = 5;
}

/// Upper bounds accepted from clients. They keep every later stat delta and
/// the level-up loop well inside `i64`.
pub mod limits {
    /// Cap for `level`, pools and the absolute value of `attack`/`defence`.
    pub const MAX_STAT: i64 = 1_000_000_000;
    /// Cap for `currentExp` and `nextLevelExp`.
    pub const MAX_EXP: i64 = 1_000_000_000_000;
}

/// A player character account.
///
/// `attack` and `defence` are the *effective* values: base stats plus the
/// modifiers of whatever equipment is attached. `password` holds the stored
/// credential hash and is cleared with [`Character::redact`] before a record
/// leaves the service layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub permissions: PermissionSet,
    pub level: i64,
    pub current_exp: i64,
    pub next_level_exp: i64,
    pub max_health: i64,
    pub current_health: i64,
    pub max_mana: i64,
    pub current_mana: i64,
    pub attack: i64,
    pub defence: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Drop the credential hash from this record.
    pub fn redact(mut self) -> Self {
        self.password = None;
        self
    }
}

/// Registration payload. Only `name`, `email` and `password` are required;
/// omitted stats fall back to [`defaults`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub level: Option<i64>,
    pub current_exp: Option<i64>,
    pub next_level_exp: Option<i64>,
    pub max_health: Option<i64>,
    pub current_health: Option<i64>,
    pub max_mana: Option<i64>,
    pub current_mana: Option<i64>,
    pub attack: Option<i64>,
    pub defence: Option<i64>,
}

impl fmt::Debug for CreateCharacterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateCharacterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"****")
            .finish_non_exhaustive()
    }
}

impl CreateCharacterRequest {
    /// Minimal request with every stat left at its default.
    pub fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            level: None,
            current_exp: None,
            next_level_exp: None,
            max_health: None,
            current_health: None,
            max_mana: None,
            current_mana: None,
            attack: None,
            defence: None,
        }
    }

    pub fn validate(&self) -> Result<(), CharacterError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        self.stats().validate()
    }

    /// Resolved stat block with defaults filled in. Current pools default to
    /// their maximum.
    pub fn stats(&self) -> StatBlock {
        let max_health = self.max_health.unwrap_or(defaults::MAX_HEALTH);
        let max_mana = self.max_mana.unwrap_or(defaults::MAX_MANA);
        StatBlock {
            level: self.level.unwrap_or(defaults::LEVEL),
            current_exp: self.current_exp.unwrap_or(defaults::CURRENT_EXP),
            next_level_exp: self.next_level_exp.unwrap_or(defaults::NEXT_LEVEL_EXP),
            max_health,
            current_health: self.current_health.unwrap_or(max_health),
            max_mana,
            current_mana: self.current_mana.unwrap_or(max_mana),
            attack: self.attack.unwrap_or(defaults::ATTACK),
            defence: self.defence.unwrap_or(defaults::DEFENCE),
        }
    }
}

/// Partial update. Absent fields are left untouched. Permissions are not
/// client-writable.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub level: Option<i64>,
    pub current_exp: Option<i64>,
    pub next_level_exp: Option<i64>,
    pub max_health: Option<i64>,
    pub current_health: Option<i64>,
    pub max_mana: Option<i64>,
    pub current_mana: Option<i64>,
    pub attack: Option<i64>,
    pub defence: Option<i64>,
}

impl fmt::Debug for UpdateCharacterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateCharacterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish_non_exhaustive()
    }
}

impl UpdateCharacterRequest {
    /// Field-level checks only; cross-field checks run against the merged
    /// record via [`StatBlock::validate`].
    pub fn validate(&self) -> Result<(), CharacterError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }

    /// Merge the stat fields into `character`. Identity fields and the
    /// password are handled by the caller.
    pub fn apply_stats(&self, character: &mut Character) {
        let pairs = [
            (&mut character.level, self.level),
            (&mut character.current_exp, self.current_exp),
            (&mut character.next_level_exp, self.next_level_exp),
            (&mut character.max_health, self.max_health),
            (&mut character.current_health, self.current_health),
            (&mut character.max_mana, self.max_mana),
            (&mut character.current_mana, self.current_mana),
            (&mut character.attack, self.attack),
            (&mut character.defence, self.defence),
        ];
        for (field, value) in pairs {
            if let Some(v) = value {
                *field = v;
            }
        }
    }
}

/// Full replacement of every writable field.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReplaceCharacterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub level: i64,
    pub current_exp: i64,
    pub next_level_exp: i64,
    pub max_health: i64,
    pub current_health: i64,
    pub max_mana: i64,
    pub current_mana: i64,
    pub attack: i64,
    pub defence: i64,
}

impl fmt::Debug for ReplaceCharacterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplaceCharacterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"****")
            .field("stats", &self.stats())
            .finish()
    }
}

impl ReplaceCharacterRequest {
    pub fn validate(&self) -> Result<(), CharacterError> {
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        self.stats().validate()
    }

    pub fn stats(&self) -> StatBlock {
        StatBlock {
            level: self.level,
            current_exp: self.current_exp,
            next_level_exp: self.next_level_exp,
            max_health: self.max_health,
            current_health: self.current_health,
            max_mana: self.max_mana,
            current_mana: self.current_mana,
            attack: self.attack,
            defence: self.defence,
        }
    }
}

/// Every mandatory numeric field of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub level: i64,
    pub current_exp: i64,
    pub next_level_exp: i64,
    pub max_health: i64,
    pub current_health: i64,
    pub max_mana: i64,
    pub current_mana: i64,
    pub attack: i64,
    pub defence: i64,
}

impl StatBlock {
    pub fn of(character: &Character) -> Self {
        Self {
            level: character.level,
            current_exp: character.current_exp,
            next_level_exp: character.next_level_exp,
            max_health: character.max_health,
            current_health: character.current_health,
            max_mana: character.max_mana,
            current_mana: character.current_mana,
            attack: character.attack,
            defence: character.defence,
        }
    }

    pub fn apply_to(&self, character: &mut Character) {
        character.level = self.level;
        character.current_exp = self.current_exp;
        character.next_level_exp = self.next_level_exp;
        character.max_health = self.max_health;
        character.current_health = self.current_health;
        character.max_mana = self.max_mana;
        character.current_mana = self.current_mana;
        character.attack = self.attack;
        character.defence = self.defence;
    }

    /// `next_level_exp >= 1` keeps the level-up loop finite; the [`limits`]
    /// keep it short.
    pub fn validate(&self) -> Result<(), CharacterError> {
        use limits::{MAX_EXP, MAX_STAT};

        let invalid = |msg: &str| Err(CharacterError::InvalidInput(msg.to_string()));
        if !(1..=MAX_STAT).contains(&self.level) {
            return invalid("level must be between 1 and 1000000000");
        }
        if !(0..=MAX_EXP).contains(&self.current_exp) {
            return invalid("currentExp must be between 0 and 1000000000000");
        }
        if !(1..=MAX_EXP).contains(&self.next_level_exp) {
            return invalid("nextLevelExp must be between 1 and 1000000000000");
        }
        if !(0..=MAX_STAT).contains(&self.max_health)
            || !(0..=MAX_STAT).contains(&self.max_mana)
        {
            return invalid("maxHealth and maxMana must be between 0 and 1000000000");
        }
        if self.attack.unsigned_abs() > MAX_STAT as u64
            || self.defence.unsigned_abs() > MAX_STAT as u64
        {
            return invalid("attack and defence must be within 1000000000 of zero");
        }
        if !(0..=self.max_health).contains(&self.current_health) {
            return invalid("currentHealth must be between 0 and maxHealth");
        }
        if !(0..=self.max_mana).contains(&self.current_mana) {
            return invalid("currentMana must be between 0 and maxMana");
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), CharacterError> {
    if name.trim().is_empty() {
        return Err(CharacterError::InvalidInput("name cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), CharacterError> {
    if password.is_empty() {
        return Err(CharacterError::InvalidInput(
            "password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Shape check only: one `@` with something on both sides.
pub fn validate_email(email: &str) -> Result<(), CharacterError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CharacterError::InvalidInput(format!(
            "invalid email address: '{email}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_id_display() {
        let id = CharacterId::new();
        let parsed: CharacterId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_create_request_defaults() {
        let req = CreateCharacterRequest::new("Aria", "aria@example.com", "hunter2");
        let stats = req.stats();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.next_level_exp, 100);
        assert_eq!(stats.current_health, stats.max_health);
        assert_eq!(stats.current_mana, stats.max_mana);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_unknown_fields() {
        let json = r#"{"name":"Aria","email":"a@b.c","password":"x","permissions":["ViewAnyUser"]}"#;
        let result: Result<CreateCharacterRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_camel_case_fields() {
        let json = r#"{"name":"Aria","email":"a@b.c","password":"x","currentExp":250,"nextLevelExp":100}"#;
        let req: CreateCharacterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.stats().current_exp, 250);
        assert_eq!(req.stats().next_level_exp, 100);
    }

    #[test]
    fn test_validate_rejects_zero_next_level_exp() {
        let mut req = CreateCharacterRequest::new("Aria", "aria@example.com", "pw");
        req.next_level_exp = Some(0);
        assert!(matches!(
            req.validate(),
            Err(CharacterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_rejects_health_above_max() {
        let mut req = CreateCharacterRequest::new("Aria", "aria@example.com", "pw");
        req.max_health = Some(10);
        req.current_health = Some(11);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_stats() {
        let base = CreateCharacterRequest::new("Aria", "aria@example.com", "pw");

        let mut huge_exp = base.clone();
        huge_exp.current_exp = Some(i64::MAX);
        huge_exp.next_level_exp = Some(i64::MAX);
        assert!(matches!(
            huge_exp.validate(),
            Err(CharacterError::InvalidInput(_))
        ));

        let mut tiny_threshold = base.clone();
        tiny_threshold.current_exp = Some(i64::MAX);
        tiny_threshold.next_level_exp = Some(1);
        assert!(tiny_threshold.validate().is_err());

        let mut strong = base.clone();
        strong.attack = Some(i64::MIN);
        assert!(strong.validate().is_err());

        let mut tough = base.clone();
        tough.max_health = Some(limits::MAX_STAT + 1);
        assert!(tough.validate().is_err());

        let mut edge = base;
        edge.current_exp = Some(limits::MAX_EXP);
        edge.next_level_exp = Some(limits::MAX_EXP);
        edge.attack = Some(-limits::MAX_STAT);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_validate_email_shapes() {
        assert!(validate_email("hero@example.com").is_ok());
        assert!(validate_email("hero").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("hero@").is_err());
        assert!(validate_email("he ro@example.com").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_redact_drops_password_from_json() {
        let now = Utc::now();
        let character = Character {
            id: CharacterId::new(),
            name: "Aria".to_string(),
            email: "aria@example.com".to_string(),
            password: Some("$argon2id$...".to_string()),
            permissions: PermissionSet::standard(),
            level: 1,
            current_exp: 0,
            next_level_exp: 100,
            max_health: 100,
            current_health: 100,
            max_mana: 50,
            current_mana: 50,
            attack: 10,
            defence: 5,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(character.redact()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["nextLevelExp"], 100);
    }

    #[test]
    fn test_update_request_applies_only_present_stats() {
        let now = Utc::now();
        let mut character = Character {
            id: CharacterId::new(),
            name: "Aria".to_string(),
            email: "aria@example.com".to_string(),
            password: None,
            permissions: PermissionSet::standard(),
            level: 1,
            current_exp: 0,
            next_level_exp: 100,
            max_health: 100,
            current_health: 100,
            max_mana: 50,
            current_mana: 50,
            attack: 10,
            defence: 5,
            created_at: now,
            updated_at: now,
        };
        let patch = UpdateCharacterRequest {
            current_exp: Some(40),
            ..Default::default()
        };
        patch.apply_stats(&mut character);
        assert_eq!(character.current_exp, 40);
        assert_eq!(character.attack, 10);
    }

    #[test]
    fn test_replace_request_requires_every_stat() {
        let json = r#"{
            "name": "Aria", "email": "a@b.c", "password": "pw",
            "level": 3, "currentExp": 10, "nextLevelExp": 300,
            "maxHealth": 120, "currentHealth": 90, "maxMana": 60, "currentMana": 60,
            "attack": 16, "defence": 7
        }"#;
        let req: ReplaceCharacterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.stats().level, 3);
        assert_eq!(req.stats().current_health, 90);
        assert!(req.validate().is_ok());

        let missing = r#"{"name": "Aria", "email": "a@b.c", "password": "pw", "level": 3}"#;
        assert!(serde_json::from_str::<ReplaceCharacterRequest>(missing).is_err());
    }
}
