//! SQLite character repository implementation.
//!
//! Implements `CharacterRepository` from `firstgame-core` using sqlx with split read/write pools.

use firstgame_core::repository::character::{CharacterFilter, CharacterRepository};
use firstgame_types::character::{Character, CharacterId};
use firstgame_types::error::RepositoryError;
use firstgame_types::permission::PermissionSet;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `CharacterRepository`.
#[derive(Clone)]
pub struct SqliteCharacterRepository {
    pool: DatabasePool,
}

impl SqliteCharacterRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Character.
struct CharacterRow {
    id: String,
    name: String,
    email: String,
    password_hash: String,
    permissions: String,
    level: i64,
    current_exp: i64,
    next_level_exp: i64,
    max_health: i64,
    current_health: i64,
    max_mana: i64,
    current_mana: i64,
    attack: i64,
    defence: i64,
    created_at: String,
    updated_at: String,
}

impl CharacterRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            permissions: row.try_get("permissions")?,
            level: row.try_get("level")?,
            current_exp: row.try_get("current_exp")?,
            next_level_exp: row.try_get("next_level_exp")?,
            max_health: row.try_get("max_health")?,
            current_health: row.try_get("current_health")?,
            max_mana: row.try_get("max_mana")?,
            current_mana: row.try_get("current_mana")?,
            attack: row.try_get("attack")?,
            defence: row.try_get("defence")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_character(self) -> Result<Character, RepositoryError> {
        let id = self
            .id
            .parse::<CharacterId>()
            .map_err(|e| RepositoryError::Query(format!("invalid character id: {e}")))?;

        let permissions: PermissionSet = serde_json::from_str(&self.permissions)
            .map_err(|e| RepositoryError::Query(format!("invalid permissions JSON: {e}")))?;

        Ok(Character {
            id,
            name: self.name,
            email: self.email,
            password: Some(self.password_hash),
            permissions,
            level: self.level,
            current_exp: self.current_exp,
            next_level_exp: self.next_level_exp,
            max_health: self.max_health,
            current_health: self.current_health,
            max_mana: self.max_mana,
            current_mana: self.current_mana,
            attack: self.attack,
            defence: self.defence,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_write_error(e: sqlx::Error, email: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(format!("email '{email}' already exists"))
        }
        other => RepositoryError::Query(other.to_string()),
    }
}

/// `WHERE` clause for the filter's equality conditions. Values are bound in
/// the order email, level.
fn where_clause(filter: &CharacterFilter) -> String {
    let mut conditions = Vec::new();
    if filter.email.is_some() {
        conditions.push("email = ?");
    }
    if filter.level.is_some() {
        conditions.push("level = ?");
    }
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

impl CharacterRepository for SqliteCharacterRepository {
    async fn create(&self, character: &Character) -> Result<Character, RepositoryError> {
        let password_hash = character
            .password
            .as_deref()
            .ok_or_else(|| RepositoryError::Query("character has no credential hash".to_string()))?;
        let permissions_json = serde_json::to_string(&character.permissions)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO characters (id, name, email, password_hash, permissions, level, current_exp, next_level_exp, max_health, current_health, max_mana, current_mana, attack, defence, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(character.id.to_string())
        .bind(&character.name)
        .bind(&character.email)
        .bind(password_hash)
        .bind(&permissions_json)
        .bind(character.level)
        .bind(character.current_exp)
        .bind(character.next_level_exp)
        .bind(character.max_health)
        .bind(character.current_health)
        .bind(character.max_mana)
        .bind(character.current_mana)
        .bind(character.attack)
        .bind(character.defence)
        .bind(format_datetime(&character.created_at))
        .bind(format_datetime(&character.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, &character.email))?;

        Ok(character.clone())
    }

    async fn get_by_id(&self, id: &CharacterId) -> Result<Option<Character>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let character_row = CharacterRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(character_row.into_character()?))
            }
            None => Ok(None),
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Character>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM characters WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let character_row = CharacterRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(character_row.into_character()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self, filter: Option<CharacterFilter>) -> Result<Vec<Character>, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let mut sql = format!("SELECT * FROM characters{}", where_clause(&filter));
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        // SQLite only accepts OFFSET after a LIMIT; -1 means unbounded.
        match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
            (None, Some(offset)) => sql.push_str(&format!(" LIMIT -1 OFFSET {offset}")),
            (None, None) => {}
        }

        let mut query = sqlx::query(&sql);
        if let Some(email) = &filter.email {
            query = query.bind(email);
        }
        if let Some(level) = filter.level {
            query = query.bind(level);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut characters = Vec::with_capacity(rows.len());
        for row in &rows {
            let character_row =
                CharacterRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            characters.push(character_row.into_character()?);
        }

        Ok(characters)
    }

    async fn count(&self, filter: Option<CharacterFilter>) -> Result<i64, RepositoryError> {
        let filter = filter.unwrap_or_default();
        let sql = format!("SELECT COUNT(*) FROM characters{}", where_clause(&filter));

        let mut query = sqlx::query_as::<_, (i64,)>(&sql);
        if let Some(email) = &filter.email {
            query = query.bind(email);
        }
        if let Some(level) = filter.level {
            query = query.bind(level);
        }

        let (count,) = query
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(count)
    }

    async fn update(&self, character: &Character) -> Result<Character, RepositoryError> {
        let permissions_json = serde_json::to_string(&character.permissions)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // A redacted record (no hash) keeps the stored credential.
        let result = sqlx::query(
            "UPDATE characters SET name = ?, email = ?, password_hash = COALESCE(?, password_hash), permissions = ?, level = ?, current_exp = ?, next_level_exp = ?, max_health = ?, current_health = ?, max_mana = ?, current_mana = ?, attack = ?, defence = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&character.name)
        .bind(&character.email)
        .bind(character.password.as_deref())
        .bind(&permissions_json)
        .bind(character.level)
        .bind(character.current_exp)
        .bind(character.next_level_exp)
        .bind(character.max_health)
        .bind(character.current_health)
        .bind(character.max_mana)
        .bind(character.current_mana)
        .bind(character.attack)
        .bind(character.defence)
        .bind(format_datetime(&character.updated_at))
        .bind(character.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, &character.email))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(character.clone())
    }

    async fn delete(&self, id: &CharacterId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
