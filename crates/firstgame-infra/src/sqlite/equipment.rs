//! SQLite equipment repository implementation.
//!
//! Weapons, armors and skills live in three tables of identical shape; the
//! equipment kind picks the table.

use firstgame_core::repository::equipment::EquipmentRepository;
use firstgame_types::character::CharacterId;
use firstgame_types::equipment::{Equipment, EquipmentId, EquipmentKind};
use firstgame_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

#[derive(Clone)]
pub struct SqliteEquipmentRepository {
    pool: DatabasePool,
}

impl SqliteEquipmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn table(kind: EquipmentKind) -> &'static str {
    match kind {
        EquipmentKind::Weapon => "weapons",
        EquipmentKind::Armor => "armors",
        EquipmentKind::Skill => "skills",
    }
}

fn row_to_equipment(
    kind: EquipmentKind,
    row: &sqlx::sqlite::SqliteRow,
) -> Result<Equipment, RepositoryError> {
    let get_str = |col: &str| -> Result<String, RepositoryError> {
        row.try_get(col)
            .map_err(|e| RepositoryError::Query(e.to_string()))
    };
    let get_i64 = |col: &str| -> Result<i64, RepositoryError> {
        row.try_get(col)
            .map_err(|e| RepositoryError::Query(e.to_string()))
    };

    let id = get_str("id")?
        .parse::<EquipmentId>()
        .map_err(|e| RepositoryError::Query(format!("invalid equipment id: {e}")))?;
    let character_id = get_str("character_id")?
        .parse::<CharacterId>()
        .map_err(|e| RepositoryError::Query(format!("invalid character id: {e}")))?;

    Ok(Equipment {
        id,
        kind,
        name: get_str("name")?,
        attack: get_i64("attack")?,
        defence: get_i64("defence")?,
        character_id,
        created_at: parse_datetime(&get_str("created_at")?)?,
    })
}

impl EquipmentRepository for SqliteEquipmentRepository {
    async fn find_by_character(
        &self,
        kind: EquipmentKind,
        character_id: &CharacterId,
    ) -> Result<Option<Equipment>, RepositoryError> {
        let sql = format!("SELECT * FROM {} WHERE character_id = ?", table(kind));
        let row = sqlx::query(&sql)
            .bind(character_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref()
            .map(|row| row_to_equipment(kind, row))
            .transpose()
    }

    async fn create(&self, equipment: &Equipment) -> Result<Equipment, RepositoryError> {
        let sql = format!(
            "INSERT INTO {} (id, name, attack, defence, character_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            table(equipment.kind)
        );
        let result = sqlx::query(&sql)
            .bind(equipment.id.to_string())
            .bind(&equipment.name)
            .bind(equipment.attack)
            .bind(equipment.defence)
            .bind(equipment.character_id.to_string())
            .bind(format_datetime(&equipment.created_at))
            .execute(&self.pool.writer)
            .await;

        match result {
            Ok(_) => Ok(equipment.clone()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "character {} already has a {}",
                    equipment.character_id, equipment.kind
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn delete_by_character(
        &self,
        kind: EquipmentKind,
        character_id: &CharacterId,
    ) -> Result<u64, RepositoryError> {
        let sql = format!("DELETE FROM {} WHERE character_id = ?", table(kind));
        let result = sqlx::query(&sql)
            .bind(character_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
