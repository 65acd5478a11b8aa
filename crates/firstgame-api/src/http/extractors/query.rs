//! Query parameter extractors.

use serde::Deserialize;

use firstgame_core::repository::character::CharacterFilter;

/// Query parameters for the character list endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct CharacterListQuery {
    /// Exact email match.
    pub email: Option<String>,
    /// Exact level match.
    pub level: Option<i64>,
    /// Maximum results.
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

impl CharacterListQuery {
    pub fn into_filter(self) -> CharacterFilter {
        CharacterFilter {
            email: self.email,
            level: self.level,
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Query parameters for `GET /characters/count`.
#[derive(Debug, Deserialize, Default)]
pub struct CountQuery {
    pub email: Option<String>,
    pub level: Option<i64>,
}

impl CountQuery {
    pub fn into_filter(self) -> CharacterFilter {
        CharacterFilter {
            email: self.email,
            level: self.level,
            ..Default::default()
        }
    }
}

/// `POST /admin?admin_code=...`
#[derive(Deserialize, Default)]
pub struct AdminQuery {
    pub admin_code: Option<String>,
}
