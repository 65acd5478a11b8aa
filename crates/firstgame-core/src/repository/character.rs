//! Character repository trait definition.

use firstgame_types::character::{Character, CharacterId};
use firstgame_types::error::RepositoryError;

/// Filter criteria for listing and counting characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterFilter {
    /// Exact email match.
    pub email: Option<String>,
    /// Exact level match.
    pub level: Option<i64>,
    /// Maximum number of results (list only).
    pub limit: Option<i64>,
    /// Number of results to skip (list only).
    pub offset: Option<i64>,
}

/// Repository trait for character persistence.
///
/// Records returned here still carry the stored credential hash; services
/// redact it before handing characters out.
pub trait CharacterRepository: Send + Sync {
    /// Insert a new character. Fails with `Conflict` when the email is taken.
    fn create(
        &self,
        character: &Character,
    ) -> impl std::future::Future<Output = Result<Character, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<Option<Character>, RepositoryError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Character>, RepositoryError>> + Send;

    /// List characters ordered by creation time.
    fn list(
        &self,
        filter: Option<CharacterFilter>,
    ) -> impl std::future::Future<Output = Result<Vec<Character>, RepositoryError>> + Send;

    /// Count characters matching the filter (pagination fields are ignored).
    fn count(
        &self,
        filter: Option<CharacterFilter>,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Overwrite an existing character. `NotFound` if the id is unknown,
    /// `Conflict` if the new email belongs to another character.
    fn update(
        &self,
        character: &Character,
    ) -> impl std::future::Future<Output = Result<Character, RepositoryError>> + Send;

    fn delete(
        &self,
        id: &CharacterId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
