//! Anime record domain service.
//!
//! Implements the [`AnimeQuery`] and [`AnimeCommand`] driving ports on top of
//! an [`AnimeRepository`]. Names are validated before the store is touched,
//! for single records and batches alike, and every operation that needs an
//! existing record goes through [`AnimeQuery::find_by_id`] so `NotFound` is
//! raised in exactly one place.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::ports::{AnimeCommand, AnimePersistenceError, AnimeQuery, AnimeRepository};
use crate::domain::{
    ANIME_NOT_FOUND, Anime, AnimeDraft, AnimeId, Error, INVALID_NAME, NewAnime,
};

/// Record service implementing the anime driving ports.
#[derive(Clone)]
pub struct AnimeService<R> {
    repository: Arc<R>,
}

impl<R> AnimeService<R> {
    /// Create a new service backed by `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> AnimeService<R>
where
    R: AnimeRepository,
{
    fn map_persistence_error(error: AnimePersistenceError) -> Error {
        Error::internal("anime store failure").with_source(&error)
    }

    fn invalid_name() -> Error {
        Error::invalid_request(INVALID_NAME)
    }

    fn validate(draft: AnimeDraft) -> Result<NewAnime, Error> {
        NewAnime::try_from(draft).map_err(|_| Self::invalid_name())
    }

    fn validate_batch(drafts: Vec<AnimeDraft>) -> Result<Vec<NewAnime>, Error> {
        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                NewAnime::try_from(draft).map_err(|err| {
                    warn!(index, error = %err, "rejecting anime batch");
                    Self::invalid_name().with_details(json!({ "index": index }))
                })
            })
            .collect()
    }
}

#[async_trait]
impl<R> AnimeQuery for AnimeService<R>
where
    R: AnimeRepository,
{
    async fn find_all(&self) -> Result<Vec<Anime>, Error> {
        self.repository
            .find_all()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn find_by_id(&self, id: AnimeId) -> Result<Anime, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found(ANIME_NOT_FOUND))
    }
}

#[async_trait]
impl<R> AnimeCommand for AnimeService<R>
where
    R: AnimeRepository,
{
    async fn save(&self, draft: AnimeDraft) -> Result<Anime, Error> {
        let anime = Self::validate(draft)?;
        let stored = self
            .repository
            .insert(anime)
            .await
            .map_err(Self::map_persistence_error)?;
        debug!(id = %stored.id(), "anime saved");
        Ok(stored)
    }

    async fn save_all(&self, drafts: Vec<AnimeDraft>) -> Result<Vec<Anime>, Error> {
        let animes = Self::validate_batch(drafts)?;
        let stored = self
            .repository
            .insert_all(animes)
            .await
            .map_err(Self::map_persistence_error)?;
        debug!(count = stored.len(), "anime batch saved");
        Ok(stored)
    }

    async fn update(&self, id: AnimeId, draft: AnimeDraft) -> Result<(), Error> {
        let existing = self.find_by_id(id).await?;
        let anime = Self::validate(draft)?.into_anime(existing.id());
        self.repository
            .update(&anime)
            .await
            .map_err(|error| match error {
                // Deleted between the lookup and the write.
                AnimePersistenceError::Missing { .. } => Error::not_found(ANIME_NOT_FOUND),
                other => Self::map_persistence_error(other),
            })
    }

    async fn delete(&self, id: AnimeId) -> Result<(), Error> {
        let existing = self.find_by_id(id).await?;
        self.repository
            .delete(existing.id())
            .await
            .map_err(Self::map_persistence_error)
    }
}

#[cfg(test)]
#[path = "anime_service_tests.rs"]
mod tests;
