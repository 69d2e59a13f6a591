//! Driving port for anime record mutations.

use async_trait::async_trait;

use crate::domain::{Anime, AnimeDraft, AnimeId, Error};

/// Domain use-case port for creating, replacing and deleting records.
///
/// Implementations reject blank names with `InvalidRequest` before anything
/// is persisted, and report missing records with `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeCommand: Send + Sync {
    /// Persist a new record and return it with its assigned id.
    async fn save(&self, draft: AnimeDraft) -> Result<Anime, Error>;

    /// Persist a batch; either every record is stored or none is.
    async fn save_all(&self, drafts: Vec<AnimeDraft>) -> Result<Vec<Anime>, Error>;

    /// Replace the record stored under `id`.
    async fn update(&self, id: AnimeId, draft: AnimeDraft) -> Result<(), Error>;

    /// Remove the record stored under `id`.
    async fn delete(&self, id: AnimeId) -> Result<(), Error>;
}
