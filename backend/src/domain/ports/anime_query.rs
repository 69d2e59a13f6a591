//! Driving port for anime record reads.
//!
//! Inbound adapters use this port to read records without importing the
//! record store.

use async_trait::async_trait;

use crate::domain::{Anime, AnimeId, Error};

/// Domain use-case port for reading records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeQuery: Send + Sync {
    /// Every stored record; possibly empty.
    async fn find_all(&self) -> Result<Vec<Anime>, Error>;

    /// The record with `id`, or a `NotFound` failure.
    async fn find_by_id(&self, id: AnimeId) -> Result<Anime, Error>;
}
