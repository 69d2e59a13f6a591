//! Driven port for the anime record store.
//!
//! The store owns id assignment and its own consistency discipline. Callers
//! only hand it validated records, so an empty name can never reach an
//! adapter through this port.

use async_trait::async_trait;

use crate::domain::{Anime, AnimeId, NewAnime};

use super::define_port_error;

define_port_error! {
    /// Errors raised by anime record store adapters.
    pub enum AnimePersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "anime store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "anime store query failed: {message}",
        /// The record addressed by a mutation no longer exists.
        Missing { id: AnimeId } => "record {id} does not exist",
    }
}

/// Port for reading and writing anime records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnimeRepository: Send + Sync {
    /// Every stored record, ordered by id.
    async fn find_all(&self) -> Result<Vec<Anime>, AnimePersistenceError>;

    /// Look a record up by id.
    async fn find_by_id(&self, id: AnimeId) -> Result<Option<Anime>, AnimePersistenceError>;

    /// Insert a record and return it with its assigned id.
    async fn insert(&self, anime: NewAnime) -> Result<Anime, AnimePersistenceError>;

    /// Insert a batch atomically, returning the stored records in input order.
    async fn insert_all(&self, animes: Vec<NewAnime>) -> Result<Vec<Anime>, AnimePersistenceError>;

    /// Replace an existing record, failing with
    /// [`AnimePersistenceError::Missing`] when it is gone.
    async fn update(&self, anime: &Anime) -> Result<(), AnimePersistenceError>;

    /// Remove a record by id.
    async fn delete(&self, id: AnimeId) -> Result<(), AnimePersistenceError>;
}
