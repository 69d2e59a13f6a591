//! In-process adapters for the record and credential stores.
//!
//! Both stores live entirely in memory and are intended for a single server
//! process. The record store serialises writers behind one lock so batch
//! inserts are all-or-nothing; the credential store is immutable after
//! construction.

mod anime_repository;
mod credential_repository;

pub use anime_repository::InMemoryAnimeRepository;
pub use credential_repository::{CredentialFileError, InMemoryCredentialRepository};
