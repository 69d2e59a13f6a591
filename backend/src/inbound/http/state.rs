//! Shared HTTP adapter state.
//!
//! HTTP handlers and the access-control middleware accept this state via
//! `actix_web::web::Data` so they only depend on domain ports and remain
//! testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AnimeCommand, AnimeQuery, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub animes: Arc<dyn AnimeQuery>,
    pub anime_commands: Arc<dyn AnimeCommand>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(
        login: Arc<dyn LoginService>,
        animes: Arc<dyn AnimeQuery>,
        anime_commands: Arc<dyn AnimeCommand>,
    ) -> Self {
        Self {
            login,
            animes,
            anime_commands,
        }
    }
}
