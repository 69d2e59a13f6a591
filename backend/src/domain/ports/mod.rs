//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`AnimeQuery`], [`AnimeCommand`], [`LoginService`]) are
//! called by inbound adapters; driven ports ([`AnimeRepository`],
//! [`CredentialRepository`]) are implemented by outbound adapters. Driven
//! ports expose strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod anime_command;
mod anime_query;
mod anime_repository;
mod credential_repository;
mod login_service;

#[cfg(test)]
pub use anime_command::MockAnimeCommand;
pub use anime_command::AnimeCommand;
#[cfg(test)]
pub use anime_query::MockAnimeQuery;
pub use anime_query::AnimeQuery;
#[cfg(test)]
pub use anime_repository::MockAnimeRepository;
pub use anime_repository::{AnimePersistenceError, AnimeRepository};
#[cfg(test)]
pub use credential_repository::MockCredentialRepository;
pub use credential_repository::{CredentialPersistenceError, CredentialRepository};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
