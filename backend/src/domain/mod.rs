//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed domain entities used by the API and the
//! record/credential stores, plus the services enforcing their invariants.
//! Keep types immutable and transport agnostic; inbound adapters translate
//! [`Error`] into wire responses.
//!
//! Public surface:
//! - Error / ErrorCode: typed failures and their stable categories.
//! - Anime, AnimeId, AnimeName, AnimeDraft, NewAnime: the record model.
//! - LoginCredentials, Credential, PasswordHash, Role, Principal: identities.
//! - AnimeService, CredentialLoginService: driving port implementations.

pub mod anime;
pub mod anime_service;
pub mod auth;
pub mod credential_login;
pub mod error;
pub mod ports;

pub use self::anime::{
    ANIME_NOT_FOUND, Anime, AnimeDraft, AnimeId, AnimeName, AnimeValidationError, INVALID_NAME,
    NewAnime,
};
pub use self::anime_service::AnimeService;
pub use self::auth::{
    Credential, CredentialValidationError, LoginCredentials, LoginValidationError, PasswordHash,
    Principal, Role,
};
pub use self::credential_login::{CredentialLoginService, INVALID_CREDENTIALS};
pub use self::error::{Error, ErrorCode, ErrorValidationError};

/// HTTP header carrying the per-request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

