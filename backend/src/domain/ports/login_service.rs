//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: the access-control middleware
//! and the login handler call it to authenticate credentials without knowing
//! the backing credential store.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Principal};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and return the authenticated principal.
    ///
    /// Unknown users and wrong passwords both fail with `Unauthorized`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error>;

    /// Re-resolve a previously authenticated username, e.g. from a session.
    ///
    /// Returns `Ok(None)` once the user no longer exists.
    async fn principal_for(&self, username: &str) -> Result<Option<Principal>, Error>;
}
