//! Authentication against the credential store.
//!
//! Verifies presented passwords against stored Argon2 hashes and resolves
//! role sets. Unknown usernames and wrong passwords produce the same
//! `Unauthorized` failure so callers cannot probe for valid usernames.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CredentialPersistenceError, CredentialRepository, LoginService};
use crate::domain::{Error, LoginCredentials, Principal};

/// Message used for every rejected credential.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// [`LoginService`] backed by a [`CredentialRepository`].
#[derive(Clone)]
pub struct CredentialLoginService<C> {
    credentials: Arc<C>,
}

impl<C> CredentialLoginService<C> {
    /// Create a new service reading from `credentials`.
    pub fn new(credentials: Arc<C>) -> Self {
        Self { credentials }
    }
}

impl<C> CredentialLoginService<C>
where
    C: CredentialRepository,
{
    fn map_persistence_error(error: CredentialPersistenceError) -> Error {
        Error::internal("credential store failure").with_source(&error)
    }
}

#[async_trait]
impl<C> LoginService for CredentialLoginService<C>
where
    C: CredentialRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let stored = self
            .credentials
            .find_by_username(credentials.username())
            .await
            .map_err(Self::map_persistence_error)?;
        match stored {
            Some(credential) if credential.password_hash().matches(credentials.password()) => {
                Ok(credential.to_principal())
            }
            Some(_) => {
                debug!(username = credentials.username(), "password mismatch");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            None => {
                debug!(username = credentials.username(), "unknown username");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }

    async fn principal_for(&self, username: &str) -> Result<Option<Principal>, Error> {
        let stored = self
            .credentials
            .find_by_username(username)
            .await
            .map_err(Self::map_persistence_error)?;
        Ok(stored.map(|credential| credential.to_principal()))
    }
}
