//! Driven port for credential lookups.
//!
//! An absent username is a valid outcome (`Ok(None)`), distinct from a store
//! failure.

use async_trait::async_trait;

use crate::domain::Credential;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "credential store connection failed: {message}",
        /// Lookup failed during execution.
        Query { message: String } => "credential store query failed: {message}",
    }
}

/// Port resolving a username to its stored credential.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Fetch the credential registered for `username`.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, CredentialPersistenceError>;
}
