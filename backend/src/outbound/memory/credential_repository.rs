//! `CredentialRepository` adapter backed by an immutable username index.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{CredentialPersistenceError, CredentialRepository};
use crate::domain::{Credential, PasswordHash, Role};

const FIXTURE_PASSWORD: &str = "password";

/// Errors raised while loading a credentials file.
#[derive(Debug, thiserror::Error)]
pub enum CredentialFileError {
    /// The file could not be opened.
    #[error("failed to open credentials file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not a JSON array of credentials.
    #[error("failed to parse credentials file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Credential store indexed by username.
///
/// When the same username appears twice the later entry wins.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialRepository {
    by_username: HashMap<String, Credential>,
}

impl InMemoryCredentialRepository {
    /// Build a store from `credentials`.
    pub fn new(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let mut by_username = HashMap::new();
        for credential in credentials {
            let username = credential.username().to_owned();
            if by_username.insert(username, credential).is_some() {
                warn!("duplicate username in credential set; keeping the later entry");
            }
        }
        Self { by_username }
    }

    /// Development users: `admin` (ADMIN and USER) and `user` (USER), both
    /// with password `password`.
    pub fn fixture_users() -> Self {
        let hash = match PasswordHash::generate(FIXTURE_PASSWORD) {
            Ok(hash) => hash,
            Err(error) => {
                warn!(%error, "fixture password could not be hashed; no fixture users");
                return Self::new(Vec::new());
            }
        };
        let users = [
            ("admin", vec![Role::Admin, Role::User]),
            ("user", vec![Role::User]),
        ];
        Self::new(users.into_iter().filter_map(|(name, roles)| {
            Credential::try_new(name, hash.clone(), roles).ok()
        }))
    }

    /// Load credentials from a JSON array of
    /// `{"username", "passwordHash", "roles"}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self, CredentialFileError> {
        let file = File::open(path).map_err(|source| CredentialFileError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let credentials: Vec<Credential> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CredentialFileError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(credentials))
    }

    /// Number of distinct usernames.
    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    /// Whether no credentials are registered.
    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, CredentialPersistenceError> {
        Ok(self.by_username.get(username).cloned())
    }
}
