//! Authentication primitives: login credentials, stored credentials, roles
//! and the resolved principal.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::collections::BTreeSet;
use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use anime_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for credential lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Authorization label attached to an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// May read records.
    User,
    /// May create, replace and delete records.
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("USER"),
            Self::Admin => f.write_str("ADMIN"),
        }
    }
}

/// Errors raised while validating stored credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was blank once trimmed.
    EmptyUsername,
    /// Password hash was not an Argon2 PHC string.
    InvalidPasswordHash,
    /// Hashing a password failed.
    HashingFailed,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "credential username must not be empty"),
            Self::InvalidPasswordHash => {
                write!(f, "password hash must be an Argon2 PHC string")
            }
            Self::HashingFailed => write!(f, "password could not be hashed"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Salted Argon2 hash of a password, kept as a PHC string such as
/// `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plain-text password with a fresh random salt.
    ///
    /// # Examples
    /// ```
    /// use anime_backend::domain::PasswordHash;
    ///
    /// let hash = PasswordHash::generate("password").expect("hash");
    /// assert!(hash.matches("password"));
    /// assert!(!hash.matches("Password"));
    /// ```
    pub fn generate(password: &str) -> Result<Self, CredentialValidationError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|_| CredentialValidationError::HashingFailed)
    }

    /// Accept an already computed Argon2 PHC string.
    pub fn from_phc(value: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let value = value.into();
        let parsed =
            PhcHash::new(&value).map_err(|_| CredentialValidationError::InvalidPasswordHash)?;
        let argon2_family = Algorithm::new(parsed.algorithm.as_str()).is_ok();
        if !argon2_family || parsed.hash.is_none() {
            return Err(CredentialValidationError::InvalidPasswordHash);
        }
        Ok(Self(value))
    }

    /// Whether `password` verifies against this hash. The comparison runs in
    /// constant time.
    pub fn matches(&self, password: &str) -> bool {
        PhcHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}

impl TryFrom<String> for PasswordHash {
    type Error = CredentialValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_phc(value)
    }
}

/// Stored credential owned by the credential store.
///
/// Deserialises from `{"username": "...", "passwordHash": "...", "roles": ["USER"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "CredentialDto", into = "CredentialDto")]
pub struct Credential {
    username: String,
    password_hash: PasswordHash,
    roles: BTreeSet<Role>,
}

impl Credential {
    /// Build a credential after validating the username.
    pub fn try_new(
        username: impl Into<String>,
        password_hash: PasswordHash,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, CredentialValidationError> {
        let username = username.into().trim().to_owned();
        if username.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        Ok(Self {
            username,
            password_hash,
            roles: roles.into_iter().collect(),
        })
    }

    /// Unique username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Granted roles.
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Identity exposed to the rest of the request once authenticated.
    pub fn to_principal(&self) -> Principal {
        Principal::new(self.username.clone(), self.roles.iter().copied())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialDto {
    username: String,
    password_hash: PasswordHash,
    #[serde(default)]
    roles: BTreeSet<Role>,
}

impl From<Credential> for CredentialDto {
    fn from(value: Credential) -> Self {
        let Credential {
            username,
            password_hash,
            roles,
        } = value;
        Self {
            username,
            password_hash,
            roles,
        }
    }
}

impl TryFrom<CredentialDto> for Credential {
    type Error = CredentialValidationError;

    fn try_from(value: CredentialDto) -> Result<Self, Self::Error> {
        Credential::try_new(value.username, value.password_hash, value.roles)
    }
}

/// Authenticated identity with its resolved role set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    /// Build a principal.
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    /// Authenticated username.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Granted roles.
    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    /// Whether the principal holds at least one of `roles`.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }
}
