//! Anime record data model.
//!
//! A record is created from an unvalidated [`AnimeDraft`], validated into a
//! [`NewAnime`] and assigned an [`AnimeId`] by the record store, producing an
//! [`Anime`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Message carried by the failure raised when a record does not exist.
pub const ANIME_NOT_FOUND: &str = "Anime not found";
/// Message carried by the failure raised for a blank record name.
pub const INVALID_NAME: &str = "Invalid Name";

/// Validation errors returned by the anime constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimeValidationError {
    EmptyName,
}

impl fmt::Display for AnimeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "anime name must not be empty"),
        }
    }
}

impl std::error::Error for AnimeValidationError {}

/// Store-assigned integer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimeId(i32);

impl AnimeId {
    /// Wrap a raw identifier.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for AnimeId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record name.
///
/// ## Invariants
/// - Must be non-empty once trimmed of whitespace. The original spelling,
///   including surrounding whitespace, is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnimeName(String);

impl AnimeName {
    /// Validate and construct an [`AnimeName`].
    ///
    /// # Examples
    /// ```
    /// use anime_backend::domain::AnimeName;
    ///
    /// assert!(AnimeName::new("Mushishi").is_ok());
    /// assert!(AnimeName::new("  ").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, AnimeValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AnimeValidationError::EmptyName);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for AnimeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AnimeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AnimeName> for String {
    fn from(value: AnimeName) -> Self {
        value.0
    }
}

impl TryFrom<String> for AnimeName {
    type Error = AnimeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unvalidated record content as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeDraft {
    pub name: String,
}

impl AnimeDraft {
    /// Build a draft from a raw name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Validated record awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnime {
    name: AnimeName,
}

impl NewAnime {
    /// Wrap an already validated name.
    pub fn new(name: AnimeName) -> Self {
        Self { name }
    }

    /// Record name.
    pub fn name(&self) -> &AnimeName {
        &self.name
    }

    /// Attach the identifier assigned by the store.
    pub fn into_anime(self, id: AnimeId) -> Anime {
        Anime::new(id, self.name)
    }
}

impl TryFrom<AnimeDraft> for NewAnime {
    type Error = AnimeValidationError;

    fn try_from(value: AnimeDraft) -> Result<Self, Self::Error> {
        AnimeName::new(value.name).map(Self::new)
    }
}

/// Persisted anime record.
///
/// Serialises as `{"id": 1, "name": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Anime {
    #[schema(value_type = i32, example = 1)]
    id: AnimeId,
    #[schema(value_type = String, example = "Tensei Shitara Slime Datta Ken")]
    name: AnimeName,
}

impl Anime {
    /// Build a record from validated components.
    pub fn new(id: AnimeId, name: AnimeName) -> Self {
        Self { id, name }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> AnimeId {
        self.id
    }

    /// Record name.
    pub fn name(&self) -> &AnimeName {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_names_are_rejected(#[case] raw: &str) {
        assert_eq!(AnimeName::new(raw), Err(AnimeValidationError::EmptyName));
        assert_eq!(
            NewAnime::try_from(AnimeDraft::new(raw)),
            Err(AnimeValidationError::EmptyName)
        );
    }

    #[rstest]
    #[case("Tensei Shitara Slime Datta Ken")]
    #[case(" Mushishi ")]
    fn names_keep_their_spelling(#[case] raw: &str) {
        let name = AnimeName::new(raw).expect("valid name");
        assert_eq!(name.as_ref(), raw);
    }

    #[rstest]
    fn new_anime_receives_store_id() {
        let draft = NewAnime::try_from(AnimeDraft::new("Haikyuu")).expect("valid draft");
        let anime = draft.into_anime(AnimeId::new(7));
        assert_eq!(anime.id().get(), 7);
        assert_eq!(anime.name().as_ref(), "Haikyuu");
    }

    #[rstest]
    fn anime_serialises_flat() {
        let anime = Anime::new(AnimeId::new(1), AnimeName::new("Frieren").expect("name"));
        let value = serde_json::to_value(&anime).expect("serialise anime");
        assert_eq!(value, json!({"id": 1, "name": "Frieren"}));
    }

    #[rstest]
    fn deserialising_blank_name_fails() {
        let result = serde_json::from_value::<Anime>(json!({"id": 1, "name": ""}));
        assert!(result.is_err());
    }
}
