//! Session cookie configuration derived from [`AppSettings`].
//!
//! Release builds insist on a readable signing key of at least 64 bytes
//! unless ephemeral keys are explicitly allowed; debug builds fall back to a
//! generated key with a warning.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

use crate::settings::AppSettings;

const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` needs at least 32 bytes of input.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate a missing key file.
    Debug,
    /// Release builds require a real signing key.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    fn min_key_len(self) -> usize {
        match self {
            Self::Debug => SESSION_KEY_DERIVE_MIN_LEN,
            Self::Release => SESSION_KEY_MIN_LEN,
        }
    }
}

/// Session cookie settings handed to the server.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Resolve session settings for `mode`.
pub fn session_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let key = session_key(settings, mode)?;
    let same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    Ok(SessionSettings {
        key,
        cookie_secure: settings.cookie_secure(),
        same_site,
    })
}

fn session_key(settings: &AppSettings, mode: BuildMode) -> Result<Key, SessionConfigError> {
    let path = settings.session_key_file().to_path_buf();
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = mode.min_key_len();
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || settings.session_allow_ephemeral() => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for session configuration.

    use super::*;
    use rstest::rstest;
    use std::io::Write;

    fn settings_with_key(path: PathBuf, allow_ephemeral: bool) -> AppSettings {
        AppSettings {
            bind_addr: None,
            session_key_file: Some(path),
            session_allow_ephemeral: Some(allow_ephemeral),
            cookie_secure: None,
            credentials_file: None,
            seed_file: None,
        }
    }

    fn key_file(len: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp key file");
        file.write_all(&vec![b'k'; len]).expect("write key");
        file
    }

    #[rstest]
    #[case(BuildMode::Debug, SameSite::Lax)]
    #[case(BuildMode::Release, SameSite::Strict)]
    fn valid_key_files_are_accepted(#[case] mode: BuildMode, #[case] same_site: SameSite) {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let settings = session_settings(&settings_with_key(file.path().to_path_buf(), false), mode)
            .expect("settings");
        assert!(settings.cookie_secure);
        assert_eq!(settings.same_site, same_site);
    }

    #[rstest]
    fn insecure_cookies_are_configurable() {
        let file = key_file(SESSION_KEY_MIN_LEN);
        let mut app_settings = settings_with_key(file.path().to_path_buf(), false);
        app_settings.cookie_secure = Some(false);
        let settings = session_settings(&app_settings, BuildMode::Release).expect("settings");
        assert!(!settings.cookie_secure);
    }

    #[rstest]
    #[case(BuildMode::Release, 48)]
    #[case(BuildMode::Debug, 16)]
    fn short_keys_are_rejected(#[case] mode: BuildMode, #[case] len: usize) {
        let file = key_file(len);
        let result = session_settings(&settings_with_key(file.path().to_path_buf(), false), mode);
        assert!(matches!(
            result,
            Err(SessionConfigError::KeyTooShort { length, .. }) if length == len
        ));
    }

    #[test]
    fn missing_key_is_fatal_in_release() {
        let settings = settings_with_key(PathBuf::from("/nonexistent/session_key"), false);
        let result = session_settings(&settings, BuildMode::Release);
        assert!(matches!(result, Err(SessionConfigError::KeyRead { .. })));
    }

    #[test]
    fn missing_key_falls_back_in_debug() {
        let settings = settings_with_key(PathBuf::from("/nonexistent/session_key"), false);
        assert!(session_settings(&settings, BuildMode::Debug).is_ok());
    }

    #[test]
    fn ephemeral_flag_allows_missing_key_in_release() {
        let settings = settings_with_key(PathBuf::from("/nonexistent/session_key"), true);
        assert!(session_settings(&settings, BuildMode::Release).is_ok());
    }
}
