//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ANIME_API_*` environment variables and
//! configuration files, in that order of precedence.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings controlling the HTTP server and its stores.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ANIME_API")]
pub struct AppSettings {
    /// Socket address the server binds to.
    pub bind_addr: Option<SocketAddr>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark session cookies `Secure`.
    pub cookie_secure: Option<bool>,
    /// JSON credentials file; fixture users are used when absent.
    pub credentials_file: Option<PathBuf>,
    /// JSON array of `{"name": ...}` records inserted at startup.
    pub seed_file: Option<PathBuf>,
}

impl AppSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)))
    }

    /// Configured session key path, falling back to the secrets mount.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether an unreadable key file may fall back to a generated key.
    /// Off unless configured.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    /// Whether session cookies are marked `Secure`. On unless configured.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "ANIME_API_BIND_ADDR",
        "ANIME_API_SESSION_KEY_FILE",
        "ANIME_API_SESSION_ALLOW_EPHEMERAL",
        "ANIME_API_COOKIE_SECURE",
        "ANIME_API_CREDENTIALS_FILE",
        "ANIME_API_SEED_FILE",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("anime-backend")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(
            settings.session_key_file(),
            Path::new(DEFAULT_SESSION_KEY_FILE)
        );
        assert!(!settings.session_allow_ephemeral());
        assert!(settings.cookie_secure());
        assert!(settings.credentials_file.is_none());
        assert!(settings.seed_file.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("ANIME_API_BIND_ADDR", Some("127.0.0.1:9090".to_owned())),
            ("ANIME_API_SESSION_KEY_FILE", Some("/tmp/key".to_owned())),
            ("ANIME_API_SESSION_ALLOW_EPHEMERAL", Some("true".to_owned())),
            ("ANIME_API_COOKIE_SECURE", Some("false".to_owned())),
            ("ANIME_API_CREDENTIALS_FILE", Some("/etc/anime/users.json".to_owned())),
            ("ANIME_API_SEED_FILE", Some("/etc/anime/seed.json".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.bind_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(settings.session_key_file(), Path::new("/tmp/key"));
        assert!(settings.session_allow_ephemeral());
        assert!(!settings.cookie_secure());
        assert_eq!(
            settings.credentials_file.as_deref(),
            Some(Path::new("/etc/anime/users.json"))
        );
        assert_eq!(
            settings.seed_file.as_deref(),
            Some(Path::new("/etc/anime/seed.json"))
        );
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    #[case(None, true)]
    fn cookie_secure_follows_the_environment(#[case] raw: Option<&str>, #[case] expected: bool) {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "ANIME_API_COOKIE_SECURE")
                .then(|| raw.map(str::to_owned))
                .flatten();
            (name, value)
        }));

        assert_eq!(load_from_empty_args().cookie_secure(), expected);
    }

    #[rstest]
    #[case(Some("true"), true)]
    #[case(None, false)]
    fn ephemeral_keys_are_opt_in(#[case] raw: Option<&str>, #[case] expected: bool) {
        let _guard = lock_env(VARS.map(|name| {
            let value = (name == "ANIME_API_SESSION_ALLOW_EPHEMERAL")
                .then(|| raw.map(str::to_owned))
                .flatten();
            (name, value)
        }));

        assert_eq!(load_from_empty_args().session_allow_ephemeral(), expected);
    }
}
