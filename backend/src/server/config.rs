//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::inbound::http::access_policy::AccessPolicy;
use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::HttpState;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: Option<HttpState>,
    pub(crate) policy: AccessPolicy,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            http_state: None,
            policy: AccessPolicy::records(),
        }
    }

    /// Construct a configuration from resolved session settings.
    #[must_use]
    pub fn from_session(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self::new(key, cookie_secure, same_site, bind_addr)
    }

    /// Attach the handler state wired to the record and credential stores.
    ///
    /// Without it the server starts with an empty record store and the
    /// fixture users.
    #[must_use]
    pub fn with_http_state(mut self, state: HttpState) -> Self {
        self.http_state = Some(state);
        self
    }

    /// Replace the default access rules.
    #[must_use]
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the access rules the server will enforce.
    #[must_use]
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::Method;
    use rstest::rstest;

    use crate::inbound::http::access_policy::Requirement;

    fn addr() -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], 9000))
    }

    #[rstest]
    fn defaults_to_record_rules_without_state() {
        let config = ServerConfig::new(Key::generate(), false, SameSite::Lax, addr());
        assert_eq!(config.bind_addr(), addr());
        assert!(config.http_state.is_none());
        assert_eq!(
            config.policy().requirement_for(&Method::GET, "/health/ready"),
            &Requirement::PermitAll
        );
    }

    #[rstest]
    fn custom_policy_replaces_defaults() {
        let open = AccessPolicy::builder()
            .any_method("/**", Requirement::PermitAll)
            .build();
        let config =
            ServerConfig::new(Key::generate(), true, SameSite::Strict, addr()).with_policy(open);
        assert_eq!(
            config.policy().requirement_for(&Method::DELETE, "/records/1"),
            &Requirement::PermitAll
        );
    }

    #[rstest]
    fn session_settings_carry_over() {
        let session = SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Strict,
        };
        let config = ServerConfig::from_session(session, addr());
        assert!(!config.cookie_secure);
        assert_eq!(config.same_site, SameSite::Strict);
    }
}
