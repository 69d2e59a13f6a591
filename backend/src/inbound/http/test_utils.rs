//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;

use crate::domain::ports::{MockAnimeCommand, MockAnimeQuery, MockLoginService};
use crate::domain::{Principal, Role};
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Principal holding both roles.
pub fn admin_principal() -> Principal {
    Principal::new("admin", [Role::Admin, Role::User])
}

/// Principal holding only `USER`.
pub fn user_principal() -> Principal {
    Principal::new("user", [Role::User])
}

/// Handler state backed by the supplied mocks.
pub fn mock_state(
    login: MockLoginService,
    query: MockAnimeQuery,
    command: MockAnimeCommand,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        Arc::new(login),
        Arc::new(query),
        Arc::new(command),
    ))
}
