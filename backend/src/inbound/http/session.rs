//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers and the access
//! control middleware only deal with the logged-in username. Roles are never
//! stored in the cookie; they are re-resolved from the credential store.

use actix_session::{Session, SessionExt};
use actix_web::dev::{Payload, ServiceRequest};
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::Error;

pub(crate) const USERNAME_KEY: &str = "username";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Session attached to a request still travelling through middleware.
    pub fn from_service_request(req: &ServiceRequest) -> Self {
        Self(req.get_session())
    }

    /// Persist the authenticated username, rotating the session id.
    pub fn persist_username(&self, username: &str) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USERNAME_KEY, username)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Logged-in username, if any.
    ///
    /// A value that cannot be decoded is treated as an anonymous session.
    pub fn username(&self) -> Option<String> {
        match self.0.get::<String>(USERNAME_KEY) {
            Ok(username) => username,
            Err(error) => {
                warn!(%error, "unreadable username in session cookie");
                None
            }
        }
    }

    /// Drop every session value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
