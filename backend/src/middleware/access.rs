//! Access-control middleware enforcing an [`AccessPolicy`].
//!
//! For every request the middleware looks up the requirement of the first
//! matching rule. Open routes pass straight through. Guarded routes resolve
//! the caller from an HTTP Basic header or, failing that, from the session
//! username, then apply the rule:
//!
//! - no identity, or a header that does not authenticate: `401`
//! - identity lacking the rule's roles: `403`
//! - otherwise the [`Principal`] is stored in the request extensions.
//!
//! Must run inside the session middleware and with [`HttpState`] registered
//! as app data.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::{Error as DomainError, Principal};
use crate::inbound::http::access_policy::{AccessPolicy, Decision, Requirement};
use crate::inbound::http::auth::{ACCESS_DENIED, AUTHENTICATION_REQUIRED, basic_credentials};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Access-control middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use anime_backend::inbound::http::access_policy::AccessPolicy;
/// use anime_backend::middleware::AccessControl;
///
/// let app = App::new().wrap(AccessControl::new(AccessPolicy::records()));
/// ```
#[derive(Clone, Debug)]
pub struct AccessControl {
    policy: Arc<AccessPolicy>,
}

impl AccessControl {
    /// Enforce `policy` on every request.
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl Default for AccessControl {
    fn default() -> Self {
        Self::new(AccessPolicy::records())
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessControl
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AccessControlMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AccessControlMiddleware {
            service: Rc::new(service),
            policy: Arc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`AccessControl`].
pub struct AccessControlMiddleware<S> {
    service: Rc<S>,
    policy: Arc<AccessPolicy>,
}

async fn resolve_principal(req: &ServiceRequest) -> Result<Option<Principal>, DomainError> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| DomainError::internal("HTTP state is not registered"))?;

    if let Some(credentials) = basic_credentials(req.headers())? {
        return state.login.authenticate(&credentials).await.map(Some);
    }

    let session = SessionContext::from_service_request(req);
    let Some(username) = session.username() else {
        return Ok(None);
    };
    let principal = state.login.principal_for(&username).await?;
    if principal.is_none() {
        warn!(username = %username, "session names an unknown user; clearing it");
        session.clear();
    }
    Ok(principal)
}

async fn authorize(req: &ServiceRequest, requirement: &Requirement) -> Result<(), DomainError> {
    if *requirement == Requirement::PermitAll {
        return Ok(());
    }
    let principal = resolve_principal(req).await?;
    match requirement.decide(principal.as_ref()) {
        Decision::Allow => {
            if let Some(principal) = principal {
                req.extensions_mut().insert(principal);
            }
            Ok(())
        }
        Decision::Unauthenticated => Err(DomainError::unauthorized(AUTHENTICATION_REQUIRED)),
        Decision::Forbidden => {
            debug!(
                username = principal.as_ref().map(Principal::username),
                path = req.path(),
                "role check failed"
            );
            Err(DomainError::forbidden(ACCESS_DENIED))
        }
    }
}

impl<S, B> Service<ServiceRequest> for AccessControlMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = Arc::clone(&self.policy);
        Box::pin(async move {
            let requirement = policy.requirement_for(req.method(), req.path());
            match authorize(&req, requirement).await {
                Ok(()) => service.call(req).await.map(ServiceResponse::map_into_left_body),
                Err(error) => Ok(req.error_response(error).map_into_right_body()),
            }
        })
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;
