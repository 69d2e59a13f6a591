//! Middleware rendering every failure as an [`ErrorBody`].
//!
//! Handlers, extractors and inner middleware report failures either as an
//! `Err` or as a response with an attached error. Both are rendered here
//! into the JSON envelope produced by
//! [`render_failure`](crate::inbound::http::error::render_failure), so this
//! is the only place error bodies are written. An `Err` stays an `Err` but
//! carries the rendered envelope as its response.
//!
//! [`ErrorBody`]: crate::inbound::http::error::ErrorBody

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::http::header::SET_COOKIE;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::inbound::http::error::{Failure, render_failure};

/// Error translation middleware. Wrap it outside access control so
/// authentication failures are rendered too.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use anime_backend::middleware::ErrorTranslator;
///
/// let app = App::new().wrap(ErrorTranslator);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorTranslator;

impl<S, B> Transform<S, ServiceRequest> for ErrorTranslator
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorTranslatorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorTranslatorMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`ErrorTranslator`].
pub struct ErrorTranslatorMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ErrorTranslatorMiddleware<S>
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
        // The request must have a single owner while the router runs.
        let path = req.path().to_owned();
        let query = req.query_string().to_owned();
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            match service.call(req).await {
                Ok(res) => {
                    let failure = res.response().error().map(Failure::from_actix);
                    match failure {
                        Some(failure) => {
                            let (request, original) = res.into_parts();
                            let mut response = render_failure(&path, &query, &failure);
                            keep_cookies(&original, &mut response);
                            Ok(ServiceResponse::new(request, response).map_into_right_body())
                        }
                        None => Ok(res.map_into_left_body()),
                    }
                }
                Err(error) => {
                    let failure = Failure::from_actix(&error);
                    let response = render_failure(&path, &query, &failure);
                    Err(InternalError::from_response(error, response).into())
                }
            }
        })
    }
}

/// Carry cookies set by inner layers, such as a session purge, onto the
/// rendered envelope.
fn keep_cookies<B>(original: &HttpResponse<B>, rendered: &mut HttpResponse) {
    for cookie in original.headers().get_all(SET_COOKIE) {
        rendered.headers_mut().append(SET_COOKIE, cookie.clone());
    }
}
