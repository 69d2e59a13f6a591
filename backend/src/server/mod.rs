//! Server construction and middleware wiring.
//!
//! Middleware runs from the outside in as [`Trace`], [`ErrorTranslator`],
//! the cookie session layer, then [`AccessControl`], so every rejection and
//! handler failure is rendered as an error envelope carrying the trace id.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{build_http_state, fixture_http_state};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::body::MessageBody;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::animes::{
    create_anime, create_animes, delete_anime, get_anime, list_animes, replace_anime,
};
use crate::inbound::http::error::unmatched_route;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::login::{login, logout};
use crate::inbound::http::state::HttpState;
use crate::middleware::{AccessControl, ErrorTranslator, Trace};

/// Everything a worker needs to build its [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub access: AccessControl,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build()
}

/// Build the application with every route and middleware layer attached.
///
/// Requests matching no route fall through to [`unmatched_route`] and are
/// answered with a `404` envelope, after access control has run.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + 'static>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        access,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(access)
        .wrap(session_middleware(key, cookie_secure, same_site))
        .wrap(ErrorTranslator)
        .wrap(Trace)
        .service(list_animes)
        .service(create_animes)
        .service(get_anime)
        .service(create_anime)
        .service(replace_anime)
        .service(delete_anime)
        .service(login)
        .service(logout)
        .service(ready)
        .service(live)
        .default_service(web::to(unmatched_route));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing session, binding, and store settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        http_state,
        policy,
    } = config;
    let http_state = web::Data::new(http_state.unwrap_or_else(|| {
        warn!("no stores configured; serving an empty record store with fixture users");
        fixture_http_state()
    }));
    let access = AccessControl::new(policy);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            access: access.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    info!(%bind_addr, "server listening");
    Ok(server)
}
