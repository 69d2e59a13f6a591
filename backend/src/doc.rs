//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every record, session and health endpoint together
//! with the HTTP Basic and session cookie security schemes. The document is
//! served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::Anime;
use crate::inbound::http::animes::AnimePayload;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::login::LoginRequest;

/// Enrich the generated document with the supported security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BasicAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Basic)
                    .description(Some("Username and password from the credential store."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Anime records API",
        description = "Role-guarded CRUD over anime records with a uniform error envelope."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BasicAuth" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::animes::list_animes,
        crate::inbound::http::animes::get_anime,
        crate::inbound::http::animes::create_anime,
        crate::inbound::http::animes::create_animes,
        crate::inbound::http::animes::replace_anime,
        crate::inbound::http::animes::delete_anime,
        crate::inbound::http::login::login,
        crate::inbound::http::login::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Anime, AnimePayload, ErrorBody, LoginRequest)),
    tags(
        (name = "records", description = "Anime record operations"),
        (name = "session", description = "Cookie session login and logout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
