//! Backend entry-point: loads settings, prepares the stores, and serves the
//! record API.

use std::ffi::OsString;
use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use anime_backend::inbound::http::health::HealthState;
use anime_backend::inbound::http::session_config::{BuildMode, session_settings};
use anime_backend::outbound::memory::{InMemoryAnimeRepository, InMemoryCredentialRepository};
use anime_backend::seed::seed_records_on_startup;
use anime_backend::server::{ServerConfig, build_http_state, create_server};
use anime_backend::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let credentials = match settings.credentials_file.as_deref() {
        Some(path) => {
            InMemoryCredentialRepository::from_json_file(path).map_err(std::io::Error::other)?
        }
        None => {
            warn!("no credentials file configured; using fixture users");
            InMemoryCredentialRepository::fixture_users()
        }
    };
    info!(users = credentials.len(), "credentials loaded");

    let http_state = build_http_state(
        Arc::new(InMemoryAnimeRepository::new()),
        Arc::new(credentials),
    );
    if let Some(path) = settings.seed_file.as_deref() {
        seed_records_on_startup(path, http_state.anime_commands.as_ref())
            .await
            .map_err(std::io::Error::other)?;
    }

    let health_state = web::Data::new(HealthState::new());
    let config =
        ServerConfig::from_session(session, settings.bind_addr()).with_http_state(http_state);
    let server = create_server(health_state, config)?;
    server.await
}
