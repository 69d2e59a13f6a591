//! Builders wiring store adapters into HTTP handler state.

use std::sync::Arc;

use crate::domain::ports::{AnimeRepository, CredentialRepository};
use crate::domain::{AnimeService, CredentialLoginService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryAnimeRepository, InMemoryCredentialRepository};

/// Build handler state from a record store and a credential store.
///
/// One [`AnimeService`] serves both the query and the command port so reads
/// and writes observe the same records.
pub fn build_http_state<R, C>(records: Arc<R>, credentials: Arc<C>) -> HttpState
where
    R: AnimeRepository + 'static,
    C: CredentialRepository + 'static,
{
    let animes = Arc::new(AnimeService::new(records));
    let login = Arc::new(CredentialLoginService::new(credentials));
    HttpState::new(login, animes.clone(), animes)
}

/// Handler state over an empty record store and the fixture users.
pub fn fixture_http_state() -> HttpState {
    build_http_state(
        Arc::new(InMemoryAnimeRepository::new()),
        Arc::new(InMemoryCredentialRepository::fixture_users()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{AnimeCommand, AnimeQuery, LoginService};
    use crate::domain::{AnimeDraft, AnimeId, LoginCredentials, Role};

    #[tokio::test]
    async fn query_and_command_ports_share_records() {
        let state = fixture_http_state();
        let saved = state
            .anime_commands
            .save(AnimeDraft::new("Mushishi"))
            .await
            .expect("saved");

        let found = state
            .animes
            .find_by_id(saved.id())
            .await
            .expect("visible through the query port");
        assert_eq!(found, saved);
        assert_eq!(saved.id(), AnimeId::new(1));
    }

    #[tokio::test]
    async fn fixture_state_authenticates_fixture_admin() {
        let state = fixture_http_state();
        let creds = LoginCredentials::try_from_parts("admin", "password").expect("shape");

        let principal = state.login.authenticate(&creds).await.expect("admin");
        assert!(principal.has_any_role(&[Role::Admin]));
    }
}
