//! Builders wiring the in-memory directory into the group access gateway.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use provisioning::domain::GroupAccessService;
use provisioning::inbound::http::state::HttpState;
use provisioning::outbound::directory::{DirectorySeed, InMemoryDirectory, SeedError};

use super::ServerConfig;

/// Load the configured seed, or the development seed when none is set.
pub(super) fn load_seed(config: &ServerConfig) -> Result<DirectorySeed, SeedError> {
    match &config.directory_seed {
        Some(path) => {
            info!(path = %path.display(), "loading directory seed");
            DirectorySeed::from_path(path)
        }
        None => {
            info!("no directory seed configured; using development seed");
            DirectorySeed::development()
        }
    }
}

fn seeded_directory(config: &ServerConfig) -> std::io::Result<Arc<InMemoryDirectory>> {
    let seed = load_seed(config)
        .map_err(|err| std::io::Error::other(format!("directory seed rejected: {err}")))?;
    let directory = InMemoryDirectory::from_seed(seed);
    if let Ok(groups) = directory.group_count() {
        info!(groups, "group directory ready");
    }
    Ok(Arc::new(directory))
}

/// Build the shared HTTP state over a seeded directory.
///
/// # Errors
/// Returns [`std::io::Error`] when the seed cannot be loaded or Prometheus
/// registration fails.
#[cfg(feature = "metrics")]
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    use provisioning::outbound::metrics::PrometheusGroupAccessMetrics;

    let directory = seeded_directory(config)?;
    let state = match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusGroupAccessMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("group access metrics registration failed: {e}"))
            })?;
            let gateway = Arc::new(GroupAccessService::with_metrics(
                directory.clone(),
                directory.clone(),
                Arc::new(metrics),
            ));
            HttpState::from_gateway(directory, gateway)
        }
        None => {
            let gateway = Arc::new(GroupAccessService::new(directory.clone(), directory.clone()));
            HttpState::from_gateway(directory, gateway)
        }
    };
    Ok(web::Data::new(state))
}

/// Build the shared HTTP state over a seeded directory.
///
/// # Errors
/// Returns [`std::io::Error`] when the seed cannot be loaded.
#[cfg(not(feature = "metrics"))]
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let directory = seeded_directory(config)?;
    let gateway = Arc::new(GroupAccessService::new(directory.clone(), directory.clone()));
    Ok(web::Data::new(HttpState::from_gateway(directory, gateway)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use actix_web::cookie::{Key, SameSite};
    use provisioning::domain::{ActingIdentity, UserId};
    use provisioning::settings::SessionSettings;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    fn config() -> ServerConfig {
        ServerConfig::new(
            SessionSettings {
                key: Key::generate(),
                cookie_secure: false,
                same_site: SameSite::Lax,
            },
            "127.0.0.1:0".parse().expect("address"),
        )
    }

    fn admin() -> ActingIdentity {
        ActingIdentity::new(UserId::new("admin").expect("valid id"))
    }

    #[rstest]
    #[tokio::test]
    async fn development_seed_backs_the_gateway_by_default() {
        let state = build_http_state(&config()).expect("state");
        state
            .admin_gate
            .require_admin(&admin())
            .await
            .expect("development admin is a global admin");
    }

    #[rstest]
    #[tokio::test]
    async fn configured_seed_replaces_the_development_seed() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(
            br#"{"users":[{"id":"ops"}],"groups":[{"id":"admin","members":["ops"]},{"id":"night-shift"}]}"#,
        )
        .expect("write seed");
        let config = config().with_directory_seed(Some(file.path().to_path_buf()));

        let state = build_http_state(&config).expect("state");
        assert!(state.admin_gate.require_admin(&admin()).await.is_err());
        let ops = ActingIdentity::new(UserId::new("ops").expect("valid id"));
        let groups = state
            .groups
            .list_groups(&ops, "night", Default::default())
            .await
            .expect("listing");
        assert_eq!(groups.len(), 1);
    }

    #[rstest]
    fn invalid_seed_fails_startup() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(br#"{"groups":[{"id":"admin","members":["ghost"]}]}"#)
            .expect("write seed");
        let config = config().with_directory_seed(Some(file.path().to_path_buf()));

        assert!(build_http_state(&config).is_err());
    }
}
