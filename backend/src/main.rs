//! Provisioning server entry-point: loads settings, seeds the group directory
//! and serves the REST API with OpenAPI docs in debug builds.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use provisioning::inbound::http::health::HealthState;
use provisioning::settings::{BuildMode, ServerSettings};
use server::{ServerConfig, create_server};

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Build Prometheus middleware, logging and dropping it on failure so the
/// API still starts.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(build: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "prometheus metrics disabled");
            None
        }
    }
}

fn init_tracing() {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }
}

fn load_config() -> std::io::Result<ServerConfig> {
    let settings = ServerSettings::load()
        .map_err(|error| std::io::Error::other(format!("failed to load settings: {error}")))?;
    let session = settings
        .session_settings(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let config = ServerConfig::new(session, bind_addr)
        .with_directory_seed(settings.directory_seed.clone());

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(server::build_prometheus));

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let config = load_config()?;
    let bind_addr = config.bind_addr;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "provisioning server listening");
    server.await
}
