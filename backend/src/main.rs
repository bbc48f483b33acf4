//! Backend entry-point: loads settings, applies migrations, and serves the
//! REST API with OpenAPI docs in debug builds.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cleanbee::inbound::http::health::HealthState;
use cleanbee::outbound::gemini::GeminiWasteClassifier;
use cleanbee::outbound::mapbox::MapboxGeocoder;
use cleanbee::outbound::persistence::{DbPool, run_migrations};
use server::{Adapters, AppSettings, BuildMode, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = settings
        .session_settings(BuildMode::from_debug_assertions())
        .wrap_err("failed to resolve session settings")?;
    let bind_addr = settings.bind_addr()?;
    let pool_config = settings.pool_config()?;

    let database_url = pool_config.database_url().to_owned();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")?
        .wrap_err("failed to apply migrations")?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")?;
    let classifier = GeminiWasteClassifier::new(settings.gemini_config()?)
        .wrap_err("failed to build waste classifier")?;
    let geocoder =
        MapboxGeocoder::new(settings.mapbox_config()?).wrap_err("failed to build geocoder")?;

    let config = ServerConfig::new(
        session,
        bind_addr,
        Adapters {
            pool,
            classifier: Arc::new(classifier),
            geocoder: Arc::new(geocoder),
        },
    );
    info!(addr = %config.bind_addr(), "starting server");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
