//! services/portal/src/bin/portal.rs

use clinic_portal_core::Portal;
use portal_lib::{
    adapters::{FileSessionStore, HttpBackend},
    cli::{Console, Shell},
    config::Config,
    error::PortalError,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), PortalError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting portal client...");

    // --- 2. Initialize Adapters ---
    let client = reqwest::Client::builder()
        .user_agent(concat!("clinic-portal/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let backend = Arc::new(HttpBackend::new(
        client,
        &config.api_base,
        config.registration_shape,
        &config.doctor_patients_path,
    ));
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    info!(
        api_base = %config.api_base,
        role_strategy = %config.role_strategy,
        session_file = %config.session_file.display(),
        "Adapters ready"
    );

    // --- 3. Build the Portal & Run the Shell ---
    let console = Arc::new(Console::stdio());
    let portal = Portal::new(backend, store, console.clone(), config.role_strategy);
    Shell::new(portal, console).run().await
}
