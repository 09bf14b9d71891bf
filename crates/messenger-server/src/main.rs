//! # Messenger Server
//!
//! Entry point: configuration, logging, database, wiring, then serve until
//! Ctrl-C or SIGTERM.

use messenger_config::ConfigLoader;
use messenger_server::app::Application;
use messenger_server::logging::init_logging;
use messenger_server::startup::{print_banner, print_startup_info};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads `.env` before reading the layered configuration.
    let config = ConfigLoader::from_default_location()?.get().await;

    init_logging(&config.observability);
    print_banner();
    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    print_startup_info(&config);

    let app = match Application::build(config).await {
        Ok(app) => app,
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = app.run().await {
        error!("Application error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
