//! Server startup utilities.

use messenger_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    __  ___
   /  |/  /__  ______________  ____  ____ ____  _____
  / /|_/ / _ \/ ___/ ___/ _ \/ __ \/ __ `/ _ \/ ___/
 / /  / /  __(__  |__  )  __/ / / / /_/ /  __/ /
/_/  /_/\___/____/____/\___/_/ /_/\__, /\___/_/
                                 /____/
    "#
    );
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    http://{}/api/users", addr);
    info!("Health:      http://{}/health", addr);
    info!("API Docs:    http://{}/api-docs/openapi.json", addr);
    if config.cleanup.enabled {
        info!("Cleanup:     '{}' ({} days)", config.cleanup.cron, config.cleanup.inactive_after_days);
    } else {
        info!("Cleanup:     disabled");
    }
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        let mut config = AppConfig::default();
        print_startup_info(&config);

        config.cleanup.enabled = false;
        print_startup_info(&config);
    }
}
