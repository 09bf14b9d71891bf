//! Application wiring and lifecycle.
//!
//! Components are constructed explicitly and shared as `Arc<dyn Trait>`
//! handles: repositories, then the password hasher, then the service, which
//! the router and the cleanup job both use.

use axum::Router;
use messenger_config::{AppConfig, CleanupConfig, SecurityConfig, ServerConfig};
use messenger_core::{MessengerError, MessengerResult};
use messenger_jobs::{InactiveUserCleanupJob, JobResult, Scheduler};
use messenger_repository::{
    create_pool, AddressRepository, DatabasePool, PgAddressRepository, PgUserRepository,
    UserRepository,
};
use messenger_rest::{create_router, AppState};
use messenger_security::{PasswordHasher, PasswordHasherInterface};
use messenger_service::{UserService, UserServiceImpl};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

/// The wired component graph.
#[derive(Clone)]
pub struct AppComponents {
    pub user_repository: Arc<dyn UserRepository>,
    pub user_service: Arc<dyn UserService>,
}

impl AppComponents {
    /// Wires the service over the given repositories and hasher.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        address_repository: Arc<dyn AddressRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
    ) -> Self {
        let user_service: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(
            Arc::clone(&user_repository),
            address_repository,
            password_hasher,
        ));

        Self {
            user_repository,
            user_service,
        }
    }

    /// Wires the PostgreSQL-backed components.
    pub fn from_pool(pool: &Arc<DatabasePool>, security: &SecurityConfig) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(Arc::clone(pool))),
            Arc::new(PgAddressRepository::new(Arc::clone(pool))),
            Arc::new(PasswordHasher::from_config(security)),
        )
    }

    /// Builds the HTTP router.
    pub fn router(&self, server: &ServerConfig) -> Router {
        create_router(AppState::new(Arc::clone(&self.user_service)), server)
    }

    /// Builds the scheduler, with the cleanup job registered when enabled.
    pub fn scheduler(&self, cleanup: &CleanupConfig) -> JobResult<Scheduler> {
        let mut scheduler = Scheduler::new();

        if cleanup.enabled {
            let job = InactiveUserCleanupJob::from_config(
                Arc::clone(&self.user_repository),
                Arc::clone(&self.user_service),
                cleanup,
            );
            scheduler.schedule(InactiveUserCleanupJob::NAME, &cleanup.cron, Arc::new(job))?;
        } else {
            info!("Inactive user cleanup is disabled");
        }

        Ok(scheduler)
    }
}

/// A connected, migrated, wired application.
pub struct Application {
    config: AppConfig,
    pool: Arc<DatabasePool>,
    components: AppComponents,
}

impl Application {
    /// Connects the pool, runs migrations when configured and wires components.
    pub async fn build(config: AppConfig) -> MessengerResult<Self> {
        let pool = create_pool(&config.database).await?;

        if config.database.run_migrations {
            pool.run_migrations().await?;
        }

        let components = AppComponents::from_pool(&pool, &config.security);

        Ok(Self {
            config,
            pool,
            components,
        })
    }

    /// Serves HTTP and runs the scheduler until a shutdown signal arrives.
    pub async fn run(self) -> MessengerResult<()> {
        let scheduler = self
            .components
            .scheduler(&self.config.cleanup)
            .map_err(|e| MessengerError::Configuration(e.to_string()))?;
        let scheduler = Arc::new(scheduler);
        let scheduler_task = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.start().await })
        };

        let router = self.components.router(&self.config.server);
        let addr = self.config.server.addr();
        info!("Starting REST server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| MessengerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        let served = axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| MessengerError::Internal(format!("REST server error: {}", e)));

        scheduler.stop();
        match scheduler_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Scheduler stopped with error"),
            Err(e) => warn!(error = %e, "Scheduler task failed"),
        }

        self.pool.close().await;
        info!("Server shutdown complete");
        served
    }
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messenger_repository::InMemoryStore;

    fn components() -> AppComponents {
        let store = Arc::new(InMemoryStore::new());
        AppComponents::new(
            store.clone(),
            store,
            Arc::new(PasswordHasher::with_cost(1)),
        )
    }

    #[test]
    fn test_scheduler_registers_cleanup_when_enabled() {
        let scheduler = components().scheduler(&CleanupConfig::default()).unwrap();
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_scheduler_is_empty_when_cleanup_disabled() {
        let config = CleanupConfig {
            enabled: false,
            ..CleanupConfig::default()
        };
        assert!(components().scheduler(&config).unwrap().is_empty());
    }

    #[test]
    fn test_scheduler_rejects_invalid_cron() {
        let config = CleanupConfig {
            cron: "nightly".to_string(),
            ..CleanupConfig::default()
        };
        assert!(components().scheduler(&config).is_err());
    }

    #[tokio::test]
    async fn test_components_share_one_store() {
        let components = components();
        let created = components
            .user_service
            .save(messenger_service::CreateUserRequest::new(
                "alice",
                "secret1",
                messenger_core::UserRole::User,
            ))
            .await
            .unwrap();

        assert!(components
            .user_repository
            .exists_by_id(created.id)
            .await
            .unwrap());
    }
}
