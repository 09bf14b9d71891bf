//! Inactive user cleanup.

use crate::error::{JobError, JobResult};
use crate::job::ScheduledTask;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use messenger_config::CleanupConfig;
use messenger_repository::UserRepository;
use messenger_service::UserService;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Deletes users whose last visit is older than the inactivity window,
/// together with their addresses.
pub struct InactiveUserCleanupJob {
    user_repository: Arc<dyn UserRepository>,
    user_service: Arc<dyn UserService>,
    inactive_after_days: u32,
}

impl InactiveUserCleanupJob {
    /// Job name used for registration and logs.
    pub const NAME: &'static str = "inactive-user-cleanup";

    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        user_service: Arc<dyn UserService>,
        inactive_after_days: u32,
    ) -> Self {
        Self {
            user_repository,
            user_service,
            inactive_after_days,
        }
    }

    pub fn from_config(
        user_repository: Arc<dyn UserRepository>,
        user_service: Arc<dyn UserService>,
        config: &CleanupConfig,
    ) -> Self {
        Self::new(user_repository, user_service, config.inactive_after_days)
    }

    /// Users last seen strictly before this instant are inactive.
    pub fn threshold(&self, now: DateTime<Utc>) -> JobResult<DateTime<Utc>> {
        now.checked_sub_signed(Duration::days(i64::from(self.inactive_after_days)))
            .ok_or_else(|| {
                JobError::Configuration(format!(
                    "inactivity window of {} days reaches before the earliest representable date",
                    self.inactive_after_days
                ))
            })
    }

    /// Runs one cleanup pass as of `now` and returns the number of deleted users.
    pub async fn run_at(&self, now: DateTime<Utc>) -> JobResult<u64> {
        let threshold = self.threshold(now)?;
        let inactive = self
            .user_repository
            .find_by_last_visit_date_before(threshold)
            .await?;
        debug!("Found {} users inactive since {}", inactive.len(), threshold);

        let mut deleted = 0;
        for user in inactive {
            match self.user_service.delete_user_by_id(user.id).await {
                Ok(()) => deleted += 1,
                Err(e) if e.is_not_found() => {
                    warn!(user_id = %user.id, "Inactive user already deleted, skipping");
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(deleted, %threshold, "Inactive user cleanup finished");
        Ok(deleted)
    }
}

#[async_trait]
impl ScheduledTask for InactiveUserCleanupJob {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn run(&self) -> JobResult<u64> {
        self.run_at(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use messenger_core::{Address, AddressId, User, UserId, UserRole};
    use messenger_repository::InMemoryStore;
    use messenger_security::PasswordHasher;
    use messenger_service::UserServiceImpl;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T02:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn user(id: i64, days_since_visit: i64) -> User {
        let last_visit = now() - Duration::days(days_since_visit);
        User {
            id: UserId(id),
            login: format!("user{id}"),
            password: "hash".to_string(),
            role: UserRole::User,
            create_date: last_visit,
            last_visit_date: last_visit,
        }
    }

    fn address(id: i64, user_id: i64) -> Address {
        Address {
            id: AddressId(id),
            user_id: UserId(user_id),
            country: "Russia".to_string(),
            postal_code: "101000".to_string(),
            city: "Moscow".to_string(),
            street: "Arbat".to_string(),
            house: 1,
            housing: None,
            apartment: None,
        }
    }

    fn service(store: &Arc<InMemoryStore>) -> Arc<dyn UserService> {
        Arc::new(UserServiceImpl::new(
            store.clone(),
            store.clone(),
            Arc::new(PasswordHasher::with_cost(1)),
        ))
    }

    #[test]
    fn test_threshold() {
        let store = Arc::new(InMemoryStore::new());
        let job = InactiveUserCleanupJob::new(store.clone(), service(&store), 1095);
        assert_eq!(job.threshold(now()).unwrap(), now() - Duration::days(1095));
    }

    #[tokio::test]
    async fn test_out_of_range_window_is_a_configuration_error() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(user(1, 2000)).await;

        let job = InactiveUserCleanupJob::new(store.clone(), service(&store), u32::MAX);
        assert!(matches!(job.threshold(now()), Err(JobError::Configuration(_))));
        assert!(matches!(job.run_at(now()).await, Err(JobError::Configuration(_))));
        assert!(store.exists_by_id(UserId(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_deletes_inactive_users_with_addresses() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(user(1, 2000)).await;
        store.insert_user(user(2, 10)).await;
        store.insert_user(user(3, 1096)).await;
        store.insert_address(address(1, 1)).await.unwrap();
        store.insert_address(address(2, 2)).await.unwrap();

        let job = InactiveUserCleanupJob::new(store.clone(), service(&store), 1095);
        let deleted = job.run_at(now()).await.unwrap();

        assert_eq!(deleted, 2);
        assert!(!store.exists_by_id(UserId(1)).await.unwrap());
        assert!(store.exists_by_id(UserId(2)).await.unwrap());
        assert!(!store.exists_by_id(UserId(3)).await.unwrap());
        assert_eq!(store.address_count().await, 1);
    }

    #[tokio::test]
    async fn test_nothing_to_delete() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_user(user(1, 1)).await;

        let job = InactiveUserCleanupJob::new(store.clone(), service(&store), 1095);
        assert_eq!(job.run_at(now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrently_deleted_user_is_skipped() {
        // The lookup sees user 9, which is already gone from the store the
        // service deletes from.
        let stale = Arc::new(InMemoryStore::new());
        stale.insert_user(user(9, 2000)).await;
        stale.insert_user(user(1, 2000)).await;

        let live = Arc::new(InMemoryStore::new());
        live.insert_user(user(1, 2000)).await;

        let job = InactiveUserCleanupJob::new(stale.clone(), service(&live), 1095);
        let deleted = job.run_at(now()).await.unwrap();

        assert_eq!(deleted, 1);
        assert!(!live.exists_by_id(UserId(1)).await.unwrap());
    }
}
