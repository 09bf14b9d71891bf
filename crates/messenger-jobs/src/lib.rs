//! # Messenger Jobs
//!
//! Cron-scheduled background work. The scheduler runs each registered job on
//! its own tokio task until shutdown; the inactive-user cleanup job deletes
//! users who have not visited within the configured window.

pub mod cleanup;
pub mod error;
pub mod job;
pub mod scheduler;

pub use cleanup::InactiveUserCleanupJob;
pub use error::{JobError, JobResult};
pub use job::ScheduledTask;
pub use scheduler::{ScheduledJob, Scheduler};
