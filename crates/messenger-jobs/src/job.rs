//! Scheduled task trait.

use crate::error::JobResult;
use async_trait::async_trait;

/// A unit of recurring work.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Runs the task once and returns the number of affected records.
    async fn run(&self) -> JobResult<u64>;
}
