//! Cron scheduler for recurring jobs.

use crate::error::{JobError, JobResult};
use crate::job::ScheduledTask;
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Scheduled job definition.
#[derive(Clone)]
pub struct ScheduledJob {
    /// Unique name for this scheduled job.
    pub name: String,

    /// Cron expression.
    pub cron: String,

    /// Parsed cron schedule.
    schedule: Schedule,

    /// Work to run on every tick.
    task: Arc<dyn ScheduledTask>,
}

impl std::fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("name", &self.name)
            .field("cron", &self.cron)
            .finish_non_exhaustive()
    }
}

impl ScheduledJob {
    /// Create a new scheduled job.
    pub fn new(
        name: impl Into<String>,
        cron_expr: &str,
        task: Arc<dyn ScheduledTask>,
    ) -> JobResult<Self> {
        let schedule = Schedule::from_str(cron_expr)
            .map_err(|e| JobError::Configuration(format!("Invalid cron expression: {}", e)))?;

        Ok(Self {
            name: name.into(),
            cron: cron_expr.to_string(),
            schedule,
            task,
        })
    }

    /// Calculate the next run time after `from`.
    pub fn next_run_from(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&from).next()
    }

    /// Runs the task once, logging the outcome.
    async fn execute(&self) {
        let start = Instant::now();
        debug!(job_name = %self.name, task = self.task.name(), "Running scheduled job");

        match self.task.run().await {
            Ok(affected) => info!(
                job_name = %self.name,
                affected,
                duration_ms = %start.elapsed().as_millis(),
                "Scheduled job completed"
            ),
            Err(e) => error!(
                job_name = %self.name,
                error = %e,
                "Scheduled job failed"
            ),
        }
    }
}

/// Cron scheduler. Every job runs on its own task until [`Scheduler::stop`].
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
    shutdown_tx: watch::Sender<bool>,
    running: AtomicBool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a new scheduler.
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            running: AtomicBool::new(false),
        }
    }

    /// Register a scheduled job.
    pub fn register(&mut self, job: ScheduledJob) {
        info!(job_name = %job.name, cron = %job.cron, "Registered scheduled job");
        self.jobs.push(job);
    }

    /// Register a task with a cron expression.
    pub fn schedule(
        &mut self,
        name: impl Into<String>,
        cron_expr: &str,
        task: Arc<dyn ScheduledTask>,
    ) -> JobResult<()> {
        let job = ScheduledJob::new(name, cron_expr, task)?;
        self.register(job);
        Ok(())
    }

    /// Number of registered jobs.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true when no job is registered.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Start the scheduler. Returns once [`Scheduler::stop`] has been called
    /// and every job loop has exited.
    pub async fn start(&self) -> JobResult<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(JobError::Scheduler("Scheduler already running".to_string()));
        }

        info!(jobs = self.jobs.len(), "Starting scheduler");

        let mut loops = JoinSet::new();
        for job in &self.jobs {
            loops.spawn(run_schedule(job.clone(), self.shutdown_tx.subscribe()));
        }

        while let Some(result) = loops.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Scheduled job loop panicked");
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Scheduler stopped");

        Ok(())
    }

    /// Stop the scheduler.
    pub fn stop(&self) {
        info!("Stopping scheduler...");
        self.shutdown_tx.send_replace(true);
    }
}

async fn run_schedule(job: ScheduledJob, mut shutdown: watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        let now = Utc::now();
        let Some(next_run) = job.next_run_from(now) else {
            warn!(job_name = %job.name, "Schedule has no upcoming runs");
            break;
        };
        let wait = (next_run - now).to_std().unwrap_or(Duration::ZERO);
        debug!(job_name = %job.name, next_run = %next_run, "Waiting for next run");

        tokio::select! {
            _ = shutdown.changed() => break,
            () = tokio::time::sleep(wait) => job.execute().await,
        }
    }

    debug!(job_name = %job.name, "Job loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU64;

    #[derive(Default)]
    struct CountingTask {
        runs: AtomicU64,
    }

    #[async_trait]
    impl ScheduledTask for CountingTask {
        fn name(&self) -> &str {
            "counting"
        }

        async fn run(&self) -> JobResult<u64> {
            Ok(self.runs.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[test]
    fn test_invalid_cron_is_rejected() {
        let result = ScheduledJob::new("broken", "every night", Arc::new(CountingTask::default()));
        assert!(matches!(result, Err(JobError::Configuration(_))));
    }

    #[test]
    fn test_next_run_of_nightly_schedule() {
        let job = ScheduledJob::new(
            "nightly",
            "0 0 2 * * *",
            Arc::new(CountingTask::default()),
        )
        .unwrap();

        let from = DateTime::parse_from_rfc3339("2024-03-10T13:45:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let next = job.next_run_from(from).unwrap();
        assert_eq!(next.to_rfc3339(), "2024-03-11T02:00:00+00:00");
    }

    #[tokio::test]
    async fn test_runs_until_stopped() {
        let task = Arc::new(CountingTask::default());
        let mut scheduler = Scheduler::new();
        scheduler.schedule("every-second", "* * * * * *", task.clone()).unwrap();
        let scheduler = Arc::new(scheduler);

        let runner = {
            let scheduler = Arc::clone(&scheduler);
            tokio::spawn(async move { scheduler.start().await })
        };

        tokio::time::sleep(Duration::from_millis(2500)).await;
        scheduler.stop();

        tokio_test::assert_ok!(runner.await.unwrap());
        assert!(task.runs.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_stop_before_start_exits_immediately() {
        let mut scheduler = Scheduler::new();
        scheduler
            .schedule("nightly", "0 0 2 * * *", Arc::new(CountingTask::default()))
            .unwrap();

        scheduler.stop();
        tokio_test::assert_ok!(scheduler.start().await);
    }
}
