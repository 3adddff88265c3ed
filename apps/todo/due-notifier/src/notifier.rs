//! One-shot and cron-driven due-task reports.

use axum_helpers::ShutdownCoordinator;
use domain_tasks::{DueTasksReport, TaskRepository, TaskService};
use eyre::Result;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

/// Every five minutes, at second zero
pub const DEFAULT_CRON: &str = "0 */5 * * * *";

pub struct DueNotifier<R: TaskRepository> {
    service: TaskService<R>,
}

impl<R: TaskRepository + 'static> DueNotifier<R> {
    pub fn new(service: TaskService<R>) -> Self {
        Self { service }
    }

    /// Single invocation over the next `window_minutes`.
    pub async fn run_once(&self, window_minutes: i64) -> Result<DueTasksReport> {
        let report = self.service.list_due(Some(window_minutes)).await?;
        info!(
            window_minutes = report.window_minutes,
            count = report.count,
            "Due task report"
        );
        Ok(report)
    }

    /// Run a report on every tick of `cron_expr` until `shutdown` fires.
    pub async fn run_scheduled(
        &self,
        cron_expr: &str,
        window_minutes: i64,
        shutdown: ShutdownCoordinator,
    ) -> Result<()> {
        info!(cron = cron_expr, window_minutes, "Starting scheduled due-task reports");

        let mut sched = JobScheduler::new().await?;
        let service = self.service.clone();

        let job = Job::new_async(cron_expr, move |_uuid, _l| {
            let service = service.clone();

            Box::pin(async move {
                match service.list_due(Some(window_minutes)).await {
                    Ok(report) => {
                        let ids: Vec<String> =
                            report.tasks.iter().map(|t| t.id.to_string()).collect();
                        info!(
                            window_minutes = report.window_minutes,
                            count = report.count,
                            task_ids = ?ids,
                            "Scheduled due-task report"
                        );
                    }
                    Err(e) => {
                        error!(error = %e, "Scheduled due-task report failed");
                    }
                }
            })
        })?;

        sched.add(job).await?;
        sched.start().await?;

        info!("Scheduler started, waiting for jobs...");
        shutdown.cancelled().await;

        info!("Stopping scheduler");
        sched.shutdown().await?;
        Ok(())
    }
}
