use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::orchestrator::{Orchestrator, RunSummary};
use crate::scraper::PageFetcher;
use crate::utils::error::{AppError, Result};

/// Starts a fresh browser for one run.
pub type FetcherLauncher = Arc<dyn Fn() -> Result<Arc<dyn PageFetcher>> + Send + Sync>;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub run_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub skipped_count: u64,
    pub last_run: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

#[derive(Clone)]
struct RunContext {
    orchestrator: Arc<Orchestrator>,
    launcher: FetcherLauncher,
    stats: Arc<RwLock<RunStats>>,
    // Held for the duration of a run so overlapping ticks are skipped
    running: Arc<Mutex<()>>,
}

impl RunContext {
    async fn execute(&self) -> Option<RunSummary> {
        let Ok(_guard) = self.running.try_lock() else {
            tracing::warn!("Previous run still in progress, skipping this tick");
            self.stats.write().await.skipped_count += 1;
            return None;
        };

        tracing::info!("Starting scheduled report run");
        let result = self.run().await;

        let mut stats = self.stats.write().await;
        stats.run_count += 1;
        stats.last_run = Some(Local::now());

        match result {
            Ok(summary) => {
                stats.success_count += 1;
                tracing::info!(
                    products = summary.products_collected,
                    sources_ok = summary.sources_succeeded(),
                    sources_total = summary.sources.len(),
                    "Scheduled run completed"
                );
                Some(summary)
            }
            Err(e) => {
                stats.error_count += 1;
                stats.last_error = Some(e.to_string());
                tracing::error!("Scheduled run failed: {}", e);
                None
            }
        }
    }

    async fn run(&self) -> Result<RunSummary> {
        let launcher = Arc::clone(&self.launcher);
        let fetcher = tokio::task::spawn_blocking(move || launcher())
            .await
            .map_err(|e| AppError::Internal(format!("Browser launch task failed: {}", e)))??;

        self.orchestrator.run(fetcher).await
    }
}

/// Runs the full report pipeline on a cron schedule.
pub struct ReportScheduler {
    scheduler: JobScheduler,
    context: RunContext,
}

impl ReportScheduler {
    pub async fn new(orchestrator: Arc<Orchestrator>, launcher: FetcherLauncher) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            context: RunContext {
                orchestrator,
                launcher,
                stats: Arc::new(RwLock::new(RunStats::default())),
                running: Arc::new(Mutex::new(())),
            },
        })
    }

    /// Register the report run under `cron_expression` (seconds first),
    /// evaluated in local time like the report timestamps.
    pub async fn schedule(&self, cron_expression: &str) -> Result<()> {
        let context = self.context.clone();

        let job = Job::new_async_tz(cron_expression, Local, move |_uuid, _l| {
            let context = context.clone();
            Box::pin(async move {
                context.execute().await;
            })
        })?;

        self.scheduler.add(job).await?;
        tracing::info!("Scheduled report runs with cron: {}", cron_expression);
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        self.scheduler.start().await?;
        tracing::info!("Report scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        tracing::info!("Report scheduler shutdown");
        Ok(())
    }

    pub async fn time_until_next_run(&mut self) -> Result<Option<Duration>> {
        Ok(self.scheduler.time_till_next_job().await?)
    }

    /// Execute a run immediately, outside of the schedule.
    pub async fn run_now(&self) -> Option<RunSummary> {
        self.context.execute().await
    }

    pub async fn stats(&self) -> RunStats {
        self.context.stats.read().await.clone()
    }
}
