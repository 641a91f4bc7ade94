use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use hot_picks::config::{self, AppConfig};
use hot_picks::orchestrator::{NotificationStatus, Orchestrator, RunSummary};
use hot_picks::plugins::notifiers::FeishuNotifier;
use hot_picks::plugins::NotifierPlugin;
use hot_picks::scheduler::{FetcherLauncher, ReportScheduler};
use hot_picks::scraper::{ChromeFetcher, PageFetcher};
use hot_picks::utils::logging;

#[derive(Parser)]
#[command(name = "hot-picks", version, about = "Daily trending-product report from Amazon listings")]
struct Cli {
    /// Extra configuration file layered over the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for generated reports
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Skip the webhook notification even when one is configured
    #[arg(long, global = true)]
    no_notify: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape, rank, write the report and notify once
    Run,
    /// Keep running and produce a report on a cron schedule
    Watch {
        /// Cron expression with a leading seconds field
        #[arg(long)]
        cron: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_dir.as_deref())?;

    info!("Starting Hot Picks...");

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let notifier: Option<Arc<dyn NotifierPlugin>> = if cli.no_notify {
        info!("Notifications disabled from the command line");
        None
    } else {
        FeishuNotifier::from_config(&config.notifications.feishu)?
            .map(|notifier| Arc::new(notifier) as Arc<dyn NotifierPlugin>)
    };

    let mut orchestrator = Orchestrator::new(&config, notifier)?;
    if let Some(output_dir) = cli.output_dir {
        orchestrator = orchestrator.with_output_dir(output_dir);
    }
    let orchestrator = Arc::new(orchestrator);

    let scraper_config = config.scraper.clone();
    let launcher: FetcherLauncher = Arc::new(move || {
        ChromeFetcher::launch(scraper_config.clone())
            .map(|fetcher| Arc::new(fetcher) as Arc<dyn PageFetcher>)
    });

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let fetcher = tokio::task::spawn_blocking({
                let launcher = Arc::clone(&launcher);
                move || launcher()
            })
            .await?
            .context("Failed to start the browser")?;

            let summary = orchestrator.run(fetcher).await?;
            log_summary(&summary);
        }
        Command::Watch { cron } => {
            let cron = cron.unwrap_or(config.scheduler.cron);
            if !config::is_valid_cron(&cron) {
                anyhow::bail!("Invalid cron expression: {}", cron);
            }

            let mut scheduler = ReportScheduler::new(orchestrator, launcher).await?;
            scheduler.schedule(&cron).await?;
            scheduler.start().await?;

            tokio::signal::ctrl_c().await?;
            info!("Shutting down...");

            let stats = scheduler.stats().await;
            info!(
                runs = stats.run_count,
                succeeded = stats.success_count,
                failed = stats.error_count,
                skipped = stats.skipped_count,
                "Scheduler statistics"
            );
            scheduler.shutdown().await?;
        }
    }

    Ok(())
}

fn log_summary(summary: &RunSummary) {
    info!(
        products = summary.products_collected,
        top = summary.top_products.len(),
        sources_ok = summary.sources_succeeded(),
        sources_total = summary.sources.len(),
        elapsed_ms = summary.total_time_ms,
        "Run completed"
    );
    info!("Report saved to {}", summary.report.dated.display());
    info!("Latest report at {}", summary.report.latest.display());

    match &summary.notification {
        NotificationStatus::Skipped => info!("Notification skipped"),
        NotificationStatus::Delivered => info!("Notification delivered"),
        NotificationStatus::Rejected(reason) => warn!("Notification rejected: {}", reason),
        NotificationStatus::Failed(reason) => error!("Notification failed: {}", reason),
    }
}
