use chrono::{Local, NaiveDateTime};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::extractor::ListingExtractor;
use crate::models::{ListingSource, Market, Product};
use crate::plugins::traits::{DigestEvent, NotifierPlugin};
use crate::ranker;
use crate::report::{self, ReportPaths};
use crate::scraper::PageFetcher;
use crate::utils::error::{AppError, Result};

/// What happened to one listing page of one market.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceOutcome {
    Scraped {
        market: String,
        source: ListingSource,
        count: usize,
    },
    Failed {
        market: String,
        source: ListingSource,
        reason: String,
    },
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SourceOutcome::Scraped { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationStatus {
    /// No webhook configured.
    Skipped,
    Delivered,
    Rejected(String),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub generated_at: NaiveDateTime,
    pub products_collected: usize,
    pub top_products: Vec<Product>,
    pub sources: Vec<SourceOutcome>,
    pub report: ReportPaths,
    pub notification: NotificationStatus,
    pub total_time_ms: u64,
}

impl RunSummary {
    pub fn sources_succeeded(&self) -> usize {
        self.sources.iter().filter(|s| s.is_success()).count()
    }
}

/// Visit every market's listings in order, one page at a time. A failed page
/// is recorded and skipped.
pub fn collect_products(
    fetcher: &dyn PageFetcher,
    extractor: &ListingExtractor,
    markets: &[Market],
) -> (Vec<Product>, Vec<SourceOutcome>) {
    let mut products = Vec::new();
    let mut outcomes = Vec::new();

    for market in markets {
        info!(market = %market.name, "Scraping market");

        for source in ListingSource::ALL {
            let url = market.listing_url(source);
            match fetcher.fetch(url) {
                Ok(html) => {
                    let scraped = extractor.extract(&html, source, market);
                    info!(market = %market.name, %source, count = scraped.len(), "Listing scraped");
                    outcomes.push(SourceOutcome::Scraped {
                        market: market.key.clone(),
                        source,
                        count: scraped.len(),
                    });
                    products.extend(scraped);
                }
                Err(e) => {
                    warn!(market = %market.name, %source, url, "Failed to scrape listing: {}", e);
                    outcomes.push(SourceOutcome::Failed {
                        market: market.key.clone(),
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    (products, outcomes)
}

pub struct Orchestrator {
    markets: Arc<Vec<Market>>,
    extractor: Arc<ListingExtractor>,
    notifier: Option<Arc<dyn NotifierPlugin>>,
    output_dir: PathBuf,
    report_url: String,
}

impl Orchestrator {
    pub fn new(config: &AppConfig, notifier: Option<Arc<dyn NotifierPlugin>>) -> Result<Self> {
        Ok(Self {
            markets: Arc::new(config.markets.clone()),
            extractor: Arc::new(ListingExtractor::new(&config.selectors)?),
            notifier,
            output_dir: config.report.output_dir.clone(),
            report_url: config.report.report_url.clone(),
        })
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub async fn run(&self, fetcher: Arc<dyn PageFetcher>) -> Result<RunSummary> {
        self.run_at(fetcher, Local::now().naive_local()).await
    }

    /// One full pass: scrape, rank, render, write, notify. Only report
    /// rendering and writing can fail the run.
    pub async fn run_at(
        &self,
        fetcher: Arc<dyn PageFetcher>,
        generated_at: NaiveDateTime,
    ) -> Result<RunSummary> {
        let start_time = Instant::now();

        let markets = Arc::clone(&self.markets);
        let extractor = Arc::clone(&self.extractor);
        let (products, sources) = tokio::task::spawn_blocking(move || {
            collect_products(fetcher.as_ref(), &extractor, &markets)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Scrape task failed: {}", e)))?;

        let products_collected = products.len();
        info!(products = products_collected, "Collected products");

        let top_products = ranker::top_products(products);
        let html = report::render(&top_products, generated_at)?;
        let report = report::write_reports(&self.output_dir, &html, generated_at.date()).await?;

        let notification = self.notify(&top_products, generated_at).await;

        Ok(RunSummary {
            generated_at,
            products_collected,
            top_products,
            sources,
            report,
            notification,
            total_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    async fn notify(&self, top_products: &[Product], generated_at: NaiveDateTime) -> NotificationStatus {
        let Some(notifier) = &self.notifier else {
            info!("No webhook configured, skipping notification");
            return NotificationStatus::Skipped;
        };

        let event = DigestEvent {
            products: top_products.to_vec(),
            generated_at,
            report_url: self.report_url.clone(),
        };

        match notifier.notify(&event).await {
            Ok(result) if result.success => {
                info!(
                    notifier = notifier.plugin_type(),
                    message_id = result.message_id.as_deref().unwrap_or("-"),
                    "Notification sent via {}",
                    notifier.name()
                );
                NotificationStatus::Delivered
            }
            Ok(result) => {
                let reason = result.error.unwrap_or_else(|| "unknown error".to_string());
                warn!(notifier = notifier.plugin_type(), "Notification rejected: {}", reason);
                NotificationStatus::Rejected(reason)
            }
            Err(e) => {
                warn!(notifier = notifier.plugin_type(), "Notification failed: {}", e);
                NotificationStatus::Failed(e.to_string())
            }
        }
    }
}
