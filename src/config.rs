use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::models::Market;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub markets: Vec<Market>,
    pub selectors: SelectorsConfig,
    pub report: ReportConfig,
    pub notifications: NotificationsConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub navigation_timeout_secs: u64,
    pub settle_delay_ms: u64,
    pub scroll_rounds: u32,
    pub scroll_delay_ms: u64,
    pub scroll_step_px: u32,
    pub headless: bool,
    pub user_agent: String,
    pub chrome_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorsConfig {
    pub movers_shakers: ListingSelectors,
    pub best_sellers: ListingSelectors,
}

/// CSS selectors for one listing page. Field selectors are tried in order,
/// the first one yielding non-empty text wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSelectors {
    pub item: String,
    pub max_items: usize,
    pub name: Vec<String>,
    #[serde(default)]
    pub price: Vec<String>,
    #[serde(default)]
    pub growth: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    pub report_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub feishu: FeishuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeishuConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub cron: String,
}

impl ScraperConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }
}

impl AppConfig {
    /// Built-in defaults, then `config_file` if given, then `HOT_PICKS__*` variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let s = builder
            // e.g. HOT_PICKS__REPORT__OUTPUT_DIR=/srv/reports
            .add_source(Environment::with_prefix("HOT_PICKS").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        if config.notifications.feishu.webhook_url.is_none() {
            config.notifications.feishu.webhook_url = env::var("FEISHU_WEBHOOK").ok();
        }
        // An empty variable means "not configured"
        if config
            .notifications
            .feishu
            .webhook_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            config.notifications.feishu.webhook_url = None;
        }

        if config.scraper.chrome_path.is_none() {
            config.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scraper.navigation_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Scraper navigation_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent must not be empty".into()));
        }

        for market in &self.markets {
            if market.name.trim().is_empty() {
                return Err(ConfigError::Message(format!(
                    "Market '{}' must have a display name",
                    market.key
                )));
            }
            for url in [&market.movers_shakers, &market.best_sellers] {
                if Url::parse(url).is_err() {
                    return Err(ConfigError::Message(format!(
                        "Invalid listing URL for market '{}': {}",
                        market.key, url
                    )));
                }
            }
        }

        for (listing, selectors) in [
            ("movers_shakers", &self.selectors.movers_shakers),
            ("best_sellers", &self.selectors.best_sellers),
        ] {
            if selectors.item.trim().is_empty() || selectors.name.is_empty() {
                return Err(ConfigError::Message(format!(
                    "Selectors for {} need an item selector and at least one name selector",
                    listing
                )));
            }
        }

        if Url::parse(&self.report.report_url).is_err() {
            return Err(ConfigError::Message("Invalid report URL format".into()));
        }

        if let Some(webhook_url) = &self.notifications.feishu.webhook_url {
            if Url::parse(webhook_url).is_err() {
                return Err(ConfigError::Message("Invalid Feishu webhook URL format".into()));
            }
        }

        if self.notifications.feishu.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Feishu timeout_secs must be greater than 0".into(),
            ));
        }

        if !is_valid_cron(&self.scheduler.cron) {
            return Err(ConfigError::Message("Invalid cron expression in scheduler.cron".into()));
        }

        Ok(())
    }
}

/// Basic shape check for the scheduler's cron dialect: seconds first, six or
/// seven fields (the optional seventh is the year).
pub fn is_valid_cron(cron_expr: &str) -> bool {
    let parts: Vec<&str> = cron_expr.split_whitespace().collect();
    if parts.len() != 6 && parts.len() != 7 {
        return false;
    }

    parts.iter().all(|part| {
        part.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '*' | '-' | ',' | '/' | '?')
        })
    })
}
