use headless_chrome::{Browser, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use tracing::debug;

use crate::config::ScraperConfig;
use crate::utils::error::{AppError, Result};

/// Loads a listing page and hands back its rendered DOM.
///
/// Implementations block; callers run them off the async runtime.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Headless Chrome with a single tab reused for every page visit.
pub struct ChromeFetcher {
    // Keeps the browser process alive as long as the tab is in use
    _browser: Browser,
    tab: Arc<Tab>,
    config: ScraperConfig,
}

impl ChromeFetcher {
    pub fn launch(config: ScraperConfig) -> Result<Self> {
        let mut launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false) // Often needed in containerized environments
            .args(vec![
                OsStr::new("--no-sandbox"),
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-extensions"),
            ])
            .build()
            .map_err(|e| AppError::Browser(format!("Failed to create launch options: {}", e)))?;

        if let Some(chrome_path) = &config.chrome_path {
            launch_options.path = Some(std::path::PathBuf::from(chrome_path));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| AppError::Browser(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| AppError::Browser(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| AppError::Browser(format!("Failed to set user agent: {}", e)))?;
        tab.set_default_timeout(config.navigation_timeout());

        Ok(Self {
            _browser: browser,
            tab,
            config,
        })
    }

    /// Scroll down in steps so lazily loaded listing items get rendered.
    fn scroll(&self) -> Result<()> {
        let script = format!("window.scrollBy(0, {})", self.config.scroll_step_px);
        for _ in 0..self.config.scroll_rounds {
            self.tab
                .evaluate(&script, false)
                .map_err(|e| AppError::Scraping(format!("Scroll failed: {}", e)))?;
            std::thread::sleep(self.config.scroll_delay());
        }
        Ok(())
    }
}

impl PageFetcher for ChromeFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "Navigating");

        self.tab
            .navigate_to(url)
            .map_err(|e| AppError::Scraping(format!("Navigation to {} failed: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| AppError::Scraping(format!("Page load of {} failed: {}", url, e)))?;

        std::thread::sleep(self.config.settle_delay());
        self.scroll()?;

        self.tab
            .get_content()
            .map_err(|e| AppError::Scraping(format!("Failed to get page content: {}", e)))
    }
}
