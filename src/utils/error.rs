use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
