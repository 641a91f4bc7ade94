pub mod advisor;
pub mod config;
pub mod extractor;
pub mod models;
pub mod orchestrator;
pub mod plugins;
pub mod ranker;
pub mod report;
pub mod scheduler;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use orchestrator::{Orchestrator, RunSummary};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
