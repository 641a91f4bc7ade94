use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::utils::error::{AppError, Result};

const LOG_FILE_PREFIX: &str = "hot-picks.log";

/// Install the global subscriber. Console output always; a daily rolling file
/// under `log_dir` when one is given. Keep the returned guard alive for the
/// whole process or buffered file lines are lost on exit.
pub fn init(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::from_default_env().add_directive(
        "hot_picks=debug"
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid log directive: {}", e)))?,
    );

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(guard)
}
