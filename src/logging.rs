// src/logging.rs

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Destination file. `None` disables logging.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            log_file: None,
        }
    }
}

/// Installs the global subscriber. Call once, before the terminal switches to
/// the alternate screen.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .init();
    Ok(())
}

// RUST_LOG wins over the verbosity flags when set.
fn build_env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,csvboard={}", level).to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_means_no_subscriber() {
        assert!(init_logging(&LogConfig::default()).is_ok());
    }

    #[test]
    fn test_filter_names_crate() {
        let filter = build_env_filter(LevelFilter::DEBUG);
        if std::env::var("RUST_LOG").is_err() {
            assert!(filter.to_string().contains("csvboard=debug"));
        }
    }
}
