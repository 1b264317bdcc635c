//! Tracing subscriber setup
//!
//! The library only emits `tracing` events; applications decide where they
//! go. These helpers install a `tracing-subscriber` formatter for the common
//! cases.
//!
//! ```rust,ignore
//! // VEO_LOG_LEVEL=debug VEO_LOG_FORMAT=json
//! let _guard = veo_story::telemetry::init_from_env()?;
//! ```

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::VeoError;

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    Json,
    JsonCompact,
}

impl std::str::FromStr for OutputFormat {
    type Err = VeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "json-compact" => Ok(Self::JsonCompact),
            _ => Err(VeoError::ConfigurationError(format!(
                "Invalid log format: {s}. Valid options: text, json, json-compact"
            ))),
        }
    }
}

/// Where and how `veo_story` events are written.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub log_level: tracing::Level,
    pub output_format: OutputFormat,
    /// Log to stdout. Ignored when `log_file` is set.
    pub enable_console: bool,
    /// Append logs to this file instead of the console.
    pub log_file: Option<std::path::PathBuf>,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            output_format: OutputFormat::Text,
            enable_console: true,
            log_file: None,
        }
    }
}

fn parse_level(level: &str) -> Result<tracing::Level, VeoError> {
    level.trim().parse().map_err(|_| {
        VeoError::ConfigurationError(format!(
            "Invalid log level: {level}. Valid options: trace, debug, info, warn, error"
        ))
    })
}

fn env_filter(level: tracing::Level) -> EnvFilter {
    let level = level.as_str().to_lowercase();
    EnvFilter::new(format!("veo_story={level}"))
}

/// Initialize the global tracing subscriber.
///
/// Returns the appender guard when logging to a file; keep it alive for the
/// lifetime of the program or buffered lines are lost. An already installed
/// global subscriber is not an error.
pub fn init_subscriber(config: SubscriberConfig) -> Result<Option<WorkerGuard>, VeoError> {
    let (writer, guard) = match &config.log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                VeoError::ConfigurationError(format!("Invalid log file path: {}", path.display()))
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (writer, Some(guard))
        }
        None if config.enable_console => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
            (writer, Some(guard))
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::sink());
            (writer, Some(guard))
        }
    };

    let filter = env_filter(config.log_level);
    let init_result = match config.output_format {
        OutputFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .json()
            .try_init(),
        OutputFormat::JsonCompact => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_target(true)
            .json()
            .flatten_event(true)
            .try_init(),
        OutputFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_target(true)
            .with_ansi(config.log_file.is_none())
            .try_init(),
    };

    // `try_init` only fails when a global subscriber or `log` logger is already set.
    match init_result {
        Ok(()) => Ok(guard),
        Err(_) => Ok(None),
    }
}

pub fn init_default() -> Result<Option<WorkerGuard>, VeoError> {
    init_subscriber(SubscriberConfig::default())
}

/// Initialize tracing subscriber from environment variables
///
/// - `VEO_LOG_LEVEL`: trace, debug, info, warn, error
/// - `VEO_LOG_FORMAT`: text, json, json-compact
/// - `VEO_LOG_FILE`: log file path
pub fn init_from_env() -> Result<Option<WorkerGuard>, VeoError> {
    init_subscriber(config_from_env()?)
}

fn config_from_env() -> Result<SubscriberConfig, VeoError> {
    let mut config = SubscriberConfig::default();

    if let Ok(level) = std::env::var("VEO_LOG_LEVEL") {
        config.log_level = parse_level(&level)?;
    }
    if let Ok(format) = std::env::var("VEO_LOG_FORMAT") {
        config.output_format = format.parse()?;
    }
    if let Ok(file_path) = std::env::var("VEO_LOG_FILE") {
        config.log_file = Some(std::path::PathBuf::from(file_path));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_and_formats() {
        assert_eq!(parse_level("debug").unwrap(), tracing::Level::DEBUG);
        assert!(parse_level("loud").is_err());
        assert_eq!(
            "json-compact".parse::<OutputFormat>().unwrap(),
            OutputFormat::JsonCompact
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn filter_targets_this_crate() {
        assert_eq!(
            env_filter(tracing::Level::WARN).to_string(),
            "veo_story=warn"
        );
    }

    #[test]
    fn log_file_path_without_name_is_rejected() {
        let cfg = SubscriberConfig {
            log_file: Some("/".into()),
            ..SubscriberConfig::default()
        };
        assert!(matches!(
            init_subscriber(cfg),
            Err(VeoError::ConfigurationError(_))
        ));
    }
}
