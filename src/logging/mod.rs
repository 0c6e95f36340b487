//! ## Sets up logging by reading configuration from environment variables.
//!
//! Environment variables used:
//! - LOG_MODE: "stderr" (default), "stdout" or "file"
//! - LOG_LEVEL: log level ("trace", "debug", "info", "warn", "error"); default is "info"
//! - LOG_FILE_PATH: when using file mode, the path of the log file (default "logs/signer.log")

use chrono::{NaiveDate, Utc};
use log::info;
use simplelog::{Config, LevelFilter, SimpleLogger, WriteLogger};
use std::{
    env,
    fs::{create_dir_all, OpenOptions},
    io,
    path::Path,
};

use crate::constants::{DEFAULT_LOG_FILE_PATH, DEFAULT_LOG_LEVEL, DEFAULT_LOG_MODE};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Unable to create log file {path}: {source}")]
    File { path: String, source: io::Error },
    #[error("Failed to initialize logger: {0}")]
    Init(#[from] log::SetLoggerError),
}

/// Maps a `LOG_LEVEL` value to a filter, falling back to `Info`.
pub fn parse_level_filter(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Appends the date to the base path: `logs/signer.log` becomes
/// `logs/signer-2024-01-31.log`.
pub fn compute_rolled_file_path(base_file_path: &str, date: NaiveDate) -> String {
    let date_str = date.format("%Y-%m-%d").to_string();
    match base_file_path.strip_suffix(".log") {
        Some(trimmed) => format!("{}-{}.log", trimmed, date_str),
        None => format!("{}-{}.log", base_file_path, date_str),
    }
}

pub fn setup_logging() -> Result<(), LoggingError> {
    let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| DEFAULT_LOG_MODE.to_string());
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let level_filter = parse_level_filter(&log_level);

    match log_mode.to_lowercase().as_str() {
        "file" => {
            let base_file_path =
                env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
            let rolled_file_path =
                compute_rolled_file_path(&base_file_path, Utc::now().date_naive());

            let file_error = |source| LoggingError::File {
                path: rolled_file_path.clone(),
                source,
            };

            if let Some(parent) = Path::new(&rolled_file_path).parent() {
                create_dir_all(parent).map_err(file_error)?;
            }
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&rolled_file_path)
                .map_err(file_error)?;

            WriteLogger::init(level_filter, Config::default(), log_file)?;
        }
        "stdout" => SimpleLogger::init(level_filter, Config::default())?,
        _ => WriteLogger::init(level_filter, Config::default(), io::stderr())?,
    }

    info!("Logging is successfully configured (mode: {})", log_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_rolled_file_path_with_log_suffix() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(
            compute_rolled_file_path("logs/signer.log", date),
            "logs/signer-2024-01-31.log"
        );
    }

    #[test]
    fn test_compute_rolled_file_path_without_suffix() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(
            compute_rolled_file_path("/var/log/signer", date),
            "/var/log/signer-2024-12-01.log"
        );
    }

    #[test]
    fn test_parse_level_filter() {
        assert_eq!(parse_level_filter("trace"), LevelFilter::Trace);
        assert_eq!(parse_level_filter("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level_filter("warn"), LevelFilter::Warn);
        assert_eq!(parse_level_filter("error"), LevelFilter::Error);
        assert_eq!(parse_level_filter("verbose"), LevelFilter::Info);
    }
}
