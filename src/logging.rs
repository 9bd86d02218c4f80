/// Structured logging for the crag conditions service
///
/// Provides context-rich logging with crag identifiers, timestamps, and
/// severity levels. Supports console output and an append-only log file.
/// Until `init_logger` is called every logging function is a no-op, so the
/// library can be used without any logging setup.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

use crate::model::ConditionsError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConditionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(ConditionsError::Config(format!("unknown log level '{}'", other))),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    OpenMeteo,
    Registry,
    Adapter,
    Simulator,
    Replay,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::OpenMeteo => write!(f, "METEO"),
            DataSource::Registry => write!(f, "CRAGS"),
            DataSource::Adapter => write!(f, "ADAPT"),
            DataSource::Simulator => write!(f, "SIM"),
            DataSource::Replay => write!(f, "REPLAY"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the source simply had nothing for this window
    Expected,
    /// Unexpected failure - indicates service degradation or a bad payload
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        // A poisoned lock only means another thread panicked mid-log.
        let mut slot = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(logger);
    }

    fn log(&self, level: LogLevel, source: &DataSource, crag_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let crag_part = crag_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format_entry(&timestamp.to_string(), level, source, crag_part.as_str(), message);

        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, crag_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, crag_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

fn format_entry(
    timestamp: &str,
    level: LogLevel,
    source: &DataSource,
    crag_part: &str,
    message: &str,
) -> String {
    format!("{} {} {}{}: {}", timestamp, level, source, crag_part, message)
}

fn dispatch(level: LogLevel, source: DataSource, crag_id: Option<&str>, message: &str) {
    let guard = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(logger) = guard.as_ref() {
        logger.log(level, &source, crag_id, message);
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(source: DataSource, crag_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, crag_id, message);
}

/// Log a warning message
pub fn warn(source: DataSource, crag_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, crag_id, message);
}

/// Log an error message
pub fn error(source: DataSource, crag_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, crag_id, message);
}

/// Log a debug message
pub fn debug(source: DataSource, crag_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, crag_id, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a per-crag failure from the error it produced.
pub fn classify_weather_failure(err: &ConditionsError) -> FailureType {
    match err {
        // A payload that decodes but is structurally broken points at an API change.
        ConditionsError::MalformedData(_) => FailureType::Unexpected,
        ConditionsError::UpstreamUnavailable { reason, .. } => {
            if reason.contains("HTTP 5") || reason.contains("timed out") {
                // Service-side outages come and go.
                FailureType::Expected
            } else if reason.contains("HTTP 4") || reason.contains("decode") {
                FailureType::Unexpected
            } else {
                FailureType::Unknown
            }
        }
        ConditionsError::Config(_) => FailureType::Unexpected,
    }
}

/// Log a per-crag failure with automatic classification
pub fn log_weather_failure(crag_id: &str, operation: &str, err: &ConditionsError) {
    let failure_type = classify_weather_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => warn(DataSource::OpenMeteo, Some(crag_id), &message),
        FailureType::Unexpected => error(DataSource::OpenMeteo, Some(crag_id), &message),
        FailureType::Unknown => warn(DataSource::OpenMeteo, Some(crag_id), &message),
    }
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of one pass over the crag registry
pub fn log_run_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Conditions run complete: {}/{} crags simulated, {} without data",
        successful, total, failed
    );

    if failed == 0 {
        info(DataSource::System, None, &message);
    } else if successful == 0 {
        error(DataSource::System, None, &message);
    } else {
        warn(DataSource::System, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parses_env_values() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_failure_classification() {
        let outage = ConditionsError::UpstreamUnavailable {
            crag: "farley".to_string(),
            reason: "HTTP 503 Service Unavailable".to_string(),
        };
        assert_eq!(classify_weather_failure(&outage), FailureType::Expected);

        let bad_request = ConditionsError::UpstreamUnavailable {
            crag: "farley".to_string(),
            reason: "HTTP 400 Bad Request".to_string(),
        };
        assert_eq!(classify_weather_failure(&bad_request), FailureType::Unexpected);

        let malformed = ConditionsError::MalformedData("array 'snowfall' is missing".to_string());
        assert_eq!(classify_weather_failure(&malformed), FailureType::Unexpected);

        let dns = ConditionsError::UpstreamUnavailable {
            crag: "farley".to_string(),
            reason: "request failed: dns error".to_string(),
        };
        assert_eq!(classify_weather_failure(&dns), FailureType::Unknown);
    }

    #[test]
    fn test_entry_format_includes_crag_tag() {
        let entry = format_entry(
            "2024-05-01 12:00:00 UTC",
            LogLevel::Warning,
            &DataSource::OpenMeteo,
            " [farley]",
            "fetch failed",
        );
        assert_eq!(entry, "2024-05-01 12:00:00 UTC WARN METEO [farley]: fetch failed");
    }
}
