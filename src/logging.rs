/// Structured logging for the air quality pipeline.
///
/// Provides context-rich logging with data-source and site identifiers,
/// timestamps, and severity levels. Supports both console output and
/// file-based logging for long-running host processes.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

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

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    OpenAq,
    Waqi,
    Config,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::OpenAq => write!(f, "OPENAQ"),
            DataSource::Waqi => write!(f, "WAQI"),
            DataSource::Config => write!(f, "CFG"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - a station may be offline or not reporting
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
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

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, source: DataSource, site_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let site_part = site_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, site_part, message
        );

        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info => println!("{}", log_entry),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, site_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, site_part, message),
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

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger. Logging is a no-op until this is called,
/// so library consumers that want silence simply never initialize it.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn with_logger(level: LogLevel, source: DataSource, site_id: Option<&str>, message: &str) {
    if let Ok(slot) = LOGGER.lock() {
        if let Some(logger) = slot.as_ref() {
            logger.log(level, source, site_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: DataSource, site_id: Option<&str>, message: &str) {
    with_logger(LogLevel::Info, source, site_id, message);
}

/// Log a warning message
pub fn warn(source: DataSource, site_id: Option<&str>, message: &str) {
    with_logger(LogLevel::Warning, source, site_id, message);
}

/// Log an error message
pub fn error(source: DataSource, site_id: Option<&str>, message: &str) {
    with_logger(LogLevel::Error, source, site_id, message);
}

/// Log a debug message
pub fn debug(source: DataSource, site_id: Option<&str>, message: &str) {
    with_logger(LogLevel::Debug, source, site_id, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an OpenAQ fetch/parse failure based on the error message.
pub fn classify_openaq_failure(error_message: &str) -> FailureType {
    // 404/410 for a country with no active stations is a known condition.
    if error_message.contains("No data available") {
        FailureType::Expected
    } else if error_message.contains("HTTP error") {
        FailureType::Unexpected
    }
    // Parse errors suggest API changes or relay bugs.
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Classify a WAQI fetch/parse failure.
pub fn classify_waqi_failure(error_message: &str) -> FailureType {
    // "overQuota" / "invalidKey" arrive as an upstream error status.
    if error_message.contains("upstream status") {
        FailureType::Unexpected
    } else if error_message.contains("HTTP error") || error_message.contains("timeout") {
        FailureType::Unexpected
    } else if error_message.contains("No data") {
        FailureType::Expected
    } else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an upstream data-source failure with automatic classification.
pub fn log_source_failure(source: DataSource, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = match source {
        DataSource::OpenAq => classify_openaq_failure(&error_msg),
        DataSource::Waqi => classify_waqi_failure(&error_msg),
        _ => FailureType::Unknown,
    };

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => debug(source, None, &message),
        FailureType::Unexpected => error(source, None, &message),
        FailureType::Unknown => warn(source, None, &message),
    }
}

/// Log a summary of one ingest pass.
pub fn log_ingest_summary(source: DataSource, received: usize, kept: usize) {
    let dropped = received.saturating_sub(kept);
    let message = format!(
        "Ingest complete: kept {}/{} sites, {} dropped",
        kept, received, dropped
    );

    if dropped == 0 {
        info(source, None, &message);
    } else if kept == 0 {
        warn(source, None, &message);
    } else {
        info(source, None, &message);
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
    fn test_failure_classification() {
        let quota = "No data available: upstream status 'overQuota'";
        assert_eq!(classify_waqi_failure(quota), FailureType::Unexpected);

        let http = "HTTP error: 500";
        assert_eq!(classify_openaq_failure(http), FailureType::Unexpected);

        let empty = "No data available: empty results";
        assert_eq!(classify_openaq_failure(empty), FailureType::Expected);
    }
}
