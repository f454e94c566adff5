//! Logging for the formguard crates.
//!
//! Messages go through a small set of macros that check a global level
//! before formatting anything, so disabled levels cost one atomic load.
//!
//! ```rust
//! use formguard_log::{debug, info, warn};
//!
//! debug!("generating token for element {}", "csrf");
//! info!(target: "formguard::session", "namespace {} expired", "csrf_ns");
//! warn!("token validation failed");
//! ```
//!
//! # Environment Variables
//!
//! - `FORMGUARD_DEBUG=1` - enable debug output
//! - `FORMGUARD_LOG_LEVEL=trace|debug|info|warn|error|off`
//! - `FORMGUARD_LOG_FORMAT=pretty|compact|json|facade`
//! - `FORMGUARD_LOG_TIMESTAMPS=0` - drop timestamps from text output
//!
//! The `facade` format hands records to whatever `log` implementation the
//! host application installed instead of writing to stderr.

use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Levels and formats
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Disables all output.
    Off = 5,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    fn to_log(self) -> Option<log::Level> {
        match self {
            Level::Trace => Some(log::Level::Trace),
            Level::Debug => Some(log::Level::Debug),
            Level::Info => Some(log::Level::Info),
            Level::Warn => Some(log::Level::Warn),
            Level::Error => Some(log::Level::Error),
            Level::Off => None,
        }
    }
}

impl FromStr for Level {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "off" | "none" => Ok(Level::Off),
            other => Err(ParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Date, level, target and message on one line
    Pretty,
    /// Time and level initial only
    Compact,
    /// One JSON object per line
    Json,
    /// Forward to the `log` facade
    Facade,
}

impl FromStr for Format {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "compact" => Ok(Format::Compact),
            "json" => Ok(Format::Json),
            "facade" | "log" => Ok(Format::Facade),
            other => Err(ParseError(other.to_string())),
        }
    }
}

/// Unrecognized level or format name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized log setting: {}", self.0)
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// Configuration
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);
static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub debug: bool,
    pub level: Level,
    pub format: Format,
    pub timestamps: bool,
    pub module_path: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Warn,
            format: Format::Json,
            timestamps: true,
            module_path: true,
        }
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

impl LogConfig {
    /// Build the configuration from `FORMGUARD_*` variables and publish the
    /// level to the global atomics.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debug = env_flag("FORMGUARD_DEBUG").unwrap_or(false);

        let level = env::var("FORMGUARD_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { defaults.level });

        let format = env::var("FORMGUARD_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.format);

        let config = Self {
            debug,
            level,
            format,
            timestamps: env_flag("FORMGUARD_LOG_TIMESTAMPS").unwrap_or(true),
            module_path: env_flag("FORMGUARD_LOG_MODULE").unwrap_or(true),
        };

        DEBUG_ENABLED.store(config.debug, Ordering::SeqCst);
        LOG_LEVEL.store(config.level as u8, Ordering::SeqCst);
        config
    }
}

/// Force the configuration to load now rather than on first log call.
pub fn init() {
    Lazy::force(&CONFIG);
}

/// Configuration in effect.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

#[inline]
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn current_level() -> Level {
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

/// Change the minimum level at runtime.
pub fn set_level(level: Level) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Toggle debug mode; enabling it also lowers the level to `Debug`.
pub fn set_debug(enabled: bool) {
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

// ============================================================================
// Output
// ============================================================================

#[doc(hidden)]
pub fn log(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) && !(level == Level::Debug && is_debug_enabled()) {
        return;
    }

    let config = config();
    if config.format == Format::Facade {
        if let Some(lvl) = level.to_log() {
            log::log!(target: target, lvl, "{}", message);
        }
        return;
    }

    if let Some(line) = format_record(config, level, target, message) {
        eprintln!("{}", line);
    }
}

/// Render one record in the configured text format.
///
/// Returns `None` for `Format::Facade`, which never produces text itself.
pub fn format_record(
    config: &LogConfig,
    level: Level,
    target: &str,
    message: &str,
) -> Option<String> {
    let show_target = config.module_path && !target.is_empty();

    match config.format {
        Format::Pretty => {
            let mut line = String::new();
            if config.timestamps {
                line.push_str(
                    &chrono::Local::now()
                        .format("%Y-%m-%d %H:%M:%S%.3f ")
                        .to_string(),
                );
            }
            line.push_str(&format!("{:5} ", level.as_str()));
            if show_target {
                line.push_str(&format!("[{}] ", target));
            }
            line.push_str(message);
            Some(line)
        }
        Format::Compact => {
            let mut line = String::new();
            if config.timestamps {
                line.push_str(&chrono::Local::now().format("%H:%M:%S ").to_string());
            }
            line.push(level.as_str().chars().next().unwrap_or('?'));
            line.push(' ');
            if show_target {
                line.push_str(target);
                line.push_str(": ");
            }
            line.push_str(message);
            Some(line)
        }
        Format::Json => Some(json_record(level, target, message)),
        Format::Facade => None,
    }
}

#[cfg(feature = "json")]
fn json_record(level: Level, target: &str, message: &str) -> String {
    #[derive(serde::Serialize)]
    struct Record<'a> {
        timestamp: String,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: chrono::Utc::now().to_rfc3339(),
        level: level.as_str(),
        target,
        message,
    };

    serde_json::to_string(&record).unwrap_or_default()
}

#[cfg(not(feature = "json"))]
fn json_record(level: Level, target: &str, message: &str) -> String {
    fn escape(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
                c => out.push(c),
            }
        }
        out
    }

    format!(
        r#"{{"timestamp":"{}","level":"{}","target":"{}","message":"{}"}}"#,
        chrono::Utc::now().to_rfc3339(),
        level.as_str(),
        escape(target),
        escape(message)
    )
}

// ============================================================================
// Macros
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($level:expr, $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($level)
            || ($level == $crate::Level::Debug && $crate::is_debug_enabled())
        {
            $crate::log($level, $target, &format!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log_at!($crate::Level::Trace, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Trace, module_path!(), $($arg)+) };
}

/// Log a debug message; also emitted whenever `FORMGUARD_DEBUG=1`.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log_at!($crate::Level::Debug, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Debug, module_path!(), $($arg)+) };
}

#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log_at!($crate::Level::Info, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Info, module_path!(), $($arg)+) };
}

#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log_at!($crate::Level::Warn, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Warn, module_path!(), $($arg)+) };
}

#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => { $crate::__log_at!($crate::Level::Error, $target, $($arg)+) };
    ($($arg:tt)+) => { $crate::__log_at!($crate::Level::Error, module_path!(), $($arg)+) };
}

// ============================================================================
// Tracing bridge
// ============================================================================

#[cfg(feature = "tracing")]
pub mod tracing_compat {
    //! A `tracing` subscriber whose default filter follows `FORMGUARD_LOG_LEVEL`.

    use super::*;

    pub fn subscriber() -> impl tracing::Subscriber {
        use tracing_subscriber::prelude::*;
        use tracing_subscriber::{EnvFilter, fmt};

        let directive = config().level.as_str().to_lowercase();
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_ansi(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_config(format: Format) -> LogConfig {
        LogConfig {
            format,
            timestamps: false,
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("DEBUG".parse::<Level>(), Ok(Level::Debug));
        assert_eq!("warning".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("none".parse::<Level>(), Ok(Level::Off));
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("json".parse::<Format>(), Ok(Format::Json));
        assert_eq!("log".parse::<Format>(), Ok(Format::Facade));
        assert!("xml".parse::<Format>().is_err());
    }

    #[test]
    fn test_pretty_record() {
        let line = format_record(&text_config(Format::Pretty), Level::Info, "fg", "hello").unwrap();
        assert_eq!(line, "INFO  [fg] hello");
    }

    #[test]
    fn test_compact_record_without_target() {
        let mut config = text_config(Format::Compact);
        config.module_path = false;
        let line = format_record(&config, Level::Warn, "fg", "careful").unwrap();
        assert_eq!(line, "W careful");
    }

    #[test]
    fn test_json_record() {
        let line = format_record(&text_config(Format::Json), Level::Error, "fg", "a \"quote\"")
            .unwrap();
        assert!(line.contains(r#""level":"ERROR""#));
        assert!(line.contains(r#""message":"a \"quote\"""#));
    }

    #[test]
    fn test_facade_has_no_text() {
        assert!(format_record(&text_config(Format::Facade), Level::Info, "fg", "x").is_none());
    }

    #[test]
    fn test_off_is_never_enabled() {
        let original = current_level();
        set_level(Level::Trace);
        assert!(!is_level_enabled(Level::Off));
        set_level(original);
    }

    #[test]
    fn test_macros_compile() {
        trace!("trace {}", 1);
        debug!(target: "formguard::test", "debug");
        info!("info");
        warn!(target: "formguard::test", "warn {}", "x");
        error!("error");
    }
}
