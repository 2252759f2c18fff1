//! Forwarding of `log` records to a host-provided [`Logger`].

use std::sync::{Arc, OnceLock};

/// Trait representing a logger that can log messages at various levels.
///
/// Host applications implement this trait to receive the log output of the
/// wallet serializer without depending on a particular logging framework.
///
/// # Examples
///
/// ```rust
/// use pocketwallet_core::logger::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         eprintln!("[{level:?}] {message}");
///     }
/// }
/// ```
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Enumeration of possible log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Very low priority, often extremely detailed messages.
    Trace,
    /// Lower priority debugging information.
    Debug,
    /// Informational messages.
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Errors.
    Error,
}

/// Forwards `log` records to the host-provided [`Logger`].
struct ForwardingLogger;

impl log::Log for ForwardingLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if !should_forward(record.level(), record.module_path()) {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        } else {
            eprintln!("Logger not set: {}", record.args());
        }
    }

    fn flush(&self) {}
}

/// Debug and trace records are only forwarded when they come from this crate.
fn should_forward(level: log::Level, module_path: Option<&str>) -> bool {
    let is_debug_or_trace = level == log::Level::Debug || level == log::Level::Trace;
    let is_from_pocketwallet =
        module_path.is_some_and(|module_path| module_path.starts_with("pocketwallet"));
    !is_debug_or_trace || is_from_pocketwallet
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// Sets the global logger.
///
/// Installs a `log` backend that forwards to `logger`. Only the first call
/// has an effect; later calls are reported on stderr and ignored.
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("Logger already set");
        return;
    }

    if let Err(e) = init_logger() {
        eprintln!("Failed to set logger: {e}");
    }
}

fn init_logger() -> Result<(), log::SetLoggerError> {
    static LOGGER: ForwardingLogger = ForwardingLogger;
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(log_level(log::Level::Error), LogLevel::Error);
        assert_eq!(log_level(log::Level::Trace), LogLevel::Trace);
    }

    #[test]
    fn test_foreign_debug_records_are_dropped() {
        assert!(should_forward(log::Level::Debug, Some("pocketwallet_core::serializer")));
        assert!(!should_forward(log::Level::Debug, Some("prost::encoding")));
        assert!(!should_forward(log::Level::Trace, None));
        assert!(should_forward(log::Level::Warn, Some("prost::encoding")));
    }
}
