//! Bridge from the `log` facade to a logger implemented in the host language.

use std::sync::{Arc, OnceLock};

/// Receives log records emitted by the codec.
///
/// Implemented on the foreign side and installed once with [`set_logger`].
///
/// ```rust
/// use gbkf::{LogLevel, Logger};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         eprintln!("[{level:?}] {message}");
///     }
/// }
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Handles one formatted record.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a forwarded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Per-entry detail.
    Trace,
    /// Reader and writer summaries.
    Debug,
    /// Informational messages.
    Info,
    /// Checksum mismatches and overridden entry counts.
    Warn,
    /// Failures.
    Error,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// `log::Log` implementation forwarding to the installed [`Logger`].
struct ForeignLogger;

static FOREIGN_LOGGER: ForeignLogger = ForeignLogger;

/// Debug and trace records are only forwarded from this workspace's crates.
fn forwards(metadata: &log::Metadata) -> bool {
    metadata.level() <= log::Level::Info || metadata.target().starts_with("gbkf")
}

impl log::Log for ForeignLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        forwards(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(record.level().into(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Installs `logger` as the destination of every codec log record.
///
/// Only the first call takes effect.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        log::warn!("gbkf logger already set");
        return;
    }
    if let Err(e) = log::set_logger(&FOREIGN_LOGGER) {
        eprintln!("Failed to set logger: {e}");
        return;
    }
    log::set_max_level(log::LevelFilter::Trace);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_records_only_from_gbkf_targets() {
        use log::Log;

        let cases = [
            (log::Level::Trace, "gbkf_core::decoder", true),
            (log::Level::Debug, "gbkf::reader", true),
            (log::Level::Debug, "uniffi::ffi", false),
            (log::Level::Trace, "", false),
            (log::Level::Warn, "uniffi::ffi", true),
            (log::Level::Error, "", true),
        ];
        for (level, target, expected) in cases {
            let metadata = log::Metadata::builder().level(level).target(target).build();
            assert_eq!(ForeignLogger.enabled(&metadata), expected, "{level} {target}");

            let record = log::Record::builder()
                .level(level)
                .target(target)
                .module_path(Some("elsewhere"))
                .build();
            assert_eq!(forwards(record.metadata()), expected, "{level} {target}");
        }
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(LogLevel::from(log::Level::Warn), LogLevel::Warn);
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Trace);
    }
}
