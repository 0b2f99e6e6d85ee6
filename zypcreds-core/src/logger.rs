use std::sync::{Arc, OnceLock};

/// Trait representing a logger that can log messages at various levels.
///
/// Implement it to receive the library's log output. It is exported via `UniFFI`
/// for use in foreign languages. Rust applications can skip this entirely and
/// install any `log` compatible logger instead.
///
/// # Examples
///
/// ```rust
/// use zypcreds_core::{Logger, LogLevel};
///
/// struct MyLogger;
///
/// impl Logger for MyLogger {
///     fn log(&self, level: LogLevel, message: String) {
///         println!("[{:?}] {}", level, message);
///     }
/// }
/// ```
///
/// ## Swift
///
/// ```swift
/// class ZypCredsLoggerBridge: ZypCreds.Logger {
///     static let shared = ZypCredsLoggerBridge()
///
///     func log(level: ZypCreds.LogLevel, message: String) {
///         Log.log(level.toCoreLevel(), message)
///     }
/// }
///
/// ZypCreds.setLogger(logger: ZypCredsLoggerBridge.shared) // Call this only once!!!
/// ```
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Logs a message at the specified log level.
    fn log(&self, level: LogLevel, message: String);
}

/// Enumeration of possible log levels.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Designates very low priority, often extremely detailed messages.
    Trace,
    /// Designates lower priority debugging information.
    Debug,
    /// Designates informational messages that highlight the progress of the application.
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

/// Forwards `log` records to the user-provided [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
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
    let is_from_zypcreds = module_path.is_some_and(|path| path.starts_with("zypcreds"));
    let is_debug_or_trace = matches!(level, log::Level::Debug | log::Level::Trace);
    is_from_zypcreds || !is_debug_or_trace
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
/// Call once, before any logging occurs. Later calls are ignored, as is the
/// case where another `log` logger was already installed by the host.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    static LOGGER: ForeignLogger = ForeignLogger;

    if LOGGER_INSTANCE.set(logger).is_err() {
        eprintln!("Logger already set");
        return;
    }

    if let Err(e) = log::set_logger(&LOGGER) {
        eprintln!("Failed to set logger: {e}");
        return;
    }
    log::set_max_level(log::LevelFilter::Trace);
}
