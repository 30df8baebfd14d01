// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Diagnostics output.
//!
//! Nothing in the library prints directly. Components hold an
//! `Arc<dyn LogSink>` handed to them by the caller, so a CLI can route messages
//! to a coloured terminal while tests capture them with [`MemoryLog`] or drop
//! them with [`SilentLog`].

use std::sync::{Arc, Mutex, PoisonError};

use colored::Colorize;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Standard info message.
    Info,
    /// Recoverable problem.
    Warn,
    /// Operation failed.
    Error,
    /// Operation completed.
    Success,
    /// Detail shown only in verbose mode.
    Verbose,
    /// Section header.
    Section,
}

/// Destination for diagnostic messages.
pub trait LogSink: Send + Sync {
    /// Record one message.
    fn log(&self, level: Level, message: &str);
}

impl<T: LogSink + ?Sized> LogSink for Arc<T> {
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message);
    }
}

impl<T: LogSink + ?Sized> LogSink for &T {
    fn log(&self, level: Level, message: &str) {
        (**self).log(level, message);
    }
}

/// Forward a formatted message to a sink. Used by the logging macros.
pub fn emit<S: LogSink + ?Sized>(sink: &S, level: Level, message: &str) {
    sink.log(level, message);
}

/// Terminal output with colored prefixes.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLog {
    verbose: bool,
}

impl ConsoleLog {
    /// Create a console sink; `verbose` enables [`Level::Verbose`] and section output.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Check if verbose output is enabled.
    #[must_use]
    pub const fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Shared handle, ready to inject.
    #[must_use]
    pub fn shared(verbose: bool) -> Arc<dyn LogSink> {
        Arc::new(Self::new(verbose))
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LogSink for ConsoleLog {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{message}"),
            Level::Warn => eprintln!("{} {message}", "WARNING ⚠️".yellow().bold()),
            Level::Error => eprintln!("{} {message}", "Error:".red().bold()),
            Level::Success => println!("{} {message}", "✅".green()),
            Level::Verbose => {
                if self.verbose {
                    println!("{message}");
                }
            }
            Level::Section => {
                if self.verbose {
                    println!();
                    println!("{}", message.cyan().bold());
                }
            }
        }
    }
}

/// Captures messages in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryLog {
    /// Create an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far.
    #[must_use]
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a message at `level` containing `needle` was logged.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    /// Number of messages logged at `level`.
    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(l, _)| *l == level)
            .count()
    }
}

impl LogSink for MemoryLog {
    fn log(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentLog;

impl LogSink for SilentLog {
    fn log(&self, _level: Level, _message: &str) {}
}

/// Macro for standard info messages.
#[macro_export]
macro_rules! info {
    ($sink:expr, $($arg:tt)*) => {
        $crate::logging::emit(&$sink, $crate::logging::Level::Info, &format!($($arg)*))
    };
}

/// Macro for warning messages.
#[macro_export]
macro_rules! warn {
    ($sink:expr, $($arg:tt)*) => {
        $crate::logging::emit(&$sink, $crate::logging::Level::Warn, &format!($($arg)*))
    };
}

/// Macro for error messages.
#[macro_export]
macro_rules! error {
    ($sink:expr, $($arg:tt)*) => {
        $crate::logging::emit(&$sink, $crate::logging::Level::Error, &format!($($arg)*))
    };
}

/// Macro for success messages.
#[macro_export]
macro_rules! success {
    ($sink:expr, $($arg:tt)*) => {
        $crate::logging::emit(&$sink, $crate::logging::Level::Success, &format!($($arg)*))
    };
}

/// Macro for verbose messages.
#[macro_export]
macro_rules! verbose {
    ($sink:expr, $($arg:tt)*) => {
        $crate::logging::emit(&$sink, $crate::logging::Level::Verbose, &format!($($arg)*))
    };
}

/// Macro for section headers.
#[macro_export]
macro_rules! section {
    ($sink:expr, $($arg:tt)*) => {
        $crate::logging::emit(&$sink, $crate::logging::Level::Section, &format!($($arg)*))
    };
}
