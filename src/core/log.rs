//! Logger threaded through the world and engine
//!
//! Writes to the browser console on wasm32 and to stderr elsewhere.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Lowest level that gets printed. `None` silences everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogLevel {
    None,
    #[default]
    Debug,
    Info,
    Warn,
}

#[derive(Clone, Debug, Default)]
pub struct Logger {
    level: LogLevel,
    warned: HashSet<String>,
    warnings: u32,
}

impl Logger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            warned: HashSet::new(),
            warnings: 0,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    /// Number of warnings raised so far (printed or not)
    pub fn warnings(&self) -> u32 {
        self.warnings
    }

    pub fn debug(&self, message: &str) {
        if self.enabled(LogLevel::Debug) {
            emit(LogLevel::Debug, message);
        }
    }

    pub fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            emit(LogLevel::Info, message);
        }
    }

    pub fn warn(&mut self, message: &str) {
        self.warnings = self.warnings.saturating_add(1);
        if self.enabled(LogLevel::Warn) {
            emit(LogLevel::Warn, message);
        }
    }

    /// Warn only the first time this exact message is seen
    pub fn warn_once(&mut self, message: &str) {
        if self.warned.insert(message.to_string()) {
            self.warn(message);
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.level != LogLevel::None && self.level <= level
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: LogLevel, message: &str) {
    let line = format!("impulse2d: {}", message);
    match level {
        LogLevel::Warn => web_sys::console::warn_1(&line.into()),
        LogLevel::Info => web_sys::console::info_1(&line.into()),
        _ => web_sys::console::log_1(&line.into()),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(level: LogLevel, message: &str) {
    let tag = match level {
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        _ => "debug",
    };
    eprintln!("impulse2d [{}]: {}", tag, message);
}
