//! Per-test progress logging.
#![allow(dead_code)]
//!
//! ```rust,ignore
//! let log = TestLogger::new("entry_roundtrip");
//! log.phase("setup");
//! log.info("queued responses");
//! log.finish_ok();
//! ```
//!
//! # Environment Variables
//!
//! - `WYKOP_TEST_LOG` - Minimum level: trace, debug, info, warn, error (default: warn)
//! - `WYKOP_TEST_LOG_JSON` - Set to "1" or "true" for one JSON object per line

use std::cell::RefCell;
use std::env;
use std::fmt::Display;
use std::time::Instant;

use serde_json::json;

use super::log_capture::TestLogCapture;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

fn min_level() -> LogLevel {
    env::var("WYKOP_TEST_LOG")
        .ok()
        .and_then(|v| LogLevel::parse(&v))
        .unwrap_or(LogLevel::Warn)
}

fn json_mode() -> bool {
    env::var("WYKOP_TEST_LOG_JSON").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Structured logger scoped to one test.
pub struct TestLogger {
    name: String,
    started: Instant,
    phase: RefCell<Option<String>>,
    min_level: LogLevel,
    json: bool,
}

impl TestLogger {
    pub fn new(name: &str) -> Self {
        let logger = Self {
            name: name.to_string(),
            started: Instant::now(),
            phase: RefCell::new(None),
            min_level: min_level(),
            json: json_mode(),
        };
        logger.debug("started");
        logger
    }

    /// Logger plus a capture of library tracing events.
    pub fn with_capture(name: &str) -> (Self, TestLogCapture) {
        (Self::new(name), TestLogCapture::start())
    }

    pub fn phase(&self, phase: &str) {
        *self.phase.borrow_mut() = Some(phase.to_string());
        self.debug(format!("phase: {phase}"));
    }

    pub fn trace(&self, message: impl Display) {
        self.log(LogLevel::Trace, &message.to_string());
    }

    pub fn debug(&self, message: impl Display) {
        self.log(LogLevel::Debug, &message.to_string());
    }

    pub fn info(&self, message: impl Display) {
        self.log(LogLevel::Info, &message.to_string());
    }

    pub fn warn(&self, message: impl Display) {
        self.log(LogLevel::Warn, &message.to_string());
    }

    pub fn error(&self, message: impl Display) {
        self.log(LogLevel::Error, &message.to_string());
    }

    /// Record an outgoing request made by the test.
    pub fn http_request(&self, method: &str, path: &str) {
        self.debug(format!("{method} {path}"));
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }

    pub fn finish_ok(&self) {
        self.info(format!("passed in {}ms", self.elapsed_ms()));
    }

    pub fn finish_err(&self, reason: impl Display) {
        self.error(format!("failed after {}ms: {reason}", self.elapsed_ms()));
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < self.min_level {
            return;
        }
        let phase = self.phase.borrow();
        if self.json {
            eprintln!(
                "{}",
                json!({
                    "level": level.to_string(),
                    "test": self.name,
                    "phase": *phase,
                    "elapsed_ms": self.elapsed_ms(),
                    "message": message,
                })
            );
        } else {
            let phase = phase.as_deref().map(|p| format!("[{p}] ")).unwrap_or_default();
            eprintln!("[{level:5}] {} {phase}{message}", self.name);
        }
    }
}
