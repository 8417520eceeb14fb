//! Diagnostic log lines on stderr: tagged text by default, JSON lines with `--json`.
//!
//! Text lines follow the `[SHN-<AREA>] message` shape so they grep cleanly out
//! of the journal. JSON lines are self-contained objects, one per line, written
//! with a single `write_all` so a tailing reader never sees a partial record.
//! Logging never fails the caller: sink errors are swallowed.

#![allow(missing_docs)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::errors::ShnError;

/// Severity level for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Log event types emitted by the notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ConfigLoaded,
    ConfigWarning,
    EnvFileLineSkipped,
    SweepStart,
    SweepComplete,
    DeviceHealthy,
    DeviceUnhealthy,
    ProbeFailed,
    MailSent,
    MailFailed,
}

impl EventType {
    /// Area tag used in text mode.
    #[must_use]
    pub const fn area(self) -> &'static str {
        match self {
            Self::ConfigLoaded | Self::ConfigWarning | Self::EnvFileLineSkipped => "CONFIG",
            Self::SweepStart | Self::SweepComplete => "SWEEP",
            Self::DeviceHealthy | Self::DeviceUnhealthy | Self::ProbeFailed => "PROBE",
            Self::MailSent | Self::MailFailed => "MAIL",
        }
    }
}

/// A single log entry; all fields optional except `ts`, `event`, `severity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 UTC timestamp.
    pub ts: String,
    pub event: EventType,
    pub severity: Severity,
    /// Device path the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// SHN error code if an operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    /// Create a new entry stamped with the current UTC time.
    pub fn new(event: EventType, severity: Severity) -> Self {
        Self {
            ts: format_utc_now(),
            event,
            severity,
            device: None,
            error_code: None,
            details: None,
        }
    }

    #[must_use]
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    #[must_use]
    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach an error: its code and its display text become the details.
    #[must_use]
    pub fn error(mut self, err: &ShnError) -> Self {
        self.error_code = Some(err.code().to_string());
        self.details = Some(err.to_string());
        self
    }

    fn render_text(&self) -> String {
        let prefix = match self.severity {
            Severity::Info => "",
            Severity::Warning => "WARNING: ",
            Severity::Error => "ERROR: ",
        };
        let details = self.details.as_deref().unwrap_or("");
        format!("[SHN-{}] {prefix}{details}\n", self.event.area())
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Line-oriented logger over an arbitrary sink (stderr in production).
pub struct Logger {
    format: LogFormat,
    verbose: bool,
    sink: RefCell<Box<dyn Write>>,
}

impl Logger {
    /// Log to stderr.
    #[must_use]
    pub fn stderr(format: LogFormat, verbose: bool) -> Self {
        Self::with_sink(format, verbose, Box::new(io::stderr()))
    }

    /// Log to a caller-supplied sink.
    #[must_use]
    pub fn with_sink(format: LogFormat, verbose: bool, sink: Box<dyn Write>) -> Self {
        Self {
            format,
            verbose,
            sink: RefCell::new(sink),
        }
    }

    /// Write one entry. Text mode drops info entries unless verbose.
    pub fn log(&self, entry: &LogEntry) {
        let line = match self.format {
            LogFormat::Text => {
                if entry.severity == Severity::Info && !self.verbose {
                    return;
                }
                entry.render_text()
            }
            LogFormat::Json => match serde_json::to_string(entry) {
                Ok(json) => format!("{json}\n"),
                Err(e) => format!("[SHN-LOG] serialize error: {e}\n"),
            },
        };
        let mut sink = self.sink.borrow_mut();
        let _ = sink.write_all(line.as_bytes());
        let _ = sink.flush();
    }

    pub fn info(&self, event: EventType, details: impl Into<String>) {
        self.log(&LogEntry::new(event, Severity::Info).details(details));
    }

    pub fn warn(&self, event: EventType, details: impl Into<String>) {
        self.log(&LogEntry::new(event, Severity::Warning).details(details));
    }

    /// Log a failed operation on a device.
    pub fn error(&self, event: EventType, device: &str, err: &ShnError) {
        self.log(&LogEntry::new(event, Severity::Error).device(device).error(err));
    }
}

/// In-memory sink whose contents stay readable after the logger takes ownership.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Rc<RefCell<Vec<u8>>>);

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Format current UTC time as ISO 8601.
fn format_utc_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
