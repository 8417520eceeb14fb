//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use smart_health_notifier::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, SmtpConfig};
pub use crate::core::errors::{Result, ShnError};

// Monitor
pub use crate::monitor::health::{HealthReport, HealthStatus, classify_output};
pub use crate::monitor::probe::{DeviceKind, HealthProbe, SmartctlProbe};

// Daemon
pub use crate::daemon::loop_main::{
    DeviceOutcome, Monitor, PlainReporter, SweepOptions, SweepReporter, SweepSummary,
};
pub use crate::daemon::notifications::{HealthAlert, Notifier, SmtpNotifier};

// Logging
pub use crate::logger::jsonl::{LogFormat, Logger};
