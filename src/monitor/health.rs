//! Health classification of raw diagnostic output.
//!
//! Only substring presence is checked; the rest of the report is carried
//! verbatim into the alert mail.

#![allow(missing_docs)]

use std::fmt;

use memchr::memmem;
use serde::Serialize;

/// Markers whose presence means the drive reported itself healthy.
/// `PASSED` comes from the ATA overall-health self-assessment, the other from
/// NVMe health logs.
pub const HEALTHY_MARKERS: [&str; 2] = ["PASSED", "SMART Health Status: OK"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Classify diagnostic stdout.
#[must_use]
pub fn classify_output(output: &[u8]) -> HealthStatus {
    if HEALTHY_MARKERS
        .iter()
        .any(|marker| memmem::find(output, marker.as_bytes()).is_some())
    {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    }
}

/// Result of querying one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub device: String,
    pub status: HealthStatus,
    /// Diagnostic stdout, lossily decoded.
    pub raw_output: String,
}

impl HealthReport {
    /// Build a report from captured stdout bytes.
    #[must_use]
    pub fn from_output(device: impl Into<String>, stdout: &[u8]) -> Self {
        Self {
            device: device.into(),
            status: classify_output(stdout),
            raw_output: String::from_utf8_lossy(stdout).into_owned(),
        }
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
