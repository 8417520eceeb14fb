//! Diagnostic tool invocation per device.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::core::errors::{Result, ShnError};
use crate::monitor::health::HealthReport;

/// Longest stderr excerpt carried into an error message.
const STDERR_EXCERPT_BYTES: usize = 512;

/// Device family, decided purely by path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Nvme,
    Ata,
}

impl DeviceKind {
    #[must_use]
    pub fn classify(device: &str) -> Self {
        if device.starts_with("/dev/nvme") {
            Self::Nvme
        } else {
            Self::Ata
        }
    }

    /// smartctl flag: extended report for NVMe, health summary otherwise.
    #[must_use]
    pub const fn smartctl_flag(self) -> &'static str {
        match self {
            Self::Nvme => "-x",
            Self::Ata => "-H",
        }
    }
}

/// Something that can produce a health report for a device.
pub trait HealthProbe {
    fn query(&self, device: &str) -> Result<HealthReport>;
}

/// Runs the smartctl executable and classifies its stdout.
#[derive(Debug, Clone)]
pub struct SmartctlProbe {
    program: PathBuf,
}

impl SmartctlProbe {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed for `device`.
    #[must_use]
    pub fn args_for(device: &str) -> [&str; 2] {
        [DeviceKind::classify(device).smartctl_flag(), device]
    }
}

impl HealthProbe for SmartctlProbe {
    fn query(&self, device: &str) -> Result<HealthReport> {
        let output = Command::new(&self.program)
            .args(Self::args_for(device))
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ShnError::ProbeSpawn {
                program: self.program.clone(),
                device: device.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ShnError::ProbeExit {
                program: self.program.clone(),
                device: device.to_string(),
                status: output.status.to_string(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }

        Ok(HealthReport::from_output(device, &output.stdout))
    }
}

/// `": <first bytes of stderr>"`, or empty when stderr was blank.
fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut end = trimmed.len().min(STDERR_EXCERPT_BYTES);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!(": {}", &trimmed[..end])
}
