//! SHN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ShnError>;

/// Top-level error type for the SMART health notifier.
#[derive(Debug, Error)]
pub enum ShnError {
    #[error(
        "[SHN-1001] required environment variable {name} is not set. Please check your configuration."
    )]
    MissingVar { name: &'static str },

    #[error("[SHN-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SHN-1003] env file {path} line {line}: {details}")]
    EnvFile {
        path: PathBuf,
        line: usize,
        details: String,
    },

    #[error("[SHN-2001] failed to start {program} for {device}: {source}")]
    ProbeSpawn {
        program: PathBuf,
        device: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[SHN-2002] {program} on {device} exited abnormally ({status}){stderr}")]
    ProbeExit {
        program: PathBuf,
        device: String,
        status: String,
        stderr: String,
    },

    #[error("[SHN-3001] mail delivery failure in {context}: {details}")]
    Mail {
        context: &'static str,
        details: String,
    },

    #[error("[SHN-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SHN-3101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },
}

impl ShnError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingVar { .. } => "SHN-1001",
            Self::ConfigParse { .. } => "SHN-1002",
            Self::EnvFile { .. } => "SHN-1003",
            Self::ProbeSpawn { .. } => "SHN-2001",
            Self::ProbeExit { .. } => "SHN-2002",
            Self::Mail { .. } => "SHN-3001",
            Self::Io { .. } => "SHN-3002",
            Self::Serialization { .. } => "SHN-3101",
        }
    }

    /// Startup-tier errors abort the process; everything else is logged and skipped.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingVar { .. }
                | Self::ConfigParse { .. }
                | Self::EnvFile { .. }
                | Self::Io { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<lettre::error::Error> for ShnError {
    fn from(value: lettre::error::Error) -> Self {
        Self::Mail {
            context: "message",
            details: value.to_string(),
        }
    }
}

impl From<lettre::transport::smtp::Error> for ShnError {
    fn from(value: lettre::transport::smtp::Error) -> Self {
        Self::Mail {
            context: "smtp",
            details: value.to_string(),
        }
    }
}

impl From<lettre::address::AddressError> for ShnError {
    fn from(value: lettre::address::AddressError) -> Self {
        Self::Mail {
            context: "address",
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for ShnError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ShnError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}
