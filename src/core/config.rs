//! Configuration: process environment + optional env file, resolved once into
//! an immutable [`Config`].

#![allow(missing_docs)]

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::core::duration::parse_interval;
use crate::core::env_file::EnvFile;
use crate::core::errors::{Result, ShnError};
use crate::logger::jsonl::{EventType, Logger};

/// Names the optional env file to pre-load settings from.
pub const ENVFILE_VAR: &str = "ENVFILE";

/// Settings that must be present; checked in this order.
pub const REQUIRED_VARS: [&str; 6] = [
    "SMTP_SERVER",
    "SMTP_PORT",
    "SENDER_EMAIL",
    "SENDER_PASSWORD",
    "RECIPIENT_EMAIL",
    "DEVICES",
];

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_DEVICE: &str = "/dev/sda";
pub const DEFAULT_SMARTCTL: &str = "smartctl";

/// Full notifier configuration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Sleep after each device check.
    #[serde(with = "humantime_serde")]
    pub check_interval: Duration,
    /// Diagnostic executable; a bare name is looked up on `PATH`.
    pub smartctl: PathBuf,
    /// Devices in check order.
    pub devices: Vec<String>,
    /// Env file the settings were pre-loaded from, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_file: Option<PathBuf>,
    /// Must stay the last field: TOML tables follow plain values.
    pub smtp: SmtpConfig,
}

/// Mail relay and addressing.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct SmtpConfig {
    pub server: String,
    /// Raw `SMTP_PORT`; parsed when a message is sent.
    pub port: String,
    /// Auth identity and From address.
    pub sender: String,
    #[serde(serialize_with = "serialize_redacted")]
    pub password: String,
    pub recipient: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &"********")
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl SmtpConfig {
    /// `server:port` as handed to the transport.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}

impl Config {
    /// Load from the process environment, pre-loading `env_file` (or the file
    /// named by `ENVFILE`) when given. Env-file values take precedence.
    pub fn load(env_file: Option<&Path>, logger: &Logger) -> Result<Self> {
        let env_file_path = env_file
            .map(Path::to_path_buf)
            .or_else(|| env_var(ENVFILE_VAR).map(PathBuf::from));

        let file = match &env_file_path {
            Some(path) if path.exists() => Some(load_env_file(path, logger)?),
            Some(path) => {
                logger.warn(
                    EventType::ConfigWarning,
                    format!(
                        "specified env file does not exist or cannot be accessed: {}",
                        path.display()
                    ),
                );
                None
            }
            None => None,
        };

        let mut cfg = Self::resolve_from(
            |name| match file.as_ref().and_then(|f| f.get(name)) {
                Some(value) => non_empty(value.to_string()),
                None => env_var(name),
            },
            logger,
        )?;
        cfg.env_file = file.map(|f| f.path);
        Ok(cfg)
    }

    /// Resolve every setting through `lookup`; unset and empty are equivalent.
    pub fn resolve_from<F>(lookup: F, logger: &Logger) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).and_then(non_empty);

        for name in REQUIRED_VARS {
            if lookup(name).is_none() {
                return Err(ShnError::MissingVar { name });
            }
        }
        let required = |name: &'static str| lookup(name).ok_or(ShnError::MissingVar { name });

        let smtp = SmtpConfig {
            server: required("SMTP_SERVER")?,
            port: required("SMTP_PORT")?.trim().to_string(),
            sender: required("SENDER_EMAIL")?,
            password: required("SENDER_PASSWORD")?,
            recipient: required("RECIPIENT_EMAIL")?,
        };

        let check_interval = match lookup("CHECK_INTERVAL") {
            None => DEFAULT_CHECK_INTERVAL,
            Some(raw) => match parse_interval(raw.trim()) {
                Ok(interval) => {
                    if interval.negative {
                        logger.warn(
                            EventType::ConfigWarning,
                            format!("CHECK_INTERVAL {raw:?} is negative; devices are checked without a pause"),
                        );
                    }
                    interval.clamped()
                }
                Err(err) => {
                    logger.warn(
                        EventType::ConfigWarning,
                        format!(
                            "invalid format for duration in environment variable CHECK_INTERVAL: {err}; using default {}",
                            humantime::format_duration(DEFAULT_CHECK_INTERVAL)
                        ),
                    );
                    DEFAULT_CHECK_INTERVAL
                }
            },
        };

        let smartctl = lookup("SMARTCTL_LOCATION")
            .map_or_else(|| PathBuf::from(DEFAULT_SMARTCTL), PathBuf::from);

        Ok(Self {
            check_interval,
            smartctl,
            devices: parse_devices(lookup("DEVICES").as_deref()),
            env_file: None,
            smtp,
        })
    }

    /// Effective configuration as pretty JSON, password redacted.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Effective configuration as TOML, password redacted.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Split a comma-delimited device list. Segments are trimmed and empty ones
/// dropped; nothing left means the single default device.
#[must_use]
pub fn parse_devices(raw: Option<&str>) -> Vec<String> {
    let devices: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect();
    if devices.is_empty() {
        vec![DEFAULT_DEVICE.to_string()]
    } else {
        devices
    }
}

fn load_env_file(path: &Path, logger: &Logger) -> Result<EnvFile> {
    let file = EnvFile::load(path)?;
    for skipped in file.skipped() {
        logger.warn(
            EventType::EnvFileLineSkipped,
            format!(
                "ignoring invalid line {} in env file {}: {}",
                skipped.line,
                path.display(),
                skipped.content
            ),
        );
    }
    logger.info(
        EventType::ConfigLoaded,
        format!("loaded {} variables from {}", file.len(), path.display()),
    );
    Ok(file)
}

fn non_empty(raw: String) -> Option<String> {
    if raw.trim().is_empty() { None } else { Some(raw) }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().and_then(non_empty)
}

#[allow(clippy::ptr_arg)]
fn serialize_redacted<S: Serializer>(_: &String, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str("********")
}
