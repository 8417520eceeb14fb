#![forbid(unsafe_code)]

//! SMART Health Notifier (shn): polls local disks through `smartctl` and
//! mails the operator when a device reports a non-healthy state.
//!
//! A run is a single sweep: resolve configuration from the environment (and
//! an optional env file), check each configured device in order, sleep the
//! configured interval after each one, then exit.
//!
//! # Library usage
//!
//! ```rust,no_run
//! use smart_health_notifier::prelude::*;
//!
//! let logger = Logger::stderr(LogFormat::Text, false);
//! let config = Config::load(None, &logger)?;
//! let monitor = Monitor::from_config(&config, &logger);
//! let mut reporter = PlainReporter::stdout();
//! monitor.sweep(&config.devices, &SweepOptions::from_config(&config), &mut reporter);
//! # Ok::<(), ShnError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod daemon;
pub mod logger;
pub mod monitor;
