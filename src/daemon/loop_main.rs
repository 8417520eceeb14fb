//! Sweep orchestration: check each configured device in order, alert on
//! unhealthy ones, and sleep the configured interval after every device.
//!
//! The sweep is one-shot. It does not loop back to the first device; a
//! service manager or timer is expected to start the next run.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::core::config::Config;
use crate::daemon::notifications::{HealthAlert, Notifier, SmtpNotifier};
use crate::logger::jsonl::{EventType, LogEntry, Logger, Severity};
use crate::monitor::probe::{HealthProbe, SmartctlProbe};

/// What happened to one device during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceOutcome {
    Healthy,
    /// Unhealthy and the alert was delivered.
    Alerted,
    /// Unhealthy but the alert could not be delivered.
    AlertFailed,
    /// Unhealthy and alerting was disabled for this run.
    Unhealthy,
    /// The diagnostic tool failed; no classification was possible.
    Skipped,
}

/// Per-run tallies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub checked: usize,
    pub healthy: usize,
    pub alerted: usize,
    pub alert_failed: usize,
    pub unhealthy: usize,
    pub skipped: usize,
}

impl SweepSummary {
    fn record(&mut self, outcome: DeviceOutcome) {
        self.checked += 1;
        match outcome {
            DeviceOutcome::Healthy => self.healthy += 1,
            DeviceOutcome::Alerted => self.alerted += 1,
            DeviceOutcome::AlertFailed => self.alert_failed += 1,
            DeviceOutcome::Unhealthy => self.unhealthy += 1,
            DeviceOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Devices that reported a non-healthy state, alerted or not.
    #[must_use]
    pub fn unhealthy_total(&self) -> usize {
        self.alerted + self.alert_failed + self.unhealthy
    }
}

/// Operator-facing status lines, separate from the diagnostic log.
pub trait SweepReporter {
    fn healthy(&mut self, device: &str);
    fn unhealthy(&mut self, device: &str, notifying: bool);
    fn alert_sent(&mut self, device: &str);
}

/// Plain status lines on any writer (stdout in production).
pub struct PlainReporter<W: Write> {
    out: W,
}

impl PlainReporter<io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> PlainReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SweepReporter for PlainReporter<W> {
    fn healthy(&mut self, device: &str) {
        let _ = writeln!(self.out, "{}", healthy_line(device));
    }

    fn unhealthy(&mut self, device: &str, notifying: bool) {
        let _ = writeln!(self.out, "{}", unhealthy_line(device, notifying));
    }

    fn alert_sent(&mut self, _device: &str) {
        let _ = writeln!(self.out, "{}", alert_sent_line());
    }
}

#[must_use]
pub fn healthy_line(device: &str) -> String {
    format!("Disk {device} is healthy. No action required.")
}

#[must_use]
pub fn unhealthy_line(device: &str, notifying: bool) -> String {
    if notifying {
        format!("Warning/Error found on {device}. Sending email...")
    } else {
        format!("Warning/Error found on {device}.")
    }
}

#[must_use]
pub const fn alert_sent_line() -> &'static str {
    "Email sent successfully."
}

/// Knobs for a single run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Sleep after each device, including the last.
    pub interval: Duration,
    /// Send alerts for unhealthy devices.
    pub notify: bool,
}

impl SweepOptions {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.check_interval,
            notify: true,
        }
    }
}

/// Sequential checker over a device list.
pub struct Monitor<'a, P, N> {
    probe: P,
    notifier: N,
    logger: &'a Logger,
}

impl<'a> Monitor<'a, SmartctlProbe, SmtpNotifier> {
    /// Production wiring: smartctl probe and SMTP notifier from config.
    #[must_use]
    pub fn from_config(config: &Config, logger: &'a Logger) -> Self {
        Self::new(
            SmartctlProbe::new(config.smartctl.clone()),
            SmtpNotifier::new(config.smtp.clone()),
            logger,
        )
    }
}

impl<'a, P: HealthProbe, N: Notifier> Monitor<'a, P, N> {
    pub fn new(probe: P, notifier: N, logger: &'a Logger) -> Self {
        Self {
            probe,
            notifier,
            logger,
        }
    }

    /// Check one device. Every failure is logged here and folded into the outcome.
    pub fn check_device(
        &self,
        device: &str,
        notify: bool,
        reporter: &mut dyn SweepReporter,
    ) -> DeviceOutcome {
        let report = match self.probe.query(device) {
            Ok(report) => report,
            Err(err) => {
                self.logger.error(EventType::ProbeFailed, device, &err);
                return DeviceOutcome::Skipped;
            }
        };

        if report.is_healthy() {
            reporter.healthy(device);
            self.logger.log(
                &LogEntry::new(EventType::DeviceHealthy, Severity::Info)
                    .device(device)
                    .details(healthy_line(device)),
            );
            return DeviceOutcome::Healthy;
        }

        reporter.unhealthy(device, notify);
        self.logger.log(
            &LogEntry::new(EventType::DeviceUnhealthy, Severity::Warning)
                .device(device)
                .details(format!("SMART health check did not pass for {device}")),
        );
        if !notify {
            return DeviceOutcome::Unhealthy;
        }

        match self.notifier.send(&HealthAlert::from_report(&report)) {
            Ok(()) => {
                reporter.alert_sent(device);
                self.logger.log(
                    &LogEntry::new(EventType::MailSent, Severity::Info)
                        .device(device)
                        .details(format!("alert for {device} delivered")),
                );
                DeviceOutcome::Alerted
            }
            Err(err) => {
                self.logger.error(EventType::MailFailed, device, &err);
                DeviceOutcome::AlertFailed
            }
        }
    }

    /// Check every device in order, calling `sleep` with the interval after each.
    pub fn sweep_with<S>(
        &self,
        devices: &[String],
        options: &SweepOptions,
        reporter: &mut dyn SweepReporter,
        mut sleep: S,
    ) -> SweepSummary
    where
        S: FnMut(Duration),
    {
        self.logger.info(
            EventType::SweepStart,
            format!("checking {} device(s)", devices.len()),
        );

        let mut summary = SweepSummary::default();
        for device in devices {
            let outcome = self.check_device(device, options.notify, reporter);
            summary.record(outcome);
            sleep(options.interval);
        }

        self.logger.info(
            EventType::SweepComplete,
            format!(
                "checked {} device(s): {} healthy, {} unhealthy, {} skipped",
                summary.checked,
                summary.healthy,
                summary.unhealthy_total(),
                summary.skipped
            ),
        );
        summary
    }

    /// Sweep with real sleeps.
    pub fn sweep(
        &self,
        devices: &[String],
        options: &SweepOptions,
        reporter: &mut dyn SweepReporter,
    ) -> SweepSummary {
        self.sweep_with(devices, options, reporter, thread::sleep)
    }
}
