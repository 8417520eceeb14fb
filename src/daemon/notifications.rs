//! Email alerts for unhealthy devices.
//!
//! One plaintext mail per unhealthy device, submitted over SMTP with PLAIN
//! authentication. Delivery failures are returned to the caller, which logs
//! them; nothing here retries.

#![allow(missing_docs)]

use std::net::IpAddr;

use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{SmtpTransport, Transport};

use crate::core::config::SmtpConfig;
use crate::core::errors::{Result, ShnError};
use crate::monitor::health::HealthReport;

/// Subject prefix; the device name follows.
pub const SUBJECT_PREFIX: &str = "SMART Disk Warning/Error on ";

/// Separates the device name from the diagnostic text in an alert body.
const BODY_SEPARATOR: &str = ":\n";

/// An unhealthy-device notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthAlert {
    pub device: String,
    pub raw_output: String,
}

impl HealthAlert {
    #[must_use]
    pub fn new(device: impl Into<String>, raw_output: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            raw_output: raw_output.into(),
        }
    }

    #[must_use]
    pub fn from_report(report: &HealthReport) -> Self {
        Self::new(report.device.clone(), report.raw_output.clone())
    }

    /// `"<device>:\n<raw output>"`.
    #[must_use]
    pub fn body(&self) -> String {
        format!("{}{BODY_SEPARATOR}{}", self.device, self.raw_output)
    }

    #[must_use]
    pub fn subject(&self) -> String {
        subject_for(&self.body())
    }
}

/// Subject line for an alert body: the prefix plus everything before the
/// first `":\n"`.
#[must_use]
pub fn subject_for(body: &str) -> String {
    let head = body.split(BODY_SEPARATOR).next().unwrap_or_default();
    format!("{SUBJECT_PREFIX}{head}")
}

/// Delivers alerts somewhere.
pub trait Notifier {
    fn send(&self, alert: &HealthAlert) -> Result<()>;
}

/// SMTP submission to the configured relay.
pub struct SmtpNotifier {
    config: SmtpConfig,
}

impl SmtpNotifier {
    #[must_use]
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    /// Build the message without sending it.
    pub fn build_message(&self, alert: &HealthAlert) -> Result<Message> {
        let from: Mailbox = self.config.sender.parse()?;
        let to: Mailbox = self.config.recipient.parse()?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(alert.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body())?;
        Ok(message)
    }

    /// PLAIN-authenticated transport. STARTTLS is mandatory unless the relay
    /// is on loopback.
    fn transport(&self) -> Result<SmtpTransport> {
        let port = parse_port(&self.config.port)?;
        let params = TlsParameters::new(self.config.server.clone())?;
        let tls = if is_loopback(&self.config.server) {
            Tls::Opportunistic(params)
        } else {
            Tls::Required(params)
        };
        Ok(SmtpTransport::builder_dangerous(&self.config.server)
            .port(port)
            .tls(tls)
            .credentials(Credentials::new(
                self.config.sender.clone(),
                self.config.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain])
            .build())
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.parse::<u16>().map_err(|err| ShnError::Mail {
        context: "port",
        details: format!("SMTP_PORT={raw:?}: {err}"),
    })
}

/// `localhost` or a loopback address literal.
fn is_loopback(server: &str) -> bool {
    server.eq_ignore_ascii_case("localhost")
        || server
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}

impl Notifier for SmtpNotifier {
    fn send(&self, alert: &HealthAlert) -> Result<()> {
        let message = self.build_message(alert)?;
        self.transport()?.send(&message)?;
        Ok(())
    }
}
