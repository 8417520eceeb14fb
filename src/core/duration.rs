//! `CHECK_INTERVAL` parsing: `30m`, `1h30m`, `1h 30m`, `300ms`, `0`.
//!
//! The grammar is `humantime`'s. It has no sign, so a leading `+` or `-` is
//! peeled off here and reported alongside the magnitude.

use std::time::Duration;

use crate::core::errors::{Result, ShnError};

/// A parsed interval that remembers whether it was written as negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedDuration {
    pub negative: bool,
    pub magnitude: Duration,
}

impl SignedDuration {
    /// Negative intervals sleep for nothing.
    #[must_use]
    pub fn clamped(self) -> Duration {
        if self.negative {
            Duration::ZERO
        } else {
            self.magnitude
        }
    }
}

/// Parse an interval string. `-5m` parses as a negative interval.
pub fn parse_interval(raw: &str) -> Result<SignedDuration> {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let magnitude = humantime::parse_duration(body).map_err(|err| ShnError::ConfigParse {
        context: "duration",
        details: format!("{raw:?}: {err}"),
    })?;
    Ok(SignedDuration {
        negative: negative && !magnitude.is_zero(),
        magnitude,
    })
}
