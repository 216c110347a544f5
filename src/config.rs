use std::time::Duration;

use crate::address::EndpointAddress;
use crate::error::PipeError;

/// Idle timeout applied to the established link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleTimeout {
    /// Reads and writes block for as long as it takes.
    Disabled,
    After(Duration),
}

impl IdleTimeout {
    pub fn from_secs(secs: u64) -> Self {
        IdleTimeout::After(Duration::from_secs(secs))
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            IdleTimeout::Disabled => None,
            IdleTimeout::After(duration) => Some(*duration),
        }
    }
}

impl Default for IdleTimeout {
    fn default() -> Self {
        IdleTimeout::from_secs(60)
    }
}

/// Parse the idle timeout argument: seconds, or `none` in any case.
pub fn parse_idle_timeout(value: &str) -> Result<IdleTimeout, PipeError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("none") {
        return Ok(IdleTimeout::Disabled);
    }
    value
        .parse::<u64>()
        .map(IdleTimeout::from_secs)
        .map_err(|_| PipeError::InvalidTimeout(value.to_string()))
}

/// Parse a whole number of seconds for the connect/accept phases.
pub fn parse_seconds(value: &str) -> Result<Duration, PipeError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(PipeError::InvalidTimeout(value.to_string())),
    }
}

/// The three independent timeouts of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// How long the outbound connection attempt may take.
    pub connect: Duration,
    /// How long to wait for a peer after falling back to listening.
    pub accept: Duration,
    /// Applied to every read and write once the link is up.
    pub idle: IdleTimeout,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(1),
            accept: Duration::from_secs(60),
            idle: IdleTimeout::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeConfig {
    pub address: EndpointAddress,
    pub timeouts: TimeoutPolicy,
}
