use std::fmt;

use crate::error::PipeError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 10000;

pub const MIN_PORT: u16 = 1024;
pub const MAX_PORT: u16 = 65535;

/// Rendezvous point shared by both ends of a pipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAddress {
    host: String,
    port: u16,
}

impl EndpointAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Only the default host may switch to the server role when nobody answers.
    pub fn is_default_host(&self) -> bool {
        self.host.eq_ignore_ascii_case(DEFAULT_HOST)
    }
}

impl Default for EndpointAddress {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parse a port number, accepting only the unprivileged range.
pub fn parse_port(value: &str) -> Result<u16, PipeError> {
    let invalid = || PipeError::InvalidPort {
        value: value.to_string(),
        min: MIN_PORT,
        max: MAX_PORT,
    };

    let port: i64 = value.trim().parse().map_err(|_| invalid())?;
    if !(i64::from(MIN_PORT)..=i64::from(MAX_PORT)).contains(&port) {
        return Err(invalid());
    }
    u16::try_from(port).map_err(|_| invalid())
}
