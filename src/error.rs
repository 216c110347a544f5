use std::io;

/// Every way a pipe run can end unsuccessfully.
///
/// The `Display` text is the exact message shown to the user before the
/// process exits with status 1.
#[derive(Debug, thiserror::Error)]
pub enum PipeError {
    #[error("invalid port {value:?}: expected an integer in {min}..={max}")]
    InvalidPort { value: String, min: u16, max: u16 },

    #[error("invalid timeout {0:?}: expected a non-negative integer or \"none\"")]
    InvalidTimeout(String),

    #[error("could not resolve \"{host}\"")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("could not connect to \"{host}\" computer")]
    RemoteUnavailable { host: String },

    #[error("could not create server socket on port {port}")]
    NoListener { port: u16 },

    #[error("could not connect and did not receive any data")]
    AcceptTimeout,

    #[error("no activity within timeout period")]
    IdleTimeout,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PipeError {
    /// Configuration errors are detected before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PipeError::InvalidPort { .. } | PipeError::InvalidTimeout(_) | PipeError::Resolve { .. }
        )
    }
}

/// Whether an I/O error is the OS reporting an expired socket timeout.
///
/// Unix reports `WouldBlock` for `SO_RCVTIMEO`/`SO_SNDTIMEO`, Windows reports
/// `TimedOut`.
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
