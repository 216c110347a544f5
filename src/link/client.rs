use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::address::EndpointAddress;
use crate::error::PipeError;

/// Outcome of the outbound half of establishment.
#[derive(Debug)]
pub enum ConnectAttempt {
    Connected(TcpStream),
    /// Nothing is listening yet: refused or timed out.
    NoAnswer(io::Error),
}

/// Try every resolved address of `address` in order.
///
/// Resolution failures are configuration errors. If any address refused or
/// timed out the peer is treated as absent; otherwise the last error wins.
pub fn connect(address: &EndpointAddress, timeout: Duration) -> Result<ConnectAttempt, PipeError> {
    let resolve_error = |source| PipeError::Resolve {
        host: address.host().to_string(),
        source,
    };

    let candidates = (address.host(), address.port())
        .to_socket_addrs()
        .map_err(resolve_error)?;

    let mut absent = None;
    let mut last_error = None;
    for candidate in candidates {
        debug!(%candidate, "connecting");
        match TcpStream::connect_timeout(&candidate, timeout) {
            Ok(stream) => return Ok(ConnectAttempt::Connected(stream)),
            Err(err) => {
                debug!(%candidate, "connect failed: {}", err);
                if is_absent_peer(&err) {
                    absent = Some(err);
                } else {
                    last_error = Some(err);
                }
            }
        }
    }

    match (absent, last_error) {
        (Some(err), _) => Ok(ConnectAttempt::NoAnswer(err)),
        (None, Some(err)) => Err(PipeError::Io(err)),
        (None, None) => Err(resolve_error(io::Error::new(
            io::ErrorKind::NotFound,
            "no addresses found",
        ))),
    }
}

fn is_absent_peer(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionRefused | io::ErrorKind::TimedOut
    )
}
