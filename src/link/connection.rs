use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use tracing::{debug, warn};

use crate::config::IdleTimeout;

/// Which side of the rendezvous this process ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Our outbound connection was accepted.
    Client,
    /// Nobody answered, so we listened and accepted the peer.
    Server,
}

/// The single connected byte stream of a run.
///
/// The socket is shut down in both directions and closed exactly once: either
/// through [`Link::close`] or, if that never happens, when the link is dropped.
#[derive(Debug)]
pub struct Link {
    stream: Option<TcpStream>,
    role: Role,
    peer: Option<SocketAddr>,
}

impl Link {
    pub fn new(stream: TcpStream, role: Role, idle: IdleTimeout) -> io::Result<Link> {
        apply_idle_timeout(&stream, idle)?;
        let peer = stream.peer_addr().ok();
        Ok(Link {
            stream: Some(stream),
            role,
            peer,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Shut down both directions and close the socket.
    ///
    /// Closing twice is a no-op. A peer that already tore the connection down
    /// leaves nothing to shut down and is not reported as an error.
    pub fn close(&mut self) -> io::Result<()> {
        let Some(stream) = self.stream.take() else {
            return Ok(());
        };
        debug!(peer = ?self.peer, "shutting down link");
        match stream.shutdown(Shutdown::Both) {
            Err(err) if err.kind() != io::ErrorKind::NotConnected => Err(err),
            _ => Ok(()),
        }
    }

    fn stream(&self) -> io::Result<&TcpStream> {
        self.stream
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "link already closed"))
    }
}

impl Read for Link {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut stream = self.stream()?;
        stream.read(buf)
    }
}

impl Write for Link {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stream = self.stream()?;
        stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut stream = self.stream()?;
        stream.flush()
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("failed to shut down link: {}", err);
        }
    }
}

fn apply_idle_timeout(stream: &TcpStream, idle: IdleTimeout) -> io::Result<()> {
    match idle.as_duration() {
        None => {
            stream.set_nonblocking(false)?;
            stream.set_read_timeout(None)?;
            stream.set_write_timeout(None)
        }
        // The OS rejects a zero timeout; any wait at all counts as idle.
        Some(duration) if duration.is_zero() => stream.set_nonblocking(true),
        Some(duration) => {
            stream.set_nonblocking(false)?;
            stream.set_read_timeout(Some(duration))?;
            stream.set_write_timeout(Some(duration))
        }
    }
}
