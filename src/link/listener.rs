use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::error::PipeError;

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Wildcard addresses for every address family, IPv4 first.
pub fn candidate_addresses(port: u16) -> [SocketAddr; 2] {
    [
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
    ]
}

/// Bind the first candidate address that works.
pub fn bind(port: u16) -> Result<TcpListener, PipeError> {
    for candidate in candidate_addresses(port) {
        match TcpListener::bind(candidate) {
            Ok(listener) => {
                info!(%candidate, "listening for peer");
                return Ok(listener);
            }
            Err(err) => debug!(%candidate, "skipping listener candidate: {}", err),
        }
    }
    Err(PipeError::NoListener { port })
}

/// Wait up to `timeout` for a single peer.
///
/// Takes the listener by value so it is closed on every return path.
pub fn accept_one(
    listener: TcpListener,
    timeout: Duration,
) -> Result<(TcpStream, SocketAddr), PipeError> {
    listener.set_nonblocking(true)?;
    let deadline = deadline_after(timeout);

    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                // Some platforms hand out accepted sockets that inherit O_NONBLOCK.
                stream.set_nonblocking(false)?;
                info!(%peer, "accepted peer");
                return Ok((stream, peer));
            }
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                let pause = match deadline {
                    Some(deadline) => {
                        let now = Instant::now();
                        if now >= deadline {
                            return Err(PipeError::AcceptTimeout);
                        }
                        ACCEPT_POLL_INTERVAL.min(deadline - now)
                    }
                    None => ACCEPT_POLL_INTERVAL,
                };
                thread::sleep(pause);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
}

/// `None` when the timeout reaches past what `Instant` can represent.
fn deadline_after(timeout: Duration) -> Option<Instant> {
    Instant::now().checked_add(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_port() -> u16 {
        TcpListener::bind("0.0.0.0:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[test]
    fn candidates_cover_both_families() {
        let [v4, v6] = candidate_addresses(10000);
        assert!(v4.is_ipv4() && v4.ip().is_unspecified());
        assert!(v6.is_ipv6() && v6.ip().is_unspecified());
        assert_eq!(v4.port(), 10000);
    }

    #[test]
    fn accept_times_out_without_peer() {
        let listener = bind(free_port()).unwrap();
        let started = Instant::now();
        let err = accept_one(listener, Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, PipeError::AcceptTimeout));
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn accepts_single_peer_in_blocking_mode() {
        let port = free_port();
        let listener = bind(port).unwrap();
        let client = thread::spawn(move || TcpStream::connect(("127.0.0.1", port)).unwrap());

        let (stream, _) = accept_one(listener, Duration::from_secs(5)).unwrap();
        client.join().unwrap();
        assert_eq!(stream.read_timeout().unwrap(), None);
    }

    #[test]
    fn huge_timeout_means_no_deadline() {
        assert!(deadline_after(Duration::MAX).is_none());
        assert!(deadline_after(Duration::from_secs(u64::MAX)).is_none());
        assert!(deadline_after(Duration::from_secs(60)).is_some());
    }

    #[test]
    fn accepts_peer_with_unrepresentable_timeout() {
        let port = free_port();
        let listener = bind(port).unwrap();
        let client = thread::spawn(move || TcpStream::connect(("127.0.0.1", port)).unwrap());

        let (_stream, peer) = accept_one(listener, Duration::from_secs(u64::MAX)).unwrap();
        let client = client.join().unwrap();
        assert_eq!(peer, client.local_addr().unwrap());
    }

    #[test]
    fn reports_exhausted_candidates() {
        let taken = TcpListener::bind("0.0.0.0:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let _taken_v6 = TcpListener::bind(("::", port));

        match bind(port) {
            Err(PipeError::NoListener { port: reported }) => assert_eq!(reported, port),
            other => panic!("expected NoListener, got {other:?}"),
        }
    }
}
