use tracing::{debug, info};

use super::client::{self, ConnectAttempt};
use super::connection::{Link, Role};
use super::listener;
use crate::address::EndpointAddress;
use crate::config::TimeoutPolicy;
use crate::error::PipeError;

/// Result of resolving who is client and who is server.
#[derive(Debug)]
pub enum Establishment {
    ConnectedAsClient(Link),
    ConnectedAsServer(Link),
    Failed(PipeError),
}

impl Establishment {
    fn from_result(role: Role, result: Result<Link, PipeError>) -> Self {
        match (role, result) {
            (Role::Client, Ok(link)) => Establishment::ConnectedAsClient(link),
            (Role::Server, Ok(link)) => Establishment::ConnectedAsServer(link),
            (_, Err(err)) => Establishment::Failed(err),
        }
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Establishment::ConnectedAsClient(_) => Some(Role::Client),
            Establishment::ConnectedAsServer(_) => Some(Role::Server),
            Establishment::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<Link, PipeError> {
        match self {
            Establishment::ConnectedAsClient(link) | Establishment::ConnectedAsServer(link) => {
                Ok(link)
            }
            Establishment::Failed(err) => Err(err),
        }
    }
}

/// Connect to `address`, or become the server if nobody is there yet.
///
/// Falling back to listening only happens for the default host: an explicit
/// host means the user already knows where the server is.
pub fn establish(address: &EndpointAddress, timeouts: &TimeoutPolicy) -> Establishment {
    match client::connect(address, timeouts.connect) {
        Ok(ConnectAttempt::Connected(stream)) => {
            info!(%address, "connected as client");
            let link = Link::new(stream, Role::Client, timeouts.idle).map_err(PipeError::from);
            Establishment::from_result(Role::Client, link)
        }
        Ok(ConnectAttempt::NoAnswer(reason)) if !address.is_default_host() => {
            debug!(%address, "no answer from remote host: {}", reason);
            Establishment::Failed(PipeError::RemoteUnavailable {
                host: address.host().to_string(),
            })
        }
        Ok(ConnectAttempt::NoAnswer(reason)) => {
            info!(%address, "no peer yet ({}), switching to server role", reason);
            Establishment::from_result(Role::Server, serve(address.port(), timeouts))
        }
        Err(err) => Establishment::Failed(err),
    }
}

fn serve(port: u16, timeouts: &TimeoutPolicy) -> Result<Link, PipeError> {
    let listener = listener::bind(port)?;
    let (stream, _) = listener::accept_one(listener, timeouts.accept)?;
    Ok(Link::new(stream, Role::Server, timeouts.idle)?)
}
