use std::io::{Read, Write};

use tracing::info;

use crate::config::PipeConfig;
use crate::error::PipeError;
use crate::link::establish;
use crate::relay::{relay, Direction};

/// Establish the link, relay one direction, then tear the link down.
///
/// The link is shut down and closed exactly once whether the relay finished,
/// timed out or failed. A relay error takes precedence over a close error.
pub fn run<I, O>(
    config: &PipeConfig,
    direction: Direction,
    input: &mut I,
    output: &mut O,
) -> Result<u64, PipeError>
where
    I: Read + ?Sized,
    O: Write + ?Sized,
{
    let establishment = establish(&config.address, &config.timeouts);
    let role = establishment.role();
    let mut link = establishment.into_result()?;
    info!(?role, peer = ?link.peer_addr(), ?direction, "link established");

    let relayed = relay(&mut link, direction, input, output);
    let closed = link.close();

    let total = relayed?;
    closed?;
    info!(bytes = total, "pipe finished");
    Ok(total)
}
