use std::io::{self, IsTerminal, Read, Write};

use tracing::debug;

use crate::error::{is_timeout, PipeError};

pub const BUFFER_SIZE: usize = 1 << 12;

/// Which way bytes flow for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Someone is typing at the terminal: show what the peer sends.
    LinkToOut,
    /// Input is redirected: forward it to the peer.
    InToLink,
}

impl Direction {
    pub fn for_input(stdin_is_terminal: bool) -> Self {
        if stdin_is_terminal {
            Direction::LinkToOut
        } else {
            Direction::InToLink
        }
    }

    pub fn detect() -> Self {
        Self::for_input(io::stdin().is_terminal())
    }
}

/// Which end of a copy is the network link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnd {
    Source,
    Sink,
}

/// Run one direction of the pipe until end-of-stream.
///
/// Returns the number of bytes relayed.
pub fn relay<L, I, O>(
    link: &mut L,
    direction: Direction,
    input: &mut I,
    output: &mut O,
) -> Result<u64, PipeError>
where
    L: Read + Write + ?Sized,
    I: Read + ?Sized,
    O: Write + ?Sized,
{
    let total = match direction {
        Direction::LinkToOut => copy_chunks(link, output, LinkEnd::Source)?,
        Direction::InToLink => copy_chunks(input, link, LinkEnd::Sink)?,
    };
    debug!(?direction, bytes = total, "relay finished");
    Ok(total)
}

/// Copy `source` into `sink` one chunk at a time, writing each chunk in full
/// before reading the next.
pub fn copy_chunks<R, W>(source: &mut R, sink: &mut W, link_end: LinkEnd) -> Result<u64, PipeError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(classify(err, link_end == LinkEnd::Source)),
        };

        let from_link = link_end == LinkEnd::Sink;
        sink.write_all(&buffer[..read])
            .and_then(|_| sink.flush())
            .map_err(|err| classify(err, from_link))?;
        total += read as u64;
    }
}

fn classify(err: io::Error, on_link: bool) -> PipeError {
    if on_link && is_timeout(&err) {
        PipeError::IdleTimeout
    } else {
        PipeError::Io(err)
    }
}
