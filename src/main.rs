use std::fmt::Display;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::debug;

use netpipe::address::{parse_port, EndpointAddress, DEFAULT_HOST, DEFAULT_PORT};
use netpipe::error::PipeError;
use netpipe::config::{parse_idle_timeout, parse_seconds, IdleTimeout, PipeConfig, TimeoutPolicy};
use netpipe::relay::Direction;
use netpipe::utils::{log, LogLevel};

/// Pipe data over a network.
///
/// Start two copies with the same arguments: whichever runs first waits for
/// the other. The copy whose standard input is a terminal displays what the
/// other copy reads from its redirected standard input.
#[derive(Parser, Debug)]
#[command(name = "netpipe", version, disable_version_flag = true)]
struct Cli {
    /// Name of computer to link with
    #[arg(default_value = DEFAULT_HOST)]
    host: String,

    /// Port used for the connection
    #[arg(default_value_t = DEFAULT_PORT, value_parser = parse_port)]
    port: u16,

    /// Seconds without activity before giving up, or "none"
    #[arg(default_value = "60", value_parser = parse_idle_timeout)]
    timeout: IdleTimeout,

    /// Seconds to wait for the outbound connection
    #[arg(long, value_name = "SECS", default_value = "1", value_parser = parse_seconds)]
    connect_timeout: Duration,

    /// Seconds to wait for a peer after falling back to listening
    #[arg(long, value_name = "SECS", default_value = "60", value_parser = parse_seconds)]
    accept_timeout: Duration,

    /// Diagnostics written to standard error
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: (),
}

impl Cli {
    fn config(&self) -> PipeConfig {
        PipeConfig {
            address: EndpointAddress::new(self.host.clone(), self.port),
            timeouts: TimeoutPolicy {
                connect: self.connect_timeout,
                accept: self.accept_timeout,
                idle: self.timeout,
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return report(err),
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(err),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    log::init(cli.log_level)?;

    let config = cli.config();
    let direction = Direction::detect();
    debug!(?config, ?direction, "starting");

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let result = netpipe::pipe::run(&config, direction, &mut input, &mut output);
    describe(result, &config.address)
}

/// Unclassified I/O failures get the pipe they broke attached; classified
/// errors already say everything.
fn describe(result: Result<u64, PipeError>, address: &EndpointAddress) -> anyhow::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(PipeError::Io(err)) => {
            Err(anyhow::Error::new(err).context(format!("pipe over {address} failed")))
        }
        Err(err) => {
            if err.is_configuration() {
                debug!("configuration error, no connection was made");
            }
            Err(err.into())
        }
    }
}

fn report(message: impl Display) -> ExitCode {
    let text = format!("{message:#}");
    eprint!("\n{}\n", text.trim_end());
    ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address() -> EndpointAddress {
        EndpointAddress::new("localhost", 10000)
    }

    #[test]
    fn io_failures_name_the_pipe() {
        let broken = io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe");
        let err = describe(Err(PipeError::Io(broken)), &address()).unwrap_err();
        assert_eq!(format!("{err:#}"), "pipe over localhost:10000 failed: broken pipe");
    }

    #[test]
    fn classified_errors_keep_their_message() {
        let err = describe(Err(PipeError::AcceptTimeout), &address()).unwrap_err();
        assert_eq!(format!("{err:#}"), "could not connect and did not receive any data");
    }

    #[test]
    fn resolution_failure_includes_cause() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "no such host");
        let err = PipeError::Resolve {
            host: "nosuchhost.invalid".to_string(),
            source: cause,
        };
        let err = describe(Err(err), &address()).unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "could not resolve \"nosuchhost.invalid\": no such host"
        );
    }

    #[test]
    fn clean_end_of_stream_succeeds() {
        assert!(describe(Ok(42), &address()).is_ok());
    }
}
