#![allow(dead_code)]

use std::net::TcpListener;
use std::time::Duration;

use netpipe::config::{IdleTimeout, TimeoutPolicy};

/// A port nobody is listening on right now.
pub fn free_port() -> u16 {
    TcpListener::bind("0.0.0.0:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

pub fn quick_timeouts() -> TimeoutPolicy {
    TimeoutPolicy {
        connect: Duration::from_secs(1),
        accept: Duration::from_secs(5),
        idle: IdleTimeout::from_secs(5),
    }
}

/// Give the first process time to fall back to listening.
pub const STARTUP_GAP: Duration = Duration::from_millis(300);
