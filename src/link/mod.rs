pub mod client;
pub mod connection;
pub mod establish;
pub mod listener;

pub use client::{connect, ConnectAttempt};
pub use connection::{Link, Role};
pub use establish::{establish, Establishment};
