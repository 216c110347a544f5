pub mod address;
pub mod config;
pub mod error;
pub mod link;
pub mod pipe;
pub mod relay;
pub mod utils;

pub use address::EndpointAddress;
pub use config::{IdleTimeout, PipeConfig, TimeoutPolicy};
pub use error::PipeError;
pub use link::{establish, Establishment, Link, Role};
pub use relay::{relay, Direction};
