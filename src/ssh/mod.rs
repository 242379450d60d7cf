pub mod algorithms;
pub mod client;
pub mod error;
pub mod known_hosts;

pub use client::{connect, ClientHandler};
pub use error::Error;
pub use known_hosts::{HostKeyVerifier, StrictHostKeyChecking};
