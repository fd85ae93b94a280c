//! evonode - Evolution API node for workflow hosts
//!
//! Turns instance-management and message-send operations into Evolution API
//! requests. The host supplies parameters, credentials and transport through
//! the traits in [`node::host`].

pub mod config;
pub mod error;
pub mod evolution;
pub mod node;

pub use error::{Error, Result, TransportError};
