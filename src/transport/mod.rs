//! Pub/sub transport for actuation commands.
//!
//! 1. [`command`] - the outgoing command envelope
//! 2. [`session`] - broker session, send, and the fixed-frequency trigger
//!
//! The transport is a collaborator, not part of the control core: the
//! publisher only ever sees "send this envelope" and "call me once per tick".

pub mod command;
pub mod session;

use thiserror::Error;

pub use command::ActuationCommand;
pub use session::{Session, SessionConfig};

/// Errors from the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid broker address {0}: {1}")]
    InvalidBroker(String, String),

    #[error("failed to establish session with broker {0}: {1}")]
    Connect(String, String),

    #[error("failed to publish command: {0}")]
    Publish(#[from] rumqttc::ClientError),

    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
}
