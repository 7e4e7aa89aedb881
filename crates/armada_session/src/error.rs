//! # Session Errors
//!
//! Transport-level failures. These are fatal to a match: the orchestrator
//! propagates them up and tears the session down. Player mistakes (bad
//! commands, illegal placements) are NOT errors at this level; they are
//! reported back over the wire and the loop continues.

use thiserror::Error;

/// A failure that ends the session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The peer closed its connection.
    #[error("connection closed by peer")]
    ConnectionClosed,
    /// Reading from or writing to the transport failed.
    #[error("transport i/o failure: {0}")]
    Io(#[from] std::io::Error),
    /// A frame arrived that is not a valid message.
    #[error("malformed message framing: {0}")]
    Codec(#[from] serde_json::Error),
}
