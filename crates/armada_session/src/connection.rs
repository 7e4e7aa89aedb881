//! # Connection
//!
//! One bidirectional discrete-message channel per player.
//!
//! ## Design
//!
//! - One JSON object per line = one message; FIFO within the connection
//! - [`Connection::receive`] is the session layer's only suspension point:
//!   it parks the caller until a full line arrives or the peer hangs up
//! - Works over any `AsyncRead + AsyncWrite` stream: `TcpStream` in
//!   production, `tokio::io::duplex` in tests

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::SessionError;

/// A discrete-message channel over a byte stream.
pub struct Connection<S> {
    io: BufReader<S>,
    line: String,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    /// Wraps a stream.
    pub fn new(stream: S) -> Self {
        Self {
            io: BufReader::new(stream),
            line: String::new(),
        }
    }

    /// Sends one message and flushes it.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::Io`] when the transport rejects the write.
    pub async fn send<M: Serialize>(&mut self, message: &M) -> Result<(), SessionError> {
        let mut frame = serde_json::to_vec(message)?;
        frame.push(b'\n');
        self.io.write_all(&frame).await?;
        self.io.flush().await?;
        Ok(())
    }

    /// Receives the next message, suspending until one is available.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::ConnectionClosed`] on EOF, and with
    /// [`SessionError::Codec`] when the line is not a valid message -
    /// both are fatal to the session.
    pub async fn receive<M: DeserializeOwned>(&mut self) -> Result<M, SessionError> {
        self.line.clear();
        let read = self.io.read_line(&mut self.line).await?;
        if read == 0 {
            return Err(SessionError::ConnectionClosed);
        }
        Ok(serde_json::from_str(self.line.trim_end())?)
    }
}
