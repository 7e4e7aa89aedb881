//! # ARMADA Session Layer
//!
//! The authoritative match orchestrator for two-player battleship.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SESSION ORCHESTRATOR                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Connecting ──► Placing ──► Battling ──► Ended              │
//! │                    │            │                           │
//! │        ┌───────────┴──────┐     │                           │
//! │        │ two Placement    │     │  TurnScheduler            │
//! │        │ Coordinators     │     │  (barrier, hand-off,      │
//! │        │ (joined)         │     │   skip-on-elimination)    │
//! │        └──────────────────┘     │                           │
//! │                                 ▼                           │
//! │                     BoardEngine capability                  │
//! │                     (armada_engine, injected)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules of the Layer
//!
//! 1. **The server validates everything** - clients only submit command text
//! 2. **Player mistakes are recoverable** - malformed or illegal commands are
//!    reported and never end the match
//! 3. **Transport failures are fatal** - a dropped connection abandons the
//!    match; there is no reconnect
//! 4. **`Connection::receive` is the only suspension point**

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod connection;
pub mod error;
pub mod placement;
pub mod protocol;
pub mod scheduler;
pub mod session;

// Re-exports for convenience
pub use connection::Connection;
pub use error::SessionError;
pub use placement::PlacementCoordinator;
pub use protocol::{ClientMessage, PlayerSlot, ServerMessage};
pub use scheduler::{SchedulerPhase, TurnScheduler};
pub use session::{Phase, Session, SessionConfig};

/// Default TCP port the server listens on.
pub const DEFAULT_PORT: u16 = 12345;
