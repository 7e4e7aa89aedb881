//! # Wire Protocol
//!
//! The message vocabulary exchanged between server and clients, and the
//! player-slot identity both sides agree on.
//!
//! ## Framing
//!
//! One JSON object per line is one discrete message. Delivery is FIFO per
//! connection; nothing is guaranteed about ordering across the two
//! connections - that interleaving is the orchestrator's decision.

pub mod commands;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stable player identity, bound to one connection and one board engine
/// for the whole match.
///
/// The first accepted connection is [`PlayerSlot::One`]. Code that needs
/// "the other player" goes through [`PlayerSlot::opponent`] instead of
/// branching on a player number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSlot {
    /// The first accepted connection.
    One,
    /// The second accepted connection.
    Two,
}

impl PlayerSlot {
    /// The other slot.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Zero-based index for slot-keyed arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// One-based number as shown to players.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// Everything the server can say to a client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Which slot the receiving client occupies. Sent once, first.
    RoleAssignment {
        /// The receiver's slot.
        slot: PlayerSlot,
    },
    /// Free-form text: welcome banner and instructions.
    WelcomeText {
        /// The text body.
        body: String,
    },
    /// A placement was accepted; the counter advanced.
    PlacementAccepted {
        /// The player's updated self grid, pre-rendered.
        grid: String,
    },
    /// A placement or attack command failed shape validation.
    InvalidFormat,
    /// The engine rejected a well-formed placement.
    InvalidPlacement,
    /// Both fleets are placed; battle begins.
    PlacementComplete,
    /// It is the receiving client's turn to attack.
    TurnPrompt,
    /// The other player is attacking; the receiver waits.
    OpponentWaiting {
        /// The slot currently attacking.
        slot: PlayerSlot,
    },
    /// An attack command failed shape validation. The turn is forfeited.
    InvalidInput,
    /// The attack fell outside the grid. The turn is NOT consumed.
    AttackOutOfBounds,
    /// The cell was attacked before. The turn is NOT consumed.
    AlreadyAttacked,
    /// An attack resolved at these coordinates. Sent to both players.
    AttackNotice {
        /// Attacked row.
        x: u16,
        /// Attacked column.
        y: u16,
    },
    /// The receiver's own grid after taking an attack.
    SelfGridUpdate {
        /// Pre-rendered self grid.
        grid: String,
        /// What happened, from the defender's point of view.
        narrative: String,
    },
    /// The attacker's view of the opponent after their attack resolved.
    TargetGridUpdate {
        /// Pre-rendered target grid.
        grid: String,
        /// What happened, from the attacker's point of view.
        narrative: String,
    },
    /// The match is over.
    GameOver {
        /// The winning slot.
        winner: PlayerSlot,
        /// Role-specific closing text (win or loss).
        narrative: String,
    },
}

/// Everything a client can say to the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// A free-form command line; the server validates its shape.
    Command {
        /// The raw command text.
        line: String,
    },
}

impl ClientMessage {
    /// Wraps a command line.
    pub fn command(line: impl Into<String>) -> Self {
        Self::Command { line: line.into() }
    }
}
