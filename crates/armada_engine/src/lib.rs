//! # ARMADA Board Engine
//!
//! Board state and attack resolution for two-player battleship.
//!
//! The session layer never touches grids directly. It consumes the
//! [`BoardEngine`] capability:
//!
//! - **Placement legality**: bounds, overlap, duplicate classes, and the
//!   ship catalog are validated here, not by the server.
//! - **Attack resolution**: out-of-bounds and repeat attacks are rejected;
//!   everything else is a miss, a hit, or a sink.
//! - **Loss detection**: a player has lost once their whole fleet is sunk.
//!
//! ## Architecture Rules
//!
//! 1. **One engine per player** - an engine owns exactly one player's grids
//! 2. **Attacks are cross-engine** - the attacker's engine marks its target
//!    grid, the opponent's engine takes the damage
//! 3. **No I/O** - the engine renders grids to strings and nothing else
//!
//! ## Example
//!
//! ```rust
//! use armada_engine::{BoardEngine, GridBoard, Orientation, AttackOutcome};
//!
//! let mut mine = GridBoard::new();
//! let mut theirs = GridBoard::new();
//! theirs.place_ship("destroyer", 0, 0, Orientation::Horizontal).unwrap();
//! assert_eq!(mine.attack(0, 0, &mut theirs), AttackOutcome::Hit);
//! assert_eq!(mine.attack(0, 1, &mut theirs), AttackOutcome::Sunk);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

mod grid;

pub use grid::{GridBoard, ShipClass};

use thiserror::Error;

/// Side length of each square grid.
pub const GRID_SIZE: usize = 10;

/// Number of distinct ships each player must place before battle.
pub const FLEET_SIZE: usize = 5;

/// Orientation of a placed ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// The ship extends to the right of its start cell.
    Horizontal,
    /// The ship extends downward from its start cell.
    Vertical,
}

/// Why a placement request was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Some cell of the ship would fall outside the grid.
    #[error("ship extends out of bounds")]
    OutOfBounds,
    /// Some cell of the ship is already occupied.
    #[error("ship overlaps an existing ship")]
    Overlap,
    /// A ship of this class has already been placed.
    #[error("ship class already placed: {0}")]
    DuplicateShip(ShipClass),
    /// The ship token does not name a class in the catalog.
    #[error("unknown ship class: {0:?}")]
    UnknownShip(String),
}

/// Result of resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Coordinates fall outside the grid. Rejected, nothing changed.
    OutOfBounds,
    /// The attacker already fired at this cell. Rejected, nothing changed.
    AlreadyAttacked,
    /// No ship at the target cell.
    Miss,
    /// A ship was hit but still floats.
    Hit,
    /// The hit finished off a ship.
    Sunk,
}

/// The board capability consumed by the session orchestrator.
///
/// One handle per player. Mutating operations never touch the other
/// player's handle except through the explicit `opponent` parameter of
/// [`BoardEngine::attack`].
pub trait BoardEngine {
    /// Places a ship named by `ship` with its start cell at `(x, y)`.
    ///
    /// Ship catalog validation is the engine's job: an unrecognized token
    /// is a [`PlacementError::UnknownShip`] rejection, not a panic.
    ///
    /// # Errors
    ///
    /// Returns a [`PlacementError`] when the placement is illegal; the
    /// board is unchanged in that case.
    fn place_ship(
        &mut self,
        ship: &str,
        x: u16,
        y: u16,
        orientation: Orientation,
    ) -> Result<(), PlacementError>;

    /// Fires at `(x, y)` on the opponent's board.
    ///
    /// Rejected outcomes ([`AttackOutcome::OutOfBounds`],
    /// [`AttackOutcome::AlreadyAttacked`]) leave both boards unchanged.
    fn attack(&mut self, x: u16, y: u16, opponent: &mut Self) -> AttackOutcome;

    /// Returns true once this player's entire fleet has been sunk.
    fn has_lost(&self) -> bool;

    /// Renders this player's own grid (ships and incoming damage).
    fn render_self_grid(&self) -> String;

    /// Renders this player's view of the opponent (hits and misses only).
    fn render_target_grid(&self) -> String;
}
