//! # Grid Board
//!
//! The reference [`BoardEngine`] implementation: two 10x10 grids per player
//! (own ships vs. shots fired) and the classic five-ship fleet.
//!
//! ## Cell encoding
//!
//! Rendered grids use the numeric cell states players see in the client:
//! `0` unoccupied, `1` occupied, `2` missed, `3` hit.

use std::fmt;

use crate::{
    AttackOutcome, BoardEngine, Orientation, PlacementError, FLEET_SIZE, GRID_SIZE,
};

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
enum Cell {
    /// Empty water, never attacked.
    #[default]
    Unoccupied = 0,
    /// Part of a ship, not yet hit.
    Occupied = 1,
    /// Attacked, nothing there.
    Missed = 2,
    /// Attacked, ship damaged.
    Hit = 3,
}

/// The five ship classes of the standard fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShipClass {
    /// Length 5.
    Carrier,
    /// Length 4.
    Battleship,
    /// Length 3.
    Cruiser,
    /// Length 3.
    Submarine,
    /// Length 2.
    Destroyer,
}

impl ShipClass {
    /// Parses a command token into a ship class.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "carrier" => Some(Self::Carrier),
            "battleship" => Some(Self::Battleship),
            "cruiser" => Some(Self::Cruiser),
            "submarine" => Some(Self::Submarine),
            "destroyer" => Some(Self::Destroyer),
            _ => None,
        }
    }

    /// Number of cells the ship occupies.
    #[must_use]
    pub const fn length(self) -> usize {
        match self {
            Self::Carrier => 5,
            Self::Battleship => 4,
            Self::Cruiser | Self::Submarine => 3,
            Self::Destroyer => 2,
        }
    }

    /// The command token naming this class.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Carrier => "carrier",
            Self::Battleship => "battleship",
            Self::Cruiser => "cruiser",
            Self::Submarine => "submarine",
            Self::Destroyer => "destroyer",
        }
    }
}

impl fmt::Display for ShipClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A placed ship: class, start cell, and orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Ship {
    class: ShipClass,
    row: usize,
    col: usize,
    orientation: Orientation,
}

impl Ship {
    /// Iterates the (row, col) cells the ship occupies.
    fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (dr, dc) = match self.orientation {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        };
        (0..self.class.length()).map(move |i| (self.row + dr * i, self.col + dc * i))
    }
}

/// One player's board state.
pub struct GridBoard {
    /// Own ships and incoming damage. `x` indexes rows, `y` columns.
    self_grid: [[Cell; GRID_SIZE]; GRID_SIZE],
    /// Shots fired at the opponent.
    target_grid: [[Cell; GRID_SIZE]; GRID_SIZE],
    /// Ships still afloat.
    ships: Vec<Ship>,
    /// Classes placed so far, sunk or not. Guards against duplicates.
    placed: Vec<ShipClass>,
    /// Ships not yet sunk, seeded with the full fleet size.
    remaining: usize,
}

impl GridBoard {
    /// Creates an empty board with the full fleet still to place.
    #[must_use]
    pub fn new() -> Self {
        Self {
            self_grid: [[Cell::Unoccupied; GRID_SIZE]; GRID_SIZE],
            target_grid: [[Cell::Unoccupied; GRID_SIZE]; GRID_SIZE],
            ships: Vec::with_capacity(FLEET_SIZE),
            placed: Vec::with_capacity(FLEET_SIZE),
            remaining: FLEET_SIZE,
        }
    }

    /// Number of ships placed so far.
    #[must_use]
    pub fn ships_placed(&self) -> usize {
        self.placed.len()
    }

    /// Renders a grid in the original two-column-wide format.
    fn render(title: &str, grid: &[[Cell; GRID_SIZE]; GRID_SIZE]) -> String {
        let mut out = String::with_capacity(GRID_SIZE * GRID_SIZE * 3 + 32);
        out.push_str(title);
        out.push('\n');
        for row in grid {
            for cell in row {
                out.push_str(&format!("{:>2} ", *cell as u8));
            }
            out.push('\n');
        }
        out
    }

    /// Removes and reports a ship of the opponent that is now fully hit.
    fn take_sunk_ship(&mut self) -> Option<Ship> {
        let idx = self
            .ships
            .iter()
            .position(|ship| ship.cells().all(|(r, c)| self.self_grid[r][c] == Cell::Hit))?;
        Some(self.ships.swap_remove(idx))
    }
}

impl Default for GridBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardEngine for GridBoard {
    fn place_ship(
        &mut self,
        ship: &str,
        x: u16,
        y: u16,
        orientation: Orientation,
    ) -> Result<(), PlacementError> {
        let class = ShipClass::from_token(ship)
            .ok_or_else(|| PlacementError::UnknownShip(ship.to_string()))?;
        if self.placed.contains(&class) {
            return Err(PlacementError::DuplicateShip(class));
        }
        let candidate = Ship {
            class,
            row: x as usize,
            col: y as usize,
            orientation,
        };
        for (row, col) in candidate.cells() {
            if row >= GRID_SIZE || col >= GRID_SIZE {
                return Err(PlacementError::OutOfBounds);
            }
            if self.self_grid[row][col] == Cell::Occupied {
                return Err(PlacementError::Overlap);
            }
        }
        for (row, col) in candidate.cells() {
            self.self_grid[row][col] = Cell::Occupied;
        }
        self.ships.push(candidate);
        self.placed.push(class);
        Ok(())
    }

    fn attack(&mut self, x: u16, y: u16, opponent: &mut Self) -> AttackOutcome {
        let (row, col) = (x as usize, y as usize);
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return AttackOutcome::OutOfBounds;
        }
        if self.target_grid[row][col] != Cell::Unoccupied {
            return AttackOutcome::AlreadyAttacked;
        }
        match opponent.self_grid[row][col] {
            Cell::Unoccupied => {
                self.target_grid[row][col] = Cell::Missed;
                AttackOutcome::Miss
            }
            Cell::Occupied => {
                self.target_grid[row][col] = Cell::Hit;
                opponent.self_grid[row][col] = Cell::Hit;
                if opponent.take_sunk_ship().is_some() {
                    opponent.remaining -= 1;
                    AttackOutcome::Sunk
                } else {
                    AttackOutcome::Hit
                }
            }
            // An unattacked target cell can only map to water or an intact
            // ship cell on the opponent's side.
            Cell::Missed | Cell::Hit => {
                unreachable!("target grid out of sync with opponent self grid")
            }
        }
    }

    fn has_lost(&self) -> bool {
        self.remaining == 0
    }

    fn render_self_grid(&self) -> String {
        Self::render("Self Grid:", &self.self_grid)
    }

    fn render_target_grid(&self) -> String {
        Self::render("Target Grid:", &self.target_grid)
    }
}
