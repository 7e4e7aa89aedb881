//! # Command Shape Validation
//!
//! Parses the free-form command lines players type into structured
//! commands. This layer checks SHAPE only (token count, non-negative
//! integers, a valid orientation flag); whether a placement or attack is
//! LEGAL is the board engine's call.

use armada_engine::Orientation;
use thiserror::Error;

/// Why a command line failed shape validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line was empty or whitespace.
    #[error("empty command")]
    Empty,
    /// Wrong number of whitespace-separated fields.
    #[error("expected {expected} fields, got {got}")]
    WrongArity {
        /// Fields the command requires.
        expected: usize,
        /// Fields actually present.
        got: usize,
    },
    /// A coordinate field is not a non-negative integer.
    #[error("not a non-negative integer: {0:?}")]
    BadInteger(String),
    /// The orientation flag is not 0 or 1.
    #[error("orientation must be 0 (horizontal) or 1 (vertical), got {0:?}")]
    BadOrientation(String),
}

/// A well-shaped ship placement request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementCommand {
    /// Ship class token, validated by the engine against its catalog.
    pub ship: String,
    /// Start row.
    pub x: u16,
    /// Start column.
    pub y: u16,
    /// Which way the ship extends.
    pub orientation: Orientation,
}

/// A well-shaped attack request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackCommand {
    /// Target row.
    pub x: u16,
    /// Target column.
    pub y: u16,
}

fn parse_coord(token: &str) -> Result<u16, CommandError> {
    token
        .parse::<u16>()
        .map_err(|_| CommandError::BadInteger(token.to_string()))
}

/// Parses `<ship> <x> <y> <orientation>`, orientation `0` horizontal /
/// `1` vertical (the original client convention).
///
/// # Errors
///
/// Returns a [`CommandError`] describing the first shape violation found.
pub fn parse_placement(line: &str) -> Result<PlacementCommand, CommandError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Err(CommandError::Empty);
    }
    if fields.len() != 4 {
        return Err(CommandError::WrongArity {
            expected: 4,
            got: fields.len(),
        });
    }
    let orientation = match fields[3] {
        "0" => Orientation::Horizontal,
        "1" => Orientation::Vertical,
        other => return Err(CommandError::BadOrientation(other.to_string())),
    };
    Ok(PlacementCommand {
        ship: fields[0].to_string(),
        x: parse_coord(fields[1])?,
        y: parse_coord(fields[2])?,
        orientation,
    })
}

/// Parses `<x> <y>` attack coordinates.
///
/// # Errors
///
/// Returns a [`CommandError`] describing the first shape violation found.
pub fn parse_attack(line: &str) -> Result<AttackCommand, CommandError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.is_empty() {
        return Err(CommandError::Empty);
    }
    if fields.len() != 2 {
        return Err(CommandError::WrongArity {
            expected: 2,
            got: fields.len(),
        });
    }
    Ok(AttackCommand {
        x: parse_coord(fields[0])?,
        y: parse_coord(fields[1])?,
    })
}
