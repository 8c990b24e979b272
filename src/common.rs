//! Common types for the simulation: errors and coordinates.

use alloc::string::String;

/// A grid position, `x` is the column and `y` the row.
pub type Coord = (usize, usize);

/// Errors returned by the simulation core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    /// Coordinate lies outside the grid.
    OutOfBounds { x: usize, y: usize },
    /// Ship placement overlaps, touches another ship or leaves the grid.
    PlacementConflict,
    /// Segment index is not within the ship.
    IndexOutOfRange { index: usize, length: usize },
    /// Argument rejected by the callee.
    InvalidArgument(&'static str),
    /// Ship length outside the allowed range.
    InvalidShipLength(usize),
    /// Ship is not tracked by the fleet.
    NotFound,
    /// Ship is already on the field.
    ShipAlreadyPlaced,
    /// Ability queue is empty.
    NoAbilityAvailable,
    /// Save data is malformed.
    FileFormat(String),
    /// Configured fleet contains an invalid ship size.
    FleetInitialization { size: usize },
}

impl core::fmt::Display for BattleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BattleError::OutOfBounds { x, y } => {
                write!(f, "Cell position ({}, {}) is out of range", x, y)
            }
            BattleError::PlacementConflict => write!(
                f,
                "Cannot place ship at specified position: adjacent to or overlapping another ship"
            ),
            BattleError::IndexOutOfRange { index, length } => write!(
                f,
                "Segment index {} out of range for ship of length {}",
                index, length
            ),
            BattleError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            BattleError::InvalidShipLength(len) => write!(f, "Invalid ship length {}", len),
            BattleError::NotFound => write!(f, "Ship not found in fleet"),
            BattleError::ShipAlreadyPlaced => write!(f, "Ship is already placed on the field"),
            BattleError::NoAbilityAvailable => write!(f, "No abilities available to use"),
            BattleError::FileFormat(msg) => write!(f, "Malformed save data: {}", msg),
            BattleError::FleetInitialization { size } => {
                write!(f, "Fleet configuration contains invalid ship size {}", size)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BattleError {}
