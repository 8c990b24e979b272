//! Commonly used types and utilities for ease of import.

pub use crate::{
    Ability, AbilityManager, BattleError, CellStatus, Game, GameField, GameStatus, Orientation,
    SegmentStatus, Ship, ShipId, ShipManager,
};

#[cfg(feature = "std")]
pub use crate::{print_fields, CliPlayer, Keymap, TerminalRenderer};
