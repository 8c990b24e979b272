#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ability;
mod ai;
mod common;
mod config;
mod field;
mod fleet;
mod game;
#[cfg(feature = "std")]
pub mod keymap;
#[cfg(feature = "std")]
mod logging;
pub mod observer;
#[cfg(feature = "std")]
mod player_cli;
pub mod prelude;
mod ship;
pub mod snapshot;

pub use ability::{
    Ability, AbilityAction, AbilityCounts, AbilityInput, AbilityManager, AbilityOutcome,
    BarrageHit, ScanReading,
};
pub use ai::*;
pub use common::*;
pub use config::*;
pub use field::*;
pub use fleet::*;
pub use game::*;
#[cfg(feature = "std")]
pub use keymap::{Command, Keymap};
#[cfg(feature = "std")]
pub use logging::{init_logging, resolve_level, LOG_ENV};
pub use observer::{GameObserver, GameView, Observers};
#[cfg(feature = "std")]
pub use player_cli::*;
pub use ship::*;
pub use snapshot::{AbilitiesData, FieldData, GameSnapshot, ShipData};
