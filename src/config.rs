//! Fixed game configuration.

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 10;

pub const MIN_SHIP_LENGTH: usize = 1;
pub const MAX_SHIP_LENGTH: usize = 4;

pub const NUM_SHIPS: usize = 10;
/// Ship lengths of one side's fleet, in placement order.
pub const FLEET: [usize; NUM_SHIPS] = [4, 3, 3, 2, 2, 2, 1, 1, 1, 1];

/// How many random positions are tried per ship before giving up.
pub const PLACEMENT_ATTEMPTS: usize = 1000;

/// Upper bound on queued abilities; larger saves are rejected and sinkings
/// past it grant nothing.
pub const MAX_ABILITIES: usize = 1024;

pub const SAVE_EXTENSION: &str = "sav";

/// Append the `.sav` extension unless the name already carries it.
#[cfg(feature = "std")]
pub fn with_save_extension(name: &str) -> std::string::String {
    if name.ends_with(&std::format!(".{}", SAVE_EXTENSION)) {
        name.into()
    } else {
        std::format!("{}.{}", name, SAVE_EXTENSION)
    }
}
