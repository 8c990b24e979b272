//! Ship definitions and per-segment damage tracking.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::common::BattleError;
use crate::config::{MAX_SHIP_LENGTH, MIN_SHIP_LENGTH};

/// Orientation of a ship on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Step between consecutive segments as `(dx, dy)`.
    pub fn step(self) -> (usize, usize) {
        match self {
            Orientation::Horizontal => (1, 0),
            Orientation::Vertical => (0, 1),
        }
    }

    /// Ordinal used in save files.
    pub fn ordinal(self) -> u8 {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Orientation::Horizontal),
            1 => Some(Orientation::Vertical),
            _ => None,
        }
    }
}

/// Damage state of a single ship segment, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentStatus {
    Intact,
    Damaged,
    Destroyed,
}

impl SegmentStatus {
    /// Position on the damage scale; also the save file ordinal.
    pub fn ordinal(self) -> u8 {
        match self {
            SegmentStatus::Intact => 0,
            SegmentStatus::Damaged => 1,
            SegmentStatus::Destroyed => 2,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(SegmentStatus::Intact),
            1 => Some(SegmentStatus::Damaged),
            2 => Some(SegmentStatus::Destroyed),
            _ => None,
        }
    }

    /// Damage units needed to bring an intact segment to this status.
    pub fn damage_from_intact(self) -> i32 {
        i32::from(self.ordinal())
    }
}

/// A single vessel with individually tracked segments.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    orientation: Orientation,
    segments: Vec<SegmentStatus>,
}

impl Ship {
    /// Build a ship of `length` intact segments.
    pub fn new(length: usize, orientation: Orientation) -> Result<Self, BattleError> {
        if !(MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH).contains(&length) {
            return Err(BattleError::InvalidShipLength(length));
        }
        Ok(Ship {
            orientation,
            segments: vec![SegmentStatus::Intact; length],
        })
    }

    pub fn length(&self) -> usize {
        self.segments.len()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Status of the segment at `index`.
    pub fn segment_status(&self, index: usize) -> Result<SegmentStatus, BattleError> {
        self.segments
            .get(index)
            .copied()
            .ok_or(BattleError::IndexOutOfRange {
                index,
                length: self.segments.len(),
            })
    }

    /// All segment statuses from bow (index 0) to stern.
    pub fn segments(&self) -> &[SegmentStatus] {
        &self.segments
    }

    /// Add `amount` damage units to segment `index`.
    ///
    /// Damage accumulates on the status scale and only ever moves a segment
    /// towards `Destroyed`; further damage on a destroyed segment is ignored.
    pub fn apply_damage(&mut self, index: usize, amount: i32) -> Result<(), BattleError> {
        let length = self.segments.len();
        let segment = self
            .segments
            .get_mut(index)
            .ok_or(BattleError::IndexOutOfRange { index, length })?;
        if amount < 0 {
            return Err(BattleError::InvalidArgument("damage cannot be negative"));
        }

        let total = i32::from(segment.ordinal()).saturating_add(amount);
        if total >= SegmentStatus::Destroyed.damage_from_intact() {
            *segment = SegmentStatus::Destroyed;
        } else if total >= SegmentStatus::Damaged.damage_from_intact() {
            *segment = SegmentStatus::Damaged;
        }
        Ok(())
    }

    /// `true` once every segment is destroyed.
    pub fn is_sunk(&self) -> bool {
        self.segments
            .iter()
            .all(|s| *s == SegmentStatus::Destroyed)
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ length: {}, orientation: {:?}, segments: {:?} }}",
            self.segments.len(),
            self.orientation,
            self.segments,
        )
    }
}
