//! Game field: cell statuses, ship occupancy and attack resolution.
//!
//! Ships are owned by a [`ShipManager`]; each occupied cell stores the
//! [`ShipId`] and segment index of its occupant, so every operation that
//! reads or damages a ship takes the owning fleet alongside the field.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use log::debug;

use crate::common::{BattleError, Coord};
use crate::config::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::fleet::{ShipId, ShipManager};
use crate::ship::{Orientation, SegmentStatus};

/// What is known about a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum CellStatus {
    Unknown,
    Empty,
    Ship,
    Miss,
}

impl CellStatus {
    /// Ordinal used in save files.
    pub fn ordinal(self) -> u8 {
        match self {
            CellStatus::Unknown => 0,
            CellStatus::Empty => 1,
            CellStatus::Ship => 2,
            CellStatus::Miss => 3,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(CellStatus::Unknown),
            1 => Some(CellStatus::Empty),
            2 => Some(CellStatus::Ship),
            3 => Some(CellStatus::Miss),
            _ => None,
        }
    }
}

/// Occupying ship and the segment index it has at this cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub ship: ShipId,
    pub segment: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    status: CellStatus,
    occupant: Option<Occupant>,
}

impl Cell {
    const EMPTY: Cell = Cell {
        status: CellStatus::Empty,
        occupant: None,
    };
}

/// A `width × height` grid holding one side's ships.
#[derive(Clone, PartialEq, Eq)]
pub struct GameField {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    ships: Vec<ShipId>,
    double_damage: bool,
}

impl GameField {
    /// Create an empty field of the given size.
    pub fn new(width: usize, height: usize) -> Result<Self, BattleError> {
        if width == 0 || height == 0 {
            return Err(BattleError::InvalidArgument("field dimensions must be positive"));
        }
        let size = width
            .checked_mul(height)
            .ok_or(BattleError::InvalidArgument("field dimensions too large"))?;
        Ok(GameField {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
            ships: Vec::new(),
            double_damage: false,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_valid_position(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, BattleError> {
        if self.is_valid_position(x, y) {
            Ok(y * self.width + x)
        } else {
            Err(BattleError::OutOfBounds { x, y })
        }
    }

    pub fn cell_status(&self, x: usize, y: usize) -> Result<CellStatus, BattleError> {
        Ok(self.cells[self.index(x, y)?].status)
    }

    /// Ship and segment occupying `(x, y)`, if any.
    pub fn occupant_at(&self, x: usize, y: usize) -> Result<Option<Occupant>, BattleError> {
        Ok(self.cells[self.index(x, y)?].occupant)
    }

    /// Distinct ships placed on this field, in placement order.
    pub fn ships(&self) -> &[ShipId] {
        &self.ships
    }

    pub fn is_double_damage_armed(&self) -> bool {
        self.double_damage
    }

    /// Arm the one-shot multiplier for the next [`GameField::attack_cell`].
    pub fn activate_double_damage(&mut self) {
        self.double_damage = true;
    }

    /// Cells covered by a ship of `length` anchored at `(x, y)`, or `None`
    /// when any of them falls outside the grid.
    fn footprint(
        &self,
        x: usize,
        y: usize,
        length: usize,
        orientation: Orientation,
    ) -> Option<Vec<Coord>> {
        let (dx, dy) = orientation.step();
        (0..length)
            .map(|i| {
                let nx = x.checked_add(i * dx)?;
                let ny = y.checked_add(i * dy)?;
                self.is_valid_position(nx, ny).then_some((nx, ny))
            })
            .collect()
    }

    fn is_adjacent_to_ship(&self, x: usize, y: usize) -> bool {
        let xs = x.saturating_sub(1)..=(x + 1).min(self.width - 1);
        xs.flat_map(|nx| {
            let ys = y.saturating_sub(1)..=(y + 1).min(self.height - 1);
            ys.map(move |ny| (nx, ny))
        })
        .any(|(nx, ny)| self.cells[ny * self.width + nx].status == CellStatus::Ship)
    }

    /// Whether a ship of `length` may be placed at `(x, y)` without touching
    /// or overlapping another ship.
    pub fn can_place_ship(&self, length: usize, x: usize, y: usize, orientation: Orientation) -> bool {
        match self.footprint(x, y, length, orientation) {
            Some(cells) => cells.iter().all(|&(cx, cy)| {
                self.cells[cy * self.width + cx].status == CellStatus::Empty
                    && !self.is_adjacent_to_ship(cx, cy)
            }),
            None => false,
        }
    }

    /// Place fleet ship `id` with its bow at `(x, y)`.
    ///
    /// Every covered cell is validated before any cell is written.
    pub fn place_ship(
        &mut self,
        fleet: &mut ShipManager,
        id: ShipId,
        x: usize,
        y: usize,
        orientation: Orientation,
    ) -> Result<(), BattleError> {
        let length = fleet.ship(id)?.length();
        if self.ships.contains(&id) {
            return Err(BattleError::ShipAlreadyPlaced);
        }
        if !self.can_place_ship(length, x, y, orientation) {
            return Err(BattleError::PlacementConflict);
        }
        let cells = self
            .footprint(x, y, length, orientation)
            .ok_or(BattleError::PlacementConflict)?;
        fleet.ship_mut(id)?.set_orientation(orientation);
        self.occupy(id, &cells);
        debug!("placed ship {} ({}) at ({}, {}) {:?}", id.0, length, x, y, orientation);
        Ok(())
    }

    /// Put a previously captured ship back on the field.
    ///
    /// Only bounds and overlap are checked; the recorded layout was legal
    /// when it was captured.
    pub(crate) fn restore_ship(
        &mut self,
        fleet: &mut ShipManager,
        id: ShipId,
        x: usize,
        y: usize,
        orientation: Orientation,
    ) -> Result<(), BattleError> {
        let length = fleet.ship(id)?.length();
        if self.ships.contains(&id) {
            return Err(BattleError::ShipAlreadyPlaced);
        }
        let cells = self
            .footprint(x, y, length, orientation)
            .ok_or(BattleError::PlacementConflict)?;
        if cells
            .iter()
            .any(|&(cx, cy)| self.cells[cy * self.width + cx].occupant.is_some())
        {
            return Err(BattleError::PlacementConflict);
        }
        fleet.ship_mut(id)?.set_orientation(orientation);
        self.occupy(id, &cells);
        Ok(())
    }

    fn occupy(&mut self, id: ShipId, cells: &[Coord]) {
        for (segment, &(cx, cy)) in cells.iter().enumerate() {
            self.cells[cy * self.width + cx] = Cell {
                status: CellStatus::Ship,
                occupant: Some(Occupant { ship: id, segment }),
            };
        }
        self.ships.push(id);
    }

    /// Overwrite the status of a cell that holds no ship.
    pub(crate) fn set_cell_status(
        &mut self,
        x: usize,
        y: usize,
        status: CellStatus,
    ) -> Result<(), BattleError> {
        let idx = self.index(x, y)?;
        let cell = &mut self.cells[idx];
        if cell.occupant.is_some() || status == CellStatus::Ship {
            return Err(BattleError::InvalidArgument("cell status conflicts with ship occupancy"));
        }
        cell.status = status;
        Ok(())
    }

    /// Fire at `(x, y)`.
    ///
    /// Returns `true` when this shot sank the ship it hit. Empty and unknown
    /// cells become misses. An armed double damage is spent by this call
    /// whatever the shot hits.
    pub fn attack_cell(
        &mut self,
        x: usize,
        y: usize,
        fleet: &mut ShipManager,
    ) -> Result<bool, BattleError> {
        let idx = self.index(x, y)?;
        let doubled = core::mem::take(&mut self.double_damage);
        let cell = &mut self.cells[idx];
        match (cell.status, cell.occupant) {
            (CellStatus::Ship, Some(Occupant { ship, segment })) => {
                let damage = if doubled { 2 } else { 1 };
                fleet.ship_mut(ship)?.apply_damage(segment, damage)?;
                let sunk = fleet.update_ship(ship)?;
                debug!("hit ship {} segment {} at ({}, {}) for {}", ship.0, segment, x, y, damage);
                Ok(sunk)
            }
            (CellStatus::Ship, None) => Err(BattleError::NotFound),
            (CellStatus::Empty | CellStatus::Unknown, _) => {
                cell.status = CellStatus::Miss;
                debug!("miss at ({}, {})", x, y);
                Ok(false)
            }
            (CellStatus::Miss, _) => Ok(false),
        }
    }

    /// Display symbol for `(x, y)`: `?` unknown, `.` empty, `O` miss, and
    /// `S`/`D`/`X` for intact, damaged and destroyed ship segments.
    pub fn display_char_at(
        &self,
        x: usize,
        y: usize,
        fleet: &ShipManager,
    ) -> Result<char, BattleError> {
        let cell = self.cells[self.index(x, y)?];
        let ch = match cell.status {
            CellStatus::Unknown => '?',
            CellStatus::Empty => '.',
            CellStatus::Miss => 'O',
            CellStatus::Ship => {
                let occupant = cell.occupant.ok_or(BattleError::NotFound)?;
                match fleet.ship(occupant.ship)?.segment_status(occupant.segment)? {
                    SegmentStatus::Intact => 'S',
                    SegmentStatus::Damaged => 'D',
                    SegmentStatus::Destroyed => 'X',
                }
            }
        };
        Ok(ch)
    }
}

impl Default for GameField {
    fn default() -> Self {
        GameField {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            cells: vec![Cell::EMPTY; BOARD_WIDTH * BOARD_HEIGHT],
            ships: Vec::new(),
            double_damage: false,
        }
    }
}

impl fmt::Debug for GameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "GameField {{ {}x{}, ships: {:?}, double_damage: {} }}",
            self.width, self.height, self.ships, self.double_damage
        )?;
        for row in self.cells.chunks(self.width) {
            for cell in row {
                let ch = match cell.status {
                    CellStatus::Unknown => '?',
                    CellStatus::Empty => '.',
                    CellStatus::Ship => 'S',
                    CellStatus::Miss => 'O',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
