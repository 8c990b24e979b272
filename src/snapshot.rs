//! Save-game snapshots and their plain-text file format.
//!
//! The format is whitespace delimited:
//!
//! ```text
//! <width> <height>
//! <height*width cell ordinals, row-major>     user field
//! <ship count>
//! <length> <orientation> <x> <y> <segment count> <segment ordinals...>
//! ...                                          computer field, same layout
//! <double damage> <scanner> <barrage>
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use log::debug;

use crate::ability::{AbilityCounts, AbilityManager};
use crate::common::{BattleError, Coord};
use crate::config::{
    BOARD_HEIGHT, BOARD_WIDTH, MAX_ABILITIES, MAX_SHIP_LENGTH, MIN_SHIP_LENGTH,
};
use crate::field::{CellStatus, GameField};
use crate::fleet::ShipManager;
use crate::ship::{Orientation, SegmentStatus};

/// One placed ship, keyed by its anchor (segment 0) cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShipData {
    pub length: usize,
    pub orientation: Orientation,
    pub anchor: Coord,
    pub segments: Vec<SegmentStatus>,
}

/// Flat copy of a field: row-major cell statuses plus its ships.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldData {
    pub cells: Vec<CellStatus>,
    pub ships: Vec<ShipData>,
}

/// Per-kind ability counts; queue order is not kept.
pub type AbilitiesData = AbilityCounts;

/// Everything written to a save file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSnapshot {
    pub user: FieldData,
    pub computer: FieldData,
    pub abilities: AbilitiesData,
}

fn format_error(msg: impl Into<String>) -> BattleError {
    BattleError::FileFormat(msg.into())
}

/// Capture every cell and every placed ship of `field`.
pub fn serialize_field(
    field: &GameField,
    fleet: &ShipManager,
) -> Result<FieldData, BattleError> {
    let mut cells = Vec::with_capacity(field.width() * field.height());
    let mut ships = Vec::new();
    for y in 0..field.height() {
        for x in 0..field.width() {
            cells.push(field.cell_status(x, y)?);
            match field.occupant_at(x, y)? {
                Some(occupant) if occupant.segment == 0 => {
                    let ship = fleet.ship(occupant.ship)?;
                    ships.push(ShipData {
                        length: ship.length(),
                        orientation: ship.orientation(),
                        anchor: (x, y),
                        segments: ship.segments().to_vec(),
                    });
                }
                _ => {}
            }
        }
    }
    Ok(FieldData { cells, ships })
}

pub fn serialize_abilities(manager: &AbilityManager) -> AbilitiesData {
    manager.counts()
}

/// Rebuild a default-sized field from `data`, placing ships taken from the
/// fresh `fleet`.
///
/// Records are matched to fleet ships by length only, longest first; which
/// of several equal-length ships receives a record is not preserved.
pub fn deserialize_field(
    data: &FieldData,
    fleet: &mut ShipManager,
) -> Result<GameField, BattleError> {
    let mut field = GameField::default();
    if data.cells.len() != field.width() * field.height() {
        return Err(format_error(format!(
            "expected {} cells, found {}",
            field.width() * field.height(),
            data.cells.len()
        )));
    }

    let mut order: Vec<usize> = (0..data.ships.len()).collect();
    order.sort_by(|&a, &b| data.ships[b].length.cmp(&data.ships[a].length));

    let mut used = vec![false; fleet.len()];
    for idx in order {
        let record = &data.ships[idx];
        let id = fleet
            .ids()
            .find(|id| {
                !used[id.0]
                    && fleet
                        .ship(*id)
                        .map(|s| s.length() == record.length)
                        .unwrap_or(false)
            })
            .ok_or_else(|| {
                format_error(format!("no unused ship of length {} in fleet", record.length))
            })?;
        used[id.0] = true;

        let (x, y) = record.anchor;
        field
            .restore_ship(fleet, id, x, y, record.orientation)
            .map_err(|e| format_error(format!("cannot restore ship at ({}, {}): {}", x, y, e)))?;

        let ship = fleet.ship_mut(id)?;
        for (segment, status) in record.segments.iter().enumerate() {
            let damage = status.damage_from_intact();
            if damage > 0 {
                ship.apply_damage(segment, damage)?;
            }
        }
        fleet.update_ship(id)?;
        debug!("restored ship {} (length {}) at ({}, {})", id.0, record.length, x, y);
    }

    for y in 0..field.height() {
        for x in 0..field.width() {
            if field.occupant_at(x, y)?.is_some() {
                continue;
            }
            let status = data.cells[y * field.width() + x];
            if status == CellStatus::Ship {
                return Err(format_error(format!(
                    "cell ({}, {}) is marked as ship but no ship covers it",
                    x, y
                )));
            }
            field.set_cell_status(x, y, status)?;
        }
    }
    Ok(field)
}

/// Rebuild the ability queue; kinds come back grouped in a fixed order.
pub fn deserialize_abilities(data: &AbilitiesData) -> Result<AbilityManager, BattleError> {
    AbilityManager::from_counts(*data).map_err(|_| {
        format_error(format!(
            "ability counts {} {} {} exceed {}",
            data.double_damage, data.scanner, data.barrage, MAX_ABILITIES
        ))
    })
}

impl GameSnapshot {
    pub fn capture(
        user_field: &GameField,
        user_fleet: &ShipManager,
        computer_field: &GameField,
        computer_fleet: &ShipManager,
        abilities: &AbilityManager,
    ) -> Result<Self, BattleError> {
        Ok(GameSnapshot {
            user: serialize_field(user_field, user_fleet)?,
            computer: serialize_field(computer_field, computer_fleet)?,
            abilities: serialize_abilities(abilities),
        })
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, data: &FieldData) -> fmt::Result {
    for row in data.cells.chunks(BOARD_WIDTH) {
        for cell in row {
            write!(f, "{} ", cell.ordinal())?;
        }
        writeln!(f)?;
    }
    writeln!(f, "{}", data.ships.len())?;
    for ship in &data.ships {
        write!(
            f,
            "{} {} {} {} {} ",
            ship.length,
            ship.orientation.ordinal(),
            ship.anchor.0,
            ship.anchor.1,
            ship.segments.len()
        )?;
        for status in &ship.segments {
            write!(f, "{} ", status.ordinal())?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for GameSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", BOARD_WIDTH, BOARD_HEIGHT)?;
        write_field(f, &self.user)?;
        write_field(f, &self.computer)?;
        writeln!(
            f,
            "{} {} {}",
            self.abilities.double_damage, self.abilities.scanner, self.abilities.barrage
        )
    }
}

/// Whitespace token reader that names what it failed to read.
struct Tokens<'a> {
    inner: core::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens {
            inner: text.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, what: &str) -> Result<T, BattleError> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| format_error(format!("unexpected end of data reading {}", what)))?;
        token
            .parse()
            .map_err(|_| format_error(format!("cannot read {} from {:?}", what, token)))
    }

    fn finish(mut self) -> Result<(), BattleError> {
        match self.inner.next() {
            None => Ok(()),
            Some(token) => Err(format_error(format!("trailing data {:?}", token))),
        }
    }
}

fn read_field(tokens: &mut Tokens<'_>) -> Result<FieldData, BattleError> {
    let mut cells = Vec::with_capacity(BOARD_WIDTH * BOARD_HEIGHT);
    for _ in 0..BOARD_WIDTH * BOARD_HEIGHT {
        let ordinal: u8 = tokens.next("cell status")?;
        let status = CellStatus::from_ordinal(ordinal)
            .ok_or_else(|| format_error(format!("unknown cell status {}", ordinal)))?;
        cells.push(status);
    }

    let count: usize = tokens.next("ship count")?;
    let mut ships = Vec::new();
    for _ in 0..count {
        let length: usize = tokens.next("ship length")?;
        if !(MIN_SHIP_LENGTH..=MAX_SHIP_LENGTH).contains(&length) {
            return Err(format_error(format!("invalid ship length {}", length)));
        }
        let ordinal: u8 = tokens.next("ship orientation")?;
        let orientation = Orientation::from_ordinal(ordinal)
            .ok_or_else(|| format_error(format!("unknown orientation {}", ordinal)))?;
        let x: usize = tokens.next("ship x")?;
        let y: usize = tokens.next("ship y")?;
        let segment_count: usize = tokens.next("segment count")?;
        if segment_count != length {
            return Err(format_error(format!(
                "ship of length {} lists {} segments",
                length, segment_count
            )));
        }
        let mut segments = Vec::with_capacity(segment_count);
        for _ in 0..segment_count {
            let ordinal: u8 = tokens.next("segment status")?;
            let status = SegmentStatus::from_ordinal(ordinal)
                .ok_or_else(|| format_error(format!("unknown segment status {}", ordinal)))?;
            segments.push(status);
        }
        ships.push(ShipData {
            length,
            orientation,
            anchor: (x, y),
            segments,
        });
    }
    Ok(FieldData { cells, ships })
}

impl FromStr for GameSnapshot {
    type Err = BattleError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(text);
        let width: usize = tokens.next("width")?;
        let height: usize = tokens.next("height")?;
        if width != BOARD_WIDTH || height != BOARD_HEIGHT {
            return Err(format_error(format!(
                "field size {}x{} does not match {}x{}",
                width, height, BOARD_WIDTH, BOARD_HEIGHT
            )));
        }
        let user = read_field(&mut tokens)?;
        let computer = read_field(&mut tokens)?;
        let abilities = AbilitiesData {
            double_damage: tokens.next("double damage count")?,
            scanner: tokens.next("scanner count")?,
            barrage: tokens.next("barrage count")?,
        };
        tokens.finish()?;
        deserialize_abilities(&abilities)?;
        Ok(GameSnapshot {
            user,
            computer,
            abilities,
        })
    }
}

/// Write `snapshot` to `path` in the text format.
#[cfg(feature = "std")]
pub fn save_to_file(path: &std::path::Path, snapshot: &GameSnapshot) -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::write(path, snapshot.to_string())
        .with_context(|| format!("cannot write save file {}", path.display()))
}

/// Read and parse the save file at `path`.
#[cfg(feature = "std")]
pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<GameSnapshot> {
    use anyhow::Context;
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read save file {}", path.display()))?;
    let snapshot = text
        .parse::<GameSnapshot>()
        .with_context(|| format!("cannot load save file {}", path.display()))?;
    Ok(snapshot)
}
