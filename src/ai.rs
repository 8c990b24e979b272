// Uniform-random computer play: fleet placement and target selection.

use alloc::vec::Vec;
use rand::Rng;

use crate::{
    common::{BattleError, Coord},
    config::PLACEMENT_ATTEMPTS,
    field::{CellStatus, GameField},
    fleet::{ShipId, ShipManager},
    ship::{Orientation, SegmentStatus},
};

/// Returns a random legal `(x, y, Orientation)` for ship `id` on `field`.
pub fn random_placement<R: Rng + ?Sized>(
    rng: &mut R,
    field: &GameField,
    fleet: &ShipManager,
    id: ShipId,
) -> Result<(usize, usize, Orientation), BattleError> {
    let length = fleet.ship(id)?.length();
    for _ in 0..PLACEMENT_ATTEMPTS {
        let orient = if rng.random() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let (max_x, max_y) = match orient {
            Orientation::Horizontal => (field.width().saturating_sub(length), field.height() - 1),
            Orientation::Vertical => (field.width() - 1, field.height().saturating_sub(length)),
        };
        let x = rng.random_range(0..=max_x);
        let y = rng.random_range(0..=max_y);
        if field.can_place_ship(length, x, y, orient) {
            return Ok((x, y, orient));
        }
    }
    Err(BattleError::PlacementConflict)
}

/// Place every ship of `fleet` that is not yet on `field` at random.
pub fn place_fleet<R: Rng + ?Sized>(
    rng: &mut R,
    field: &mut GameField,
    fleet: &mut ShipManager,
) -> Result<(), BattleError> {
    let ids: Vec<ShipId> = fleet.ids().collect();
    for id in ids {
        if field.ships().contains(&id) {
            continue;
        }
        let (x, y, o) = random_placement(rng, field, fleet, id)?;
        field.place_ship(fleet, id, x, y, o)?;
    }
    Ok(())
}

/// Whether firing at `(x, y)` could still change anything: not a known miss
/// and not a destroyed ship segment.
pub fn is_worth_attacking(
    field: &GameField,
    fleet: &ShipManager,
    x: usize,
    y: usize,
) -> Result<bool, BattleError> {
    if field.cell_status(x, y)? == CellStatus::Miss {
        return Ok(false);
    }
    match field.occupant_at(x, y)? {
        Some(occupant) => Ok(fleet.ship(occupant.ship)?.segment_status(occupant.segment)?
            != SegmentStatus::Destroyed),
        None => Ok(true),
    }
}

/// Pick a uniformly random cell among those worth attacking.
///
/// Returns `None` when no such cell is left.
pub fn pick_target<R: Rng + ?Sized>(
    rng: &mut R,
    field: &GameField,
    fleet: &ShipManager,
) -> Result<Option<Coord>, BattleError> {
    let mut candidates = Vec::new();
    for y in 0..field.height() {
        for x in 0..field.width() {
            if is_worth_attacking(field, fleet, x, y)? {
                candidates.push((x, y));
            }
        }
    }
    if candidates.is_empty() {
        return Ok(None);
    }
    Ok(Some(candidates[rng.random_range(0..candidates.len())]))
}
