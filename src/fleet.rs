//! Fleet ownership and sunk bookkeeping.

use alloc::vec::Vec;
use log::debug;

use crate::common::BattleError;
use crate::ship::{Orientation, Ship};

/// Stable index of a ship inside its fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipId(pub usize);

/// Owns one side's ships and counts how many are still afloat.
#[derive(Debug, Clone)]
pub struct ShipManager {
    ships: Vec<Ship>,
    sunk: Vec<bool>,
    remaining: usize,
}

impl ShipManager {
    /// Build a fleet with one horizontal ship per entry of `sizes`.
    pub fn new(sizes: &[usize]) -> Result<Self, BattleError> {
        let ships = sizes
            .iter()
            .map(|&size| {
                Ship::new(size, Orientation::Horizontal)
                    .map_err(|_| BattleError::FleetInitialization { size })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let count = ships.len();
        Ok(ShipManager {
            ships,
            sunk: alloc::vec![false; count],
            remaining: count,
        })
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    /// Ids of all ships, in fleet order.
    pub fn ids(&self) -> impl Iterator<Item = ShipId> {
        (0..self.ships.len()).map(ShipId)
    }

    pub fn ship(&self, id: ShipId) -> Result<&Ship, BattleError> {
        self.ships.get(id.0).ok_or(BattleError::NotFound)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Result<&mut Ship, BattleError> {
        self.ships.get_mut(id.0).ok_or(BattleError::NotFound)
    }

    /// Whether the fleet has already counted `id` as sunk.
    pub fn is_marked_sunk(&self, id: ShipId) -> Result<bool, BattleError> {
        self.sunk.get(id.0).copied().ok_or(BattleError::NotFound)
    }

    /// Re-examine `id` after it took damage.
    ///
    /// Returns `true` only on the call that first observes the ship sunk; the
    /// remaining count drops exactly once per ship.
    pub fn update_ship(&mut self, id: ShipId) -> Result<bool, BattleError> {
        let ship = self.ships.get(id.0).ok_or(BattleError::NotFound)?;
        if self.sunk[id.0] || !ship.is_sunk() {
            return Ok(false);
        }
        self.sunk[id.0] = true;
        self.remaining -= 1;
        debug!("ship {} sunk, {} remaining", id.0, self.remaining);
        Ok(true)
    }

    /// Ships not yet sunk.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn all_sunk(&self) -> bool {
        self.remaining == 0
    }
}
