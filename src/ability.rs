//! One-shot special abilities and the queue that hands them out.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use log::debug;
use rand::Rng;

use crate::common::{BattleError, Coord};
use crate::config::MAX_ABILITIES;
use crate::field::{CellStatus, GameField};
use crate::fleet::{ShipId, ShipManager};

/// Side length of the square a scanner inspects.
pub const SCAN_SIZE: usize = 2;

/// Kind of a queued ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Ability {
    DoubleDamage,
    Scanner,
    Barrage,
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::DoubleDamage, Ability::Scanner, Ability::Barrage];

    /// Pick one of the three kinds uniformly.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Collect whatever the ability needs from the player; `None` when the
    /// player gave no answer.
    pub fn prepare(self, input: &mut dyn AbilityInput) -> Option<AbilityAction> {
        match self {
            Ability::DoubleDamage => Some(AbilityAction::DoubleDamage),
            Ability::Scanner => {
                let (x, y) = input.scan_origin()?;
                Some(AbilityAction::Scan { x, y })
            }
            Ability::Barrage => Some(AbilityAction::Barrage),
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ability::DoubleDamage => write!(f, "Double damage"),
            Ability::Scanner => write!(f, "Scanner"),
            Ability::Barrage => write!(f, "Barrage"),
        }
    }
}

/// Source of the parameters abilities ask for.
pub trait AbilityInput {
    /// Top-left corner of the area to scan, or `None` if the player
    /// backed out.
    fn scan_origin(&mut self) -> Option<Coord>;
}

impl<F: FnMut() -> Coord> AbilityInput for F {
    fn scan_origin(&mut self) -> Option<Coord> {
        Some(self())
    }
}

/// An ability with its parameters filled in, ready to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityAction {
    DoubleDamage,
    Scan { x: usize, y: usize },
    Barrage,
}

/// One scanned cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReading {
    pub x: usize,
    pub y: usize,
    pub ship: bool,
}

/// Segment struck by a barrage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrageHit {
    pub ship: ShipId,
    pub segment: usize,
    /// The hit finished off the ship.
    pub sunk: bool,
}

/// What applying an ability did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityOutcome {
    DoubleDamageArmed,
    Scanned(Vec<ScanReading>),
    /// `None` when the field had no ships to strike.
    Barrage(Option<BarrageHit>),
}

impl AbilityAction {
    /// Apply the effect to `field`, whose ships belong to `fleet`.
    pub fn apply<R: Rng + ?Sized>(
        self,
        field: &mut GameField,
        fleet: &mut ShipManager,
        rng: &mut R,
    ) -> Result<AbilityOutcome, BattleError> {
        match self {
            AbilityAction::DoubleDamage => {
                field.activate_double_damage();
                Ok(AbilityOutcome::DoubleDamageArmed)
            }
            AbilityAction::Scan { x, y } => scan(field, x, y).map(AbilityOutcome::Scanned),
            AbilityAction::Barrage => barrage(field, fleet, rng).map(AbilityOutcome::Barrage),
        }
    }
}

fn scan(field: &GameField, x: usize, y: usize) -> Result<Vec<ScanReading>, BattleError> {
    if !field.is_valid_position(x, y) {
        return Err(BattleError::OutOfBounds { x, y });
    }
    let mut readings = Vec::with_capacity(SCAN_SIZE * SCAN_SIZE);
    for ny in y..y + SCAN_SIZE {
        for nx in x..x + SCAN_SIZE {
            if field.is_valid_position(nx, ny) {
                let ship = field.cell_status(nx, ny)? == CellStatus::Ship;
                readings.push(ScanReading { x: nx, y: ny, ship });
            }
        }
    }
    Ok(readings)
}

fn barrage<R: Rng + ?Sized>(
    field: &GameField,
    fleet: &mut ShipManager,
    rng: &mut R,
) -> Result<Option<BarrageHit>, BattleError> {
    let ships = field.ships();
    if ships.is_empty() {
        return Ok(None);
    }
    let ship = ships[rng.random_range(0..ships.len())];
    let segment = rng.random_range(0..fleet.ship(ship)?.length());
    fleet.ship_mut(ship)?.apply_damage(segment, 1)?;
    let sunk = fleet.update_ship(ship)?;
    Ok(Some(BarrageHit {
        ship,
        segment,
        sunk,
    }))
}

/// Number of queued abilities per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCounts {
    pub double_damage: usize,
    pub scanner: usize,
    pub barrage: usize,
}

/// First-in-first-out queue of abilities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbilityManager {
    abilities: VecDeque<Ability>,
}

impl AbilityManager {
    /// Queue holding one random ability.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut manager = Self::empty();
        manager.add_random_ability(rng);
        manager
    }

    pub fn empty() -> Self {
        AbilityManager {
            abilities: VecDeque::new(),
        }
    }

    pub fn push(&mut self, ability: Ability) {
        self.abilities.push_back(ability);
    }

    /// Append one uniformly chosen ability and return it.
    pub fn add_random_ability<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Ability {
        let ability = Ability::random(rng);
        self.push(ability);
        ability
    }

    /// Next ability to be used.
    pub fn front(&self) -> Option<Ability> {
        self.abilities.front().copied()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        self.abilities.iter().copied()
    }

    /// Gather the front ability's parameters from `input`, remove it and
    /// apply it to `field`.
    ///
    /// An ability whose input is cancelled stays queued; once its parameters
    /// are in hand it is spent even if applying it fails.
    pub fn use_ability<R: Rng + ?Sized>(
        &mut self,
        field: &mut GameField,
        fleet: &mut ShipManager,
        input: &mut dyn AbilityInput,
        rng: &mut R,
    ) -> Result<AbilityOutcome, BattleError> {
        let ability = self.front().ok_or(BattleError::NoAbilityAvailable)?;
        let action = ability
            .prepare(input)
            .ok_or(BattleError::InvalidArgument("ability input cancelled"))?;
        self.abilities.pop_front();
        debug!("using ability {}", ability);
        action.apply(field, fleet, rng)
    }

    pub fn counts(&self) -> AbilityCounts {
        self.abilities
            .iter()
            .fold(AbilityCounts::default(), |mut counts, ability| {
                match ability {
                    Ability::DoubleDamage => counts.double_damage += 1,
                    Ability::Scanner => counts.scanner += 1,
                    Ability::Barrage => counts.barrage += 1,
                }
                counts
            })
    }

    /// Rebuild a queue from per-kind counts, grouped by kind.
    ///
    /// Fails when the total exceeds [`MAX_ABILITIES`].
    pub fn from_counts(counts: AbilityCounts) -> Result<Self, BattleError> {
        let total = counts
            .double_damage
            .checked_add(counts.scanner)
            .and_then(|n| n.checked_add(counts.barrage))
            .filter(|&n| n <= MAX_ABILITIES)
            .ok_or(BattleError::InvalidArgument("too many abilities"))?;
        let mut abilities = VecDeque::with_capacity(total);
        abilities.extend(core::iter::repeat(Ability::DoubleDamage).take(counts.double_damage));
        abilities.extend(core::iter::repeat(Ability::Scanner).take(counts.scanner));
        abilities.extend(core::iter::repeat(Ability::Barrage).take(counts.barrage));
        Ok(AbilityManager { abilities })
    }
}
