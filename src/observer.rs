//! Synchronous notification of game events.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::ability::{AbilityManager, AbilityOutcome};
use crate::field::GameField;
use crate::fleet::ShipManager;
use crate::game::{GameStatus, Side};

/// Read-only view of the game handed to observers.
#[derive(Clone, Copy)]
pub struct GameView<'a> {
    pub user_field: &'a GameField,
    pub user_fleet: &'a ShipManager,
    pub computer_field: &'a GameField,
    pub computer_fleet: &'a ShipManager,
    pub abilities: &'a AbilityManager,
}

/// Hooks called after the corresponding game mutation.
///
/// All methods default to doing nothing.
pub trait GameObserver {
    fn on_field_update(&mut self, _view: &GameView<'_>) {}

    fn on_ability_used(&mut self, _outcome: &AbilityOutcome, _view: &GameView<'_>) {}

    fn on_game_over(&mut self, _status: GameStatus) {}

    /// `side` lost a ship.
    fn on_ship_destroyed(&mut self, _side: Side) {}

    /// Ship `number` (1-based) of `length` is about to be placed.
    fn on_ship_placement(&mut self, _length: usize, _number: usize, _view: &GameView<'_>) {}
}

/// Registered observers, notified in registration order.
#[derive(Default)]
pub struct Observers {
    list: Vec<Box<dyn GameObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn GameObserver>) {
        self.list.push(observer);
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Call `f` on every observer.
    pub fn each(&mut self, mut f: impl FnMut(&mut dyn GameObserver)) {
        for observer in self.list.iter_mut() {
            f(observer.as_mut());
        }
    }
}
