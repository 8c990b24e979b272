//! Turn orchestration: the user's fleet against the computer's.

use alloc::boxed::Box;
use log::{debug, info};
use rand::Rng;

use crate::{
    ability::{AbilityInput, AbilityManager, AbilityOutcome},
    ai,
    common::{BattleError, Coord},
    config::{FLEET, MAX_ABILITIES},
    field::GameField,
    fleet::{ShipId, ShipManager},
    observer::{GameObserver, GameView, Observers},
    ship::Orientation,
    snapshot::{self, GameSnapshot},
};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    User,
    Computer,
}

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// The user sank the computer's fleet; a new round follows.
    Won,
    /// The computer sank the user's fleet; the game is over.
    Lost,
}

/// A single shot and whether it sank a ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub target: Coord,
    pub sunk: bool,
}

/// Result of the user's attack and the computer's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    pub user_shot: Shot,
    pub computer_shot: Option<Shot>,
    pub status: GameStatus,
}

/// Chooses where the user's ships go during placement.
pub trait ShipPlacer {
    /// Position for ship `number` (1-based) of `length`, or `None` to place it
    /// at random.
    fn choose_position(
        &mut self,
        length: usize,
        number: usize,
        field: &GameField,
    ) -> Option<(usize, usize, Orientation)>;

    /// The last position was rejected; another will be requested.
    fn placement_rejected(&mut self, _error: &BattleError) {}
}

/// Game state for one user playing rounds against the computer.
pub struct Game<R: Rng> {
    user_field: GameField,
    user_fleet: ShipManager,
    computer_field: GameField,
    computer_fleet: ShipManager,
    abilities: AbilityManager,
    rng: R,
    observers: Observers,
    rounds_won: u32,
    over: bool,
}

impl<R: Rng> Game<R> {
    /// Create a game with empty fields and a single random ability.
    ///
    /// Fails only if the configured fleet is invalid.
    pub fn new(mut rng: R) -> Result<Self, BattleError> {
        let abilities = AbilityManager::new(&mut rng);
        Ok(Game {
            user_field: GameField::default(),
            user_fleet: ShipManager::new(&FLEET)?,
            computer_field: GameField::default(),
            computer_fleet: ShipManager::new(&FLEET)?,
            abilities,
            rng,
            observers: Observers::new(),
            rounds_won: 0,
            over: false,
        })
    }

    pub fn register_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.register(observer);
    }

    pub fn view(&self) -> GameView<'_> {
        GameView {
            user_field: &self.user_field,
            user_fleet: &self.user_fleet,
            computer_field: &self.computer_field,
            computer_fleet: &self.computer_fleet,
            abilities: &self.abilities,
        }
    }

    pub fn user_field(&self) -> &GameField {
        &self.user_field
    }

    pub fn user_fleet(&self) -> &ShipManager {
        &self.user_fleet
    }

    pub fn computer_field(&self) -> &GameField {
        &self.computer_field
    }

    pub fn computer_fleet(&self) -> &ShipManager {
        &self.computer_fleet
    }

    pub fn abilities(&self) -> &AbilityManager {
        &self.abilities
    }

    pub fn rounds_won(&self) -> u32 {
        self.rounds_won
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    /// Mark the game finished without a result, e.g. when the user quits.
    pub fn quit(&mut self) {
        self.over = true;
    }

    pub fn status(&self) -> GameStatus {
        if self.user_fleet.all_sunk() {
            GameStatus::Lost
        } else if self.computer_fleet.all_sunk() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Place the computer's fleet at random.
    pub fn place_computer_ships(&mut self) -> Result<(), BattleError> {
        ai::place_fleet(&mut self.rng, &mut self.computer_field, &mut self.computer_fleet)?;
        self.notify_field_update();
        Ok(())
    }

    /// Place the user's fleet at random.
    pub fn place_user_ships_randomly(&mut self) -> Result<(), BattleError> {
        ai::place_fleet(&mut self.rng, &mut self.user_field, &mut self.user_fleet)?;
        self.notify_field_update();
        Ok(())
    }

    /// Place the user's fleet ship by ship, asking `placer` for each position
    /// until the field accepts it.
    pub fn place_user_ships(&mut self, placer: &mut dyn ShipPlacer) -> Result<(), BattleError> {
        let ids: alloc::vec::Vec<ShipId> = self.user_fleet.ids().collect();
        for (n, id) in ids.into_iter().enumerate() {
            let length = self.user_fleet.ship(id)?.length();
            loop {
                self.notify_ship_placement(length, n + 1);
                let (x, y, o) = match placer.choose_position(length, n + 1, &self.user_field) {
                    Some(position) => position,
                    None => ai::random_placement(&mut self.rng, &self.user_field, &self.user_fleet, id)?,
                };
                match self.user_field.place_ship(&mut self.user_fleet, id, x, y, o) {
                    Ok(()) => break,
                    Err(e @ BattleError::PlacementConflict) => placer.placement_rejected(&e),
                    Err(e) => return Err(e),
                }
            }
        }
        self.notify_field_update();
        Ok(())
    }

    /// Fire at the computer's field, then let the computer answer.
    ///
    /// Sinking a ship grants the user a random ability. Sinking the last one
    /// wins the round and deals the computer a fresh fleet instead of a reply.
    pub fn user_attack(&mut self, x: usize, y: usize) -> Result<TurnReport, BattleError> {
        if self.over {
            return Err(BattleError::InvalidArgument("game is over"));
        }
        let sunk = self
            .computer_field
            .attack_cell(x, y, &mut self.computer_fleet)?;
        let user_shot = Shot {
            target: (x, y),
            sunk,
        };
        if sunk {
            self.reward_sinking();
        }
        self.notify_field_update();

        if self.computer_fleet.all_sunk() {
            self.finish_round()?;
            return Ok(TurnReport {
                user_shot,
                computer_shot: None,
                status: GameStatus::Won,
            });
        }

        let computer_shot = self.computer_turn()?;
        Ok(TurnReport {
            user_shot,
            computer_shot,
            status: self.status(),
        })
    }

    /// Use the front ability against the computer's field.
    pub fn use_ability(
        &mut self,
        input: &mut dyn AbilityInput,
    ) -> Result<AbilityOutcome, BattleError> {
        if self.over {
            return Err(BattleError::InvalidArgument("game is over"));
        }
        let outcome = self.abilities.use_ability(
            &mut self.computer_field,
            &mut self.computer_fleet,
            input,
            &mut self.rng,
        )?;
        info!("ability outcome: {:?}", outcome);

        let view = GameView {
            user_field: &self.user_field,
            user_fleet: &self.user_fleet,
            computer_field: &self.computer_field,
            computer_fleet: &self.computer_fleet,
            abilities: &self.abilities,
        };
        self.observers.each(|o| o.on_ability_used(&outcome, &view));

        if let AbilityOutcome::Barrage(Some(hit)) = &outcome {
            if hit.sunk {
                self.reward_sinking();
            }
        }
        self.notify_field_update();
        if self.computer_fleet.all_sunk() {
            self.finish_round()?;
        }
        Ok(outcome)
    }

    /// Fire one uniformly random shot at the user's field.
    ///
    /// Returns `None` when no cell is left worth shooting at.
    pub fn computer_turn(&mut self) -> Result<Option<Shot>, BattleError> {
        let Some((x, y)) = ai::pick_target(&mut self.rng, &self.user_field, &self.user_fleet)?
        else {
            return Ok(None);
        };
        let sunk = self.user_field.attack_cell(x, y, &mut self.user_fleet)?;
        debug!("computer fires at ({}, {}), sunk: {}", x, y, sunk);
        self.notify_field_update();
        if sunk {
            self.observers.each(|o| o.on_ship_destroyed(Side::User));
        }
        if self.user_fleet.all_sunk() {
            info!("user fleet destroyed after {} rounds won", self.rounds_won);
            self.over = true;
            self.observers.each(|o| o.on_game_over(GameStatus::Lost));
        }
        Ok(Some(Shot {
            target: (x, y),
            sunk,
        }))
    }

    fn reward_sinking(&mut self) {
        if self.abilities.len() < MAX_ABILITIES {
            let ability = self.abilities.add_random_ability(&mut self.rng);
            info!("enemy ship sunk, granted {}", ability);
        } else {
            info!("enemy ship sunk, ability queue full");
        }
        self.observers.each(|o| o.on_ship_destroyed(Side::Computer));
    }

    /// Count the won round and deal the computer a new fleet.
    fn finish_round(&mut self) -> Result<(), BattleError> {
        self.rounds_won += 1;
        info!("round {} won", self.rounds_won);
        self.observers.each(|o| o.on_game_over(GameStatus::Won));
        self.computer_field = GameField::default();
        self.computer_fleet = ShipManager::new(&FLEET)?;
        self.place_computer_ships()
    }

    /// Capture both fields and the ability queue.
    pub fn snapshot(&self) -> Result<GameSnapshot, BattleError> {
        GameSnapshot::capture(
            &self.user_field,
            &self.user_fleet,
            &self.computer_field,
            &self.computer_fleet,
            &self.abilities,
        )
    }

    /// Replace the current state with `snapshot`.
    ///
    /// The new state is built on fresh fleets first; on failure the game is
    /// left untouched.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<(), BattleError> {
        let mut user_fleet = ShipManager::new(&FLEET)?;
        let mut computer_fleet = ShipManager::new(&FLEET)?;
        let user_field = snapshot::deserialize_field(&snapshot.user, &mut user_fleet)?;
        let computer_field = snapshot::deserialize_field(&snapshot.computer, &mut computer_fleet)?;
        let abilities = snapshot::deserialize_abilities(&snapshot.abilities)?;

        self.user_field = user_field;
        self.user_fleet = user_fleet;
        self.computer_field = computer_field;
        self.computer_fleet = computer_fleet;
        self.abilities = abilities;
        self.over = self.user_fleet.all_sunk();
        self.notify_field_update();
        Ok(())
    }

    #[cfg(feature = "std")]
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let snapshot = self.snapshot()?;
        snapshot::save_to_file(path, &snapshot)?;
        info!("game saved to {}", path.display());
        Ok(())
    }

    #[cfg(feature = "std")]
    pub fn load(&mut self, path: &std::path::Path) -> anyhow::Result<()> {
        use anyhow::Context;
        let snapshot = snapshot::load_from_file(path)?;
        self.restore(&snapshot)
            .with_context(|| std::format!("cannot rebuild game from {}", path.display()))?;
        info!("game loaded from {}", path.display());
        Ok(())
    }

    fn notify_field_update(&mut self) {
        let view = GameView {
            user_field: &self.user_field,
            user_fleet: &self.user_fleet,
            computer_field: &self.computer_field,
            computer_fleet: &self.computer_fleet,
            abilities: &self.abilities,
        };
        self.observers.each(|o| o.on_field_update(&view));
    }

    fn notify_ship_placement(&mut self, length: usize, number: usize) {
        let view = GameView {
            user_field: &self.user_field,
            user_fleet: &self.user_fleet,
            computer_field: &self.computer_field,
            computer_fleet: &self.computer_fleet,
            abilities: &self.abilities,
        };
        self.observers
            .each(|o| o.on_ship_placement(length, number, &view));
    }
}
