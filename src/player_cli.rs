#![cfg(feature = "std")]

use std::io::{self, BufRead, Write};
use std::string::String;

use log::warn;

use crate::{
    ability::{AbilityInput, AbilityOutcome},
    common::Coord,
    config::{BOARD_HEIGHT, BOARD_WIDTH},
    field::GameField,
    fleet::ShipManager,
    game::{GameStatus, ShipPlacer, Side, TurnReport},
    observer::{GameObserver, GameView},
    ship::Orientation,
    BattleError,
};

/// Parse `"x y"` into an in-bounds coordinate.
pub fn parse_coord(input: &str) -> Option<Coord> {
    let mut parts = input.split_whitespace();
    let x: usize = parts.next()?.parse().ok()?;
    let y: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() || x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
        return None;
    }
    Some((x, y))
}

/// Parse `"x y H|V"` into a placement.
pub fn parse_placement(input: &str) -> Option<(usize, usize, Orientation)> {
    let mut parts = input.split_whitespace();
    let x: usize = parts.next()?.parse().ok()?;
    let y: usize = parts.next()?.parse().ok()?;
    let orient = match parts.next()? {
        "h" | "H" => Orientation::Horizontal,
        "v" | "V" => Orientation::Vertical,
        _ => return None,
    };
    if parts.next().is_some() || x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
        return None;
    }
    Some((x, y, orient))
}

/// Symbol shown for a cell; the opponent's intact segments stay hidden.
fn cell_symbol(field: &GameField, fleet: &ShipManager, x: usize, y: usize, hide_ships: bool) -> char {
    match field.display_char_at(x, y, fleet) {
        Ok('S') if hide_ships => '.',
        Ok('?') if hide_ships => '.',
        Ok(ch) => ch,
        Err(_) => '?',
    }
}

fn print_field(field: &GameField, fleet: &ShipManager, hide_ships: bool) {
    print!("   ");
    for x in 0..field.width() {
        print!(" {}", x);
    }
    println!();
    for y in 0..field.height() {
        print!("{:2} ", y);
        for x in 0..field.width() {
            print!(" {}", cell_symbol(field, fleet, x, y, hide_ships));
        }
        println!();
    }
}

/// Display the computer's board (top), the user's board (bottom) and the
/// next ability.
pub fn print_fields(view: &GameView<'_>) {
    println!("\nComputer field ({} ships left):", view.computer_fleet.remaining());
    print_field(view.computer_field, view.computer_fleet, true);
    println!("\nYour field ({} ships left):", view.user_fleet.remaining());
    print_field(view.user_field, view.user_fleet, false);
    match view.abilities.front() {
        Some(ability) => println!(
            "\nNext ability: {} ({} queued)",
            ability,
            view.abilities.len()
        ),
        None => println!("\nNo abilities available"),
    }
}

pub fn print_turn(report: &TurnReport) {
    let (x, y) = report.user_shot.target;
    println!("You fire at ({}, {}){}", x, y, if report.user_shot.sunk { " and sink a ship!" } else { "" });
    if let Some(shot) = report.computer_shot {
        let (x, y) = shot.target;
        println!(
            "Computer fires at ({}, {}){}",
            x,
            y,
            if shot.sunk { " and sinks your ship!" } else { "" }
        );
    }
}

/// Observer printing the boards after every change.
#[derive(Default)]
pub struct TerminalRenderer {
    /// Skip board redraws; events are still reported.
    pub quiet: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameObserver for TerminalRenderer {
    fn on_field_update(&mut self, view: &GameView<'_>) {
        if !self.quiet {
            print_fields(view);
        }
    }

    fn on_ability_used(&mut self, outcome: &AbilityOutcome, _view: &GameView<'_>) {
        match outcome {
            AbilityOutcome::DoubleDamageArmed => println!("Double damage armed for the next shot."),
            AbilityOutcome::Scanned(readings) => {
                for r in readings {
                    if r.ship {
                        println!("Ship segment detected at ({}, {})", r.x, r.y);
                    } else {
                        println!("No ship at ({}, {})", r.x, r.y);
                    }
                }
            }
            AbilityOutcome::Barrage(Some(hit)) => println!(
                "Barrage struck a ship{}",
                if hit.sunk { " and sank it!" } else { "." }
            ),
            AbilityOutcome::Barrage(None) => println!("Barrage found nothing to strike."),
        }
    }

    fn on_game_over(&mut self, status: GameStatus) {
        match status {
            GameStatus::Won => println!("\nAll enemy ships sunk! A new enemy fleet approaches."),
            GameStatus::Lost => println!("\nDEFEAT: all your ships have been destroyed."),
            GameStatus::InProgress => {}
        }
    }

    fn on_ship_destroyed(&mut self, side: Side) {
        match side {
            Side::Computer => println!("Enemy ship destroyed! You gain an ability."),
            Side::User => println!("Your ship was destroyed!"),
        }
    }

    fn on_ship_placement(&mut self, length: usize, number: usize, view: &GameView<'_>) {
        print_field(view.user_field, view.user_fleet, false);
        println!("Placing ship {} (length {})", number, length);
    }
}

/// Interactive player reading from a line-based input.
pub struct CliPlayer<I: BufRead> {
    input: I,
}

impl CliPlayer<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        CliPlayer {
            input: io::stdin().lock(),
        }
    }
}

impl<I: BufRead> CliPlayer<I> {
    pub fn new(input: I) -> Self {
        CliPlayer { input }
    }

    /// Print `msg` and read one trimmed line; `None` at end of input.
    pub fn prompt(&mut self, msg: &str) -> Option<String> {
        print!("{}", msg);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().into()),
        }
    }

    /// Ask until an in-bounds `x y` is entered; `None` at end of input.
    pub fn read_coord(&mut self, what: &str) -> Option<Coord> {
        loop {
            let line = self.prompt(&format!(
                "{} (x y, 0-{} 0-{}): ",
                what,
                BOARD_WIDTH - 1,
                BOARD_HEIGHT - 1
            ))?;
            match parse_coord(&line) {
                Some(coord) => return Some(coord),
                None => println!("Invalid coordinate"),
            }
        }
    }
}

impl<I: BufRead> ShipPlacer for CliPlayer<I> {
    fn choose_position(
        &mut self,
        _length: usize,
        _number: usize,
        _field: &GameField,
    ) -> Option<(usize, usize, Orientation)> {
        loop {
            let line = self.prompt("Position (x y H|V), empty for random: ")?;
            if line.is_empty() {
                return None;
            }
            match parse_placement(&line) {
                Some(p) => return Some(p),
                None => println!("Invalid input"),
            }
        }
    }

    fn placement_rejected(&mut self, error: &BattleError) {
        println!("{}. Try again.", error);
    }
}

impl<I: BufRead> AbilityInput for CliPlayer<I> {
    fn scan_origin(&mut self) -> Option<Coord> {
        let origin = self.read_coord("Scan origin");
        if origin.is_none() {
            warn!("no scan origin entered, scanner kept for later");
        }
        origin
    }
}
