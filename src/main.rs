#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::{Path, PathBuf};

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use log::{debug, LevelFilter};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::{Rng, SeedableRng};
#[cfg(feature = "std")]
use seabattle::{
    init_logging, pick_target, print_fields, print_turn, with_save_extension, AbilityOutcome,
    BattleError, CliPlayer, Command, Game, GameStatus, Keymap, TerminalRenderer, BOARD_HEIGHT,
    BOARD_WIDTH,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[arg(long, global = true, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, global = true, help = "Key binding file with `key = command` lines")]
    keymap: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level (error, warn, info, debug, trace); overrides SEABATTLE_LOG")]
    log_level: Option<LevelFilter>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Start a new game against the computer.
    New,
    /// Resume a saved game; falls back to a new game if it cannot be loaded.
    Load { file: PathBuf },
    /// Let the computer play the user's side as well.
    Auto {
        #[arg(long, default_value_t = 1)]
        rounds: u32,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => {
            println!("Using fixed seed: {} (game will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    let rng = make_rng(cli.seed);
    let keymap = match &cli.keymap {
        Some(path) => Keymap::load_or_default(path),
        None => Keymap::default(),
    };

    match cli.command.unwrap_or(Commands::New) {
        Commands::New => {
            let mut game = Game::new(rng)?;
            game.register_observer(Box::new(TerminalRenderer::new()));
            let mut player = CliPlayer::stdin();
            start_new_game(&mut game, &mut player)?;
            run_cli(&mut game, &mut player, &keymap)
        }
        Commands::Load { file } => {
            let mut game = Game::new(rng)?;
            game.register_observer(Box::new(TerminalRenderer::new()));
            let mut player = CliPlayer::stdin();
            if let Err(e) = game.load(&file) {
                eprintln!("Error loading game: {:#}", e);
                println!("Starting a new game instead...");
                start_new_game(&mut game, &mut player)?;
            }
            run_cli(&mut game, &mut player, &keymap)
        }
        Commands::Auto { rounds } => {
            let mut rng = rng;
            let user_rng = SmallRng::from_rng(&mut rng);
            run_auto(Game::new(rng)?, user_rng, rounds)
        }
    }
}

#[cfg(feature = "std")]
fn start_new_game<I: std::io::BufRead>(
    game: &mut Game<SmallRng>,
    player: &mut CliPlayer<I>,
) -> anyhow::Result<()> {
    game.place_computer_ships()?;
    game.place_user_ships(player)?;
    Ok(())
}

#[cfg(feature = "std")]
fn save_path<I: std::io::BufRead>(player: &mut CliPlayer<I>) -> Option<PathBuf> {
    let name = player.prompt("File name: ")?;
    if name.is_empty() {
        println!("File name cannot be empty.");
        return None;
    }
    Some(PathBuf::from(with_save_extension(&name)))
}

#[cfg(feature = "std")]
fn run_cli<I: std::io::BufRead>(
    game: &mut Game<SmallRng>,
    player: &mut CliPlayer<I>,
    keymap: &Keymap,
) -> anyhow::Result<()> {
    while !game.is_over() {
        let Some(line) = player.prompt("\nCommand: ") else {
            game.quit();
            break;
        };
        let Some(command) = line.chars().next().and_then(|k| keymap.command_for(k)) else {
            println!("Unknown command. Use:\n{}", keymap);
            continue;
        };

        match command {
            Command::Attack => {
                let Some((x, y)) = player.read_coord("Target") else {
                    continue;
                };
                match game.user_attack(x, y) {
                    Ok(report) => print_turn(&report),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Command::UseAbility => match game.use_ability(player) {
                Ok(_) => println!("Ability used."),
                Err(BattleError::NoAbilityAvailable) => println!("You have no abilities available."),
                Err(e) => println!("Ability failed: {}", e),
            },
            Command::SaveGame => {
                if let Some(path) = save_path(player) {
                    match game.save(&path) {
                        Ok(()) => println!("Game saved to {}", path.display()),
                        Err(e) => eprintln!("Error saving game: {:#}", e),
                    }
                }
            }
            Command::LoadGame => {
                if let Some(path) = save_path(player) {
                    load_or_report(game, &path);
                }
            }
            Command::DisplayFields => print_fields(&game.view()),
            Command::Quit => game.quit(),
        }
    }

    match game.status() {
        GameStatus::Lost => println!("\nGame over after {} rounds won.", game.rounds_won()),
        _ => println!("\nThanks for playing! Rounds won: {}", game.rounds_won()),
    }
    Ok(())
}

#[cfg(feature = "std")]
fn load_or_report(game: &mut Game<SmallRng>, path: &Path) {
    match game.load(path) {
        Ok(()) => println!("Game loaded from {}", path.display()),
        Err(e) => eprintln!("Error loading game: {:#}", e),
    }
}

/// Computer-driven self play: random shots, abilities used as they come.
#[cfg(feature = "std")]
fn run_auto(mut game: Game<SmallRng>, mut rng: SmallRng, rounds: u32) -> anyhow::Result<()> {
    game.place_computer_ships()?;
    game.place_user_ships_randomly()?;

    let mut turns = 0usize;
    while !game.is_over() && game.rounds_won() < rounds {
        if game.abilities().front().is_some() {
            let mut input = || {
                (
                    rng.random_range(0..BOARD_WIDTH),
                    rng.random_range(0..BOARD_HEIGHT),
                )
            };
            if let Ok(AbilityOutcome::Scanned(readings)) = game.use_ability(&mut input) {
                debug!("scan found {} ship cells", readings.iter().filter(|r| r.ship).count());
            }
            continue;
        }
        let target = pick_target(&mut rng, game.computer_field(), game.computer_fleet())?;
        let Some((x, y)) = target else {
            break;
        };
        game.user_attack(x, y)?;
        turns += 1;
    }

    print_fields(&game.view());
    println!(
        "Auto play finished after {} turns: {} rounds won, status {:?}",
        turns,
        game.rounds_won(),
        game.status()
    );
    Ok(())
}
