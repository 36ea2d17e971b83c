use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use salvo::ui::{coord_to_string, parse_coord, parse_placement, render_fleet_status, render_grid, MAX_UI_SIZE};
use salvo::{init_logging, MatchConfig, MatchController, Outcome, Phase, Side, SideKind, GRID_SIZE};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the AI in this terminal.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = GRID_SIZE, value_parser = clap::value_parser!(u8).range(5..=MAX_UI_SIZE as i64).map(usize::from))]
        size: usize,
        #[arg(long, help = "Place your fleet at random instead of by hand")]
        auto_place: bool,
        #[arg(long, default_value_t = 600, help = "Pause before the AI fires, in milliseconds")]
        delay_ms: u64,
    },
    /// Watch two AIs play each other.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = GRID_SIZE, value_parser = clap::value_parser!(u8).range(5..=MAX_UI_SIZE as i64).map(usize::from))]
        size: usize,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seed,
            size,
            auto_place,
            delay_ms,
        } => play(seed, size, auto_place, Duration::from_millis(delay_ms)),
        Commands::Local { seed, size } => local(seed, size),
    }
}

fn config_for(seed: Option<u64>, size: usize) -> MatchConfig {
    let mut config = MatchConfig::with_size(size);
    if let Some(s) = seed {
        println!("Using fixed seed: {} (game will be reproducible)", s);
        config = config.seed(s);
    }
    config
}

/// Prompt and read one line; `None` on end of input.
fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, text: &str) -> anyhow::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Hit => "Hit!".to_string(),
        Outcome::Miss => "Miss.".to_string(),
        Outcome::Sunk(name) => format!("Sunk the {}!", name),
    }
}

fn play(seed: Option<u64>, size: usize, auto_place: bool, delay: Duration) -> anyhow::Result<()> {
    let config = config_for(seed, size);
    let mut game = MatchController::new(config.clone()).map_err(|e| anyhow!(e))?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if auto_place {
        game.auto_place(Side::Player).map_err(|e| anyhow!(e))?;
    }

    while let Some(def) = game.next_ship(Side::Player) {
        println!("\n{}", render_grid(game.grid(Side::Player), true));
        let text = format!("Place your {} (length {}), e.g. 'A1 v': ", def.name(), def.length());
        let Some(line) = prompt(&mut lines, &text)? else {
            return Ok(());
        };
        let (at, vertical) = match parse_placement(&line, config.width, config.height) {
            Ok(p) => p,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };
        if let Err(e) = game.place_ship(Side::Player, def.name(), at.x, at.y, vertical) {
            println!("{}", e);
        }
    }

    println!("\nBattle commencing!");
    while game.phase() == Phase::Battle {
        match game.turn() {
            Side::Player => {
                println!("\nEnemy waters:\n{}", render_grid(game.grid(Side::Opponent), false));
                println!("Your fleet:\n{}", render_grid(game.grid(Side::Player), true));
                let Some(line) = prompt(&mut lines, "Your target: ")? else {
                    return Ok(());
                };
                let at = match parse_coord(&line, config.width, config.height) {
                    Ok(at) => at,
                    Err(msg) => {
                        println!("{}", msg);
                        continue;
                    }
                };
                match game.fire_shot(Side::Player, at.x, at.y) {
                    Ok(outcome) => println!("{}", describe(&outcome)),
                    Err(e) => println!("{}", e),
                }
            }
            Side::Opponent => {
                println!("Opponent is taking aim...");
                thread::sleep(delay);
                let report = game.take_ai_turn().map_err(|e| anyhow!(e))?;
                println!(
                    "Opponent fires at {}: {}",
                    coord_to_string(report.at),
                    describe(&report.outcome)
                );
            }
        }
    }

    match game.winner() {
        Some(Side::Player) => println!("\nVICTORY! You have destroyed the enemy fleet!"),
        Some(Side::Opponent) => println!("\nDEFEAT! Your entire fleet has been sunk."),
        None => {}
    }
    println!("\nEnemy fleet:\n{}", render_grid(game.grid(Side::Opponent), true));
    print!("{}", render_fleet_status(game.grid(Side::Opponent)));
    Ok(())
}

fn local(seed: Option<u64>, size: usize) -> anyhow::Result<()> {
    println!("Starting local AI vs AI game...");
    let config = config_for(seed, size).kinds(SideKind::Ai, SideKind::Ai);
    let mut game = MatchController::new(config).map_err(|e| anyhow!(e))?;

    while game.phase() == Phase::Battle {
        let report = game.take_ai_turn().map_err(|e| anyhow!(e))?;
        println!(
            "{:?} fires at {}: {}",
            report.shooter,
            coord_to_string(report.at),
            describe(&report.outcome)
        );
    }

    let state = game.current_state();
    for side in Side::ALL {
        println!("\n{:?} fleet ({} shots fired):", side, state.shots[side.index()]);
        print!("{}", render_grid(state.grid(side), true));
        print!("{}", render_fleet_status(state.grid(side)));
    }
    if let Some(winner) = state.winner() {
        println!("\n{:?} wins!", winner);
    }
    Ok(())
}
