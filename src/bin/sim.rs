use anyhow::anyhow;
use salvo::{init_logging, MatchConfig, MatchController, Phase, Side, SideKind};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;

    let config = MatchConfig::default()
        .seed(seed)
        .kinds(SideKind::Ai, SideKind::Ai);
    let max_shots = 2 * config.width * config.height;
    let mut game = MatchController::new(config).map_err(|e| anyhow!(e))?;

    let mut turns = 0;
    while game.phase() == Phase::Battle {
        if turns >= max_shots {
            return Err(anyhow!("match did not finish after {} shots", turns));
        }
        game.take_ai_turn().map_err(|e| anyhow!(e))?;
        turns += 1;
    }

    let state = game.current_state();
    let winner = state.winner().map(|side| match side {
        Side::Player => "player",
        Side::Opponent => "opponent",
    });

    let result = json!({
        "seed": seed,
        "winner": winner,
        "turns": turns,
        "shots": {
            "player": state.shots[Side::Player.index()],
            "opponent": state.shots[Side::Opponent.index()],
        },
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
