use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use salvo::{
    CombatResolver, Coord, Grid, GridError, MatchConfig, MatchController, Outcome, Phase,
    PlacementError, Side, SideKind, TurnError, FLEET_TEMPLATE,
};

fn hot_seat(seed: u64) -> MatchController {
    let config = MatchConfig::default()
        .seed(seed)
        .kinds(SideKind::Human, SideKind::Human);
    MatchController::new(config).unwrap()
}

/// Both fleets laid out on even rows starting at column 0.
fn deploy_both(game: &mut MatchController) {
    for side in Side::ALL {
        for (row, def) in FLEET_TEMPLATE.iter().enumerate() {
            game.place_ship(side, def.name(), 0, row * 2, false).unwrap();
        }
    }
}

fn fleet_cells(game: &MatchController, side: Side) -> Vec<Coord> {
    game.grid(side).ships().iter().flat_map(|s| s.cells()).collect()
}

fn water_cells(game: &MatchController, side: Side) -> Vec<Coord> {
    let grid = game.grid(side);
    grid.coords().filter(|&c| grid.ship_at(c).is_none()).collect()
}

#[test]
fn placing_both_fleets_reaches_battle() {
    let mut game = hot_seat(1);
    assert_eq!(game.phase(), Phase::Placement);
    for (row, def) in FLEET_TEMPLATE.iter().enumerate() {
        game.place_ship(Side::Player, def.name(), 0, row * 2, false).unwrap();
    }
    // still waiting on the opponent
    assert_eq!(game.phase(), Phase::Placement);
    assert_eq!(
        game.place_ship(Side::Player, "carrier", 5, 1, false),
        Err(PlacementError::FleetComplete)
    );
    for (row, def) in FLEET_TEMPLATE.iter().enumerate() {
        game.place_ship(Side::Opponent, def.name(), 0, row * 2, false).unwrap();
    }
    assert_eq!(game.phase(), Phase::Battle);
    assert_eq!(game.turn(), Side::Player);
}

#[test]
fn sinking_a_whole_fleet_ends_the_match() {
    let mut game = hot_seat(2);
    deploy_both(&mut game);

    let targets = fleet_cells(&game, Side::Opponent);
    let mut decoys = water_cells(&game, Side::Player).into_iter();
    let mut sunk = 0;
    for (i, at) in targets.iter().enumerate() {
        let outcome = game.fire_shot(Side::Player, at.x, at.y).unwrap();
        if let Outcome::Sunk(_) = outcome {
            sunk += 1;
        }
        if i + 1 < targets.len() {
            assert_eq!(game.phase(), Phase::Battle);
            let decoy = decoys.next().unwrap();
            assert_eq!(
                game.fire_shot(Side::Opponent, decoy.x, decoy.y),
                Ok(Outcome::Miss)
            );
        }
    }

    assert_eq!(sunk, FLEET_TEMPLATE.len());
    assert!(game.grid(Side::Opponent).all_sunk());
    assert_eq!(game.phase(), Phase::GameOver { winner: Side::Player });
    assert_eq!(game.winner(), Some(Side::Player));

    // terminal
    let before = game.current_state();
    assert_eq!(game.fire_shot(Side::Opponent, 0, 0), Err(TurnError::MatchNotInBattle));
    assert_eq!(game.fire_shot(Side::Player, 9, 9), Err(TurnError::MatchNotInBattle));
    assert_eq!(game.current_state(), before);
}

#[test]
fn out_of_turn_shot_changes_neither_grid() {
    let mut game = hot_seat(3);
    deploy_both(&mut game);
    let before = game.current_state();
    assert_eq!(game.fire_shot(Side::Opponent, 0, 0), Err(TurnError::NotYourTurn));
    assert_eq!(game.current_state(), before);
}

#[test]
fn repeat_shot_is_rejected_without_extra_turn() {
    let mut game = hot_seat(4);
    deploy_both(&mut game);

    assert_eq!(game.fire_shot(Side::Player, 0, 0), Ok(Outcome::Hit));
    assert_eq!(game.fire_shot(Side::Opponent, 9, 9), Ok(Outcome::Miss));
    assert_eq!(game.turn(), Side::Player);

    let before = game.current_state();
    assert_eq!(game.fire_shot(Side::Player, 0, 0), Err(TurnError::AlreadyResolved));
    assert_eq!(game.turn(), Side::Player);
    assert_eq!(game.current_state(), before);

    // a fresh cell is still accepted and hands the turn over once
    assert_eq!(game.fire_shot(Side::Player, 1, 0), Ok(Outcome::Hit));
    assert_eq!(game.turn(), Side::Opponent);
}

#[test]
fn human_against_ai() {
    let mut game = MatchController::new(MatchConfig::default().seed(5)).unwrap();
    game.auto_place(Side::Player).unwrap();
    assert_eq!(game.phase(), Phase::Battle);

    let mut shots = game.grid(Side::Opponent).coords().collect::<Vec<_>>().into_iter();
    while game.phase() == Phase::Battle {
        match game.turn() {
            Side::Player => {
                let at = shots.next().unwrap();
                game.fire_shot(Side::Player, at.x, at.y).unwrap();
            }
            Side::Opponent => {
                let report = game.take_ai_turn().unwrap();
                assert_eq!(report.shooter, Side::Opponent);
            }
        }
    }
    let state = game.current_state();
    let winner = state.winner().unwrap();
    assert!(state.grid(winner.other()).all_sunk());
}

#[test]
fn custom_resolver_is_used() {
    struct Counting(Arc<AtomicUsize>);

    impl CombatResolver for Counting {
        fn resolve(&self, grid: &mut Grid, at: Coord) -> Result<Outcome, GridError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            grid.receive_shot(at.x, at.y)
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut game = hot_seat(6).with_resolver(Counting(calls.clone()));
    deploy_both(&mut game);
    game.fire_shot(Side::Player, 5, 5).unwrap();
    game.fire_shot(Side::Opponent, 5, 5).unwrap();
    assert_eq!(game.fire_shot(Side::Player, 5, 5), Err(TurnError::AlreadyResolved));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn resolver_rejection_is_reported_as_is() {
    struct Refusing;

    impl CombatResolver for Refusing {
        fn resolve(&self, _grid: &mut Grid, _at: Coord) -> Result<Outcome, GridError> {
            Err(GridError::InvalidPlacement)
        }
    }

    let mut game = hot_seat(7).with_resolver(Refusing);
    deploy_both(&mut game);
    let before = game.current_state();
    assert_eq!(
        game.fire_shot(Side::Player, 5, 5),
        Err(TurnError::Resolver(GridError::InvalidPlacement))
    );
    assert_eq!(game.current_state(), before);
    assert_eq!(game.turn(), Side::Player);
}
