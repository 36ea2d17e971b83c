//! Match orchestration: fleet placement, strict turn order and the win
//! condition for two sides, each either human or AI-controlled.

use alloc::boxed::Box;
use alloc::string::ToString;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::ai::{AiState, TargetingAi};
use crate::combat::{CombatResolver, StandardResolver};
use crate::common::{ConfigError, Coord, GridError, Outcome, PlacementError, TurnError};
use crate::config::{MatchConfig, SideKind};
use crate::grid::Grid;
use crate::ship::{Orientation, Ship, ShipType};

/// One of the two fleets in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

/// Lifecycle of a match. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Placement,
    Battle,
    GameOver { winner: Side },
}

/// A resolved shot, as returned for AI turns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ShotReport {
    pub shooter: Side,
    pub at: Coord,
    pub outcome: Outcome,
}

/// Read-only snapshot of a match, indexed by `Side::index`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub phase: Phase,
    pub turn: Side,
    pub grids: [Grid; 2],
    /// Ships placed so far per side.
    pub placed: [usize; 2],
    pub kinds: [SideKind; 2],
    pub ai: [Option<AiState>; 2],
    /// Shots fired per side.
    pub shots: [usize; 2],
}

impl MatchState {
    pub fn grid(&self, side: Side) -> &Grid {
        &self.grids[side.index()]
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }
}

struct SideState {
    grid: Grid,
    kind: SideKind,
    placed: usize,
    ai: Option<TargetingAi>,
    shots: usize,
}

impl SideState {
    fn new(config: &MatchConfig, kind: SideKind) -> Self {
        let ai = match kind {
            SideKind::Ai => Some(TargetingAi::new(config.width, config.height)),
            SideKind::Human => None,
        };
        Self {
            grid: Grid::new(config.width, config.height),
            kind,
            placed: 0,
            ai,
            shots: 0,
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        #[cfg(feature = "std")]
        None => SmallRng::from_rng(&mut rand::rng()),
        #[cfg(not(feature = "std"))]
        None => SmallRng::seed_from_u64(0),
    }
}

/// Owns both grids and enforces the rules of a match.
pub struct MatchController {
    config: MatchConfig,
    rng: SmallRng,
    resolver: Box<dyn CombatResolver>,
    phase: Phase,
    turn: Side,
    sides: [SideState; 2],
}

impl MatchController {
    /// Validate `config` and start the first match.
    pub fn new(config: MatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sides = [
            SideState::new(&config, config.kind(Side::Player)),
            SideState::new(&config, config.kind(Side::Opponent)),
        ];
        let mut controller = Self {
            rng: seeded_rng(config.seed),
            resolver: Box::new(StandardResolver),
            phase: Phase::Placement,
            turn: config.first,
            sides,
            config,
        };
        controller
            .start_match()
            .map_err(|_| ConfigError::FleetUnplaceable)?;
        Ok(controller)
    }

    /// Swap the shot resolution policy.
    pub fn with_resolver(mut self, resolver: impl CombatResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Discard the current match and begin a new one. AI sides get their
    /// fleets placed at random; if no human side has ships to place the
    /// match goes straight to battle. On error the previous match is kept.
    pub fn start_match(&mut self) -> Result<MatchState, PlacementError> {
        let mut sides = [
            SideState::new(&self.config, self.config.kind(Side::Player)),
            SideState::new(&self.config, self.config.kind(Side::Opponent)),
        ];
        for side in sides.iter_mut().filter(|s| s.kind == SideKind::Ai) {
            side.grid
                .place_fleet_randomly(&mut self.rng, &self.config.fleet)?;
            side.placed = self.config.fleet.len();
        }
        self.sides = sides;
        self.phase = Phase::Placement;
        self.turn = self.config.first;
        log::info!(
            "match started on {}x{} grid, {} ships per side",
            self.config.width,
            self.config.height,
            self.config.fleet.len()
        );
        if self.fleets_complete() {
            self.enter_battle();
        }
        Ok(self.current_state())
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side to act next.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn kind(&self, side: Side) -> SideKind {
        self.sides[side.index()].kind
    }

    pub fn grid(&self, side: Side) -> &Grid {
        &self.sides[side.index()].grid
    }

    pub fn ai_state(&self, side: Side) -> Option<AiState> {
        self.sides[side.index()].ai.as_ref().map(TargetingAi::state)
    }

    /// Template ship `side` must place next, if any.
    pub fn next_ship(&self, side: Side) -> Option<ShipType> {
        self.config.fleet.get(self.sides[side.index()].placed).copied()
    }

    fn fleets_complete(&self) -> bool {
        self.sides
            .iter()
            .all(|s| s.placed == self.config.fleet.len())
    }

    fn enter_battle(&mut self) {
        self.phase = Phase::Battle;
        self.turn = self.config.first;
        log::info!("all fleets deployed, {:?} fires first", self.turn);
    }

    /// Place the next template ship of a human side.
    pub fn place_ship(
        &mut self,
        side: Side,
        ship_name: &str,
        x: usize,
        y: usize,
        vertical: bool,
    ) -> Result<(), PlacementError> {
        if self.phase != Phase::Placement {
            return Err(PlacementError::MatchNotInPlacement);
        }
        let expected = self.next_ship(side);
        let state = &mut self.sides[side.index()];
        if state.kind != SideKind::Human {
            return Err(PlacementError::NotHumanSide);
        }
        let def = expected.ok_or(PlacementError::FleetComplete)?;
        if !def.name().eq_ignore_ascii_case(ship_name) {
            return Err(PlacementError::UnexpectedShip {
                expected: def.name(),
                got: ship_name.to_string(),
            });
        }
        if !state.grid.can_place(def.length(), x, y, vertical) {
            return Err(PlacementError::InvalidPlacement);
        }
        let orientation = Orientation::from_vertical(vertical);
        state
            .grid
            .place_ship(Ship::new(def, Coord::new(x, y), orientation))?;
        state.placed += 1;

        if self.fleets_complete() {
            self.enter_battle();
        }
        Ok(())
    }

    /// Place every remaining ship of a human side at random valid
    /// positions, all or nothing.
    pub fn auto_place(&mut self, side: Side) -> Result<(), PlacementError> {
        if self.phase != Phase::Placement {
            return Err(PlacementError::MatchNotInPlacement);
        }
        let state = &mut self.sides[side.index()];
        if state.kind != SideKind::Human {
            return Err(PlacementError::NotHumanSide);
        }
        let remaining = &self.config.fleet[state.placed..];
        if remaining.is_empty() {
            return Err(PlacementError::FleetComplete);
        }
        state.grid.place_fleet_randomly(&mut self.rng, remaining)?;
        state.placed = self.config.fleet.len();

        if self.fleets_complete() {
            self.enter_battle();
        }
        Ok(())
    }

    /// Fire a shot for `side` at the other side's grid.
    pub fn fire_shot(&mut self, side: Side, x: usize, y: usize) -> Result<Outcome, TurnError> {
        if self.phase != Phase::Battle {
            return Err(TurnError::MatchNotInBattle);
        }
        if side != self.turn {
            return Err(TurnError::NotYourTurn);
        }
        let at = Coord::new(x, y);
        let target = self.grid(side.other());
        if !target.in_bounds(at) {
            return Err(TurnError::OutOfBounds);
        }
        if target.is_resolved(at) {
            return Err(TurnError::AlreadyResolved);
        }
        self.resolve(side, at)
    }

    /// Let the AI side to act pick and fire its shot.
    pub fn take_ai_turn(&mut self) -> Result<ShotReport, TurnError> {
        if self.phase != Phase::Battle {
            return Err(TurnError::MatchNotInBattle);
        }
        let shooter = self.turn;
        let [player, opponent] = &mut self.sides;
        let (own, target) = match shooter {
            Side::Player => (player, opponent),
            Side::Opponent => (opponent, player),
        };
        let ai = own.ai.as_mut().ok_or(TurnError::NotAiTurn)?;
        let at = ai
            .next_target(&mut self.rng, &target.grid)
            .ok_or(TurnError::AlreadyResolved)?;

        let outcome = self.resolve(shooter, at)?;
        if let Some(ai) = self.sides[shooter.index()].ai.as_mut() {
            ai.record_outcome(at, &outcome);
        }
        Ok(ShotReport {
            shooter,
            at,
            outcome,
        })
    }

    fn resolve(&mut self, shooter: Side, at: Coord) -> Result<Outcome, TurnError> {
        let target = &mut self.sides[shooter.other().index()];
        let outcome = self
            .resolver
            .resolve(&mut target.grid, at)
            .map_err(|err| match err {
                GridError::OutOfBounds => TurnError::OutOfBounds,
                GridError::InvalidPlacement | GridError::InconsistentLayout => {
                    TurnError::Resolver(err)
                }
            })?;
        let defeated = matches!(outcome, Outcome::Sunk(_)) && target.grid.all_sunk();
        self.sides[shooter.index()].shots += 1;
        log::debug!("{:?} fires at {}: {}", shooter, at, outcome);

        if defeated {
            self.phase = Phase::GameOver { winner: shooter };
            log::info!("{:?} wins after {} shots", shooter, self.sides[shooter.index()].shots);
        } else {
            self.turn = shooter.other();
        }
        Ok(outcome)
    }

    /// Snapshot for rendering.
    pub fn current_state(&self) -> MatchState {
        MatchState {
            phase: self.phase,
            turn: self.turn,
            grids: [
                self.sides[0].grid.clone(),
                self.sides[1].grid.clone(),
            ],
            placed: [self.sides[0].placed, self.sides[1].placed],
            kinds: [self.sides[0].kind, self.sides[1].kind],
            ai: [self.ai_state(Side::Player), self.ai_state(Side::Opponent)],
            shots: [self.sides[0].shots, self.sides[1].shots],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FLEET_TEMPLATE, GRID_SIZE};
    use alloc::vec::Vec;

    fn seeded(seed: u64) -> MatchController {
        MatchController::new(MatchConfig::default().seed(seed)).unwrap()
    }

    fn place_fleet_in_rows(game: &mut MatchController, side: Side) {
        for (row, def) in FLEET_TEMPLATE.iter().enumerate() {
            game.place_ship(side, def.name(), 0, row * 2, false).unwrap();
        }
    }

    #[test]
    fn new_match_waits_for_human_placement() {
        let game = seeded(1);
        assert_eq!(game.phase(), Phase::Placement);
        assert_eq!(game.grid(Side::Opponent).ships().len(), FLEET_TEMPLATE.len());
        assert!(game.grid(Side::Player).ships().is_empty());
        assert_eq!(game.next_ship(Side::Player), Some(FLEET_TEMPLATE[0]));
    }

    #[test]
    fn placement_enforces_template_order() {
        let mut game = seeded(2);
        let err = game.place_ship(Side::Player, "destroyer", 0, 0, false).unwrap_err();
        assert_eq!(
            err,
            PlacementError::UnexpectedShip {
                expected: "carrier",
                got: "destroyer".into()
            }
        );
        game.place_ship(Side::Player, "Carrier", 0, 0, false).unwrap();
        assert_eq!(game.next_ship(Side::Player), Some(FLEET_TEMPLATE[1]));
    }

    #[test]
    fn invalid_placement_leaves_index_alone() {
        let mut game = seeded(3);
        game.place_ship(Side::Player, "carrier", 0, 0, false).unwrap();
        let before = game.current_state();
        assert_eq!(
            game.place_ship(Side::Player, "battleship", 2, 0, true),
            Err(PlacementError::InvalidPlacement)
        );
        assert_eq!(
            game.place_ship(Side::Player, "battleship", 7, 0, false),
            Err(PlacementError::InvalidPlacement)
        );
        assert_eq!(game.current_state(), before);
        assert_eq!(game.next_ship(Side::Player), Some(FLEET_TEMPLATE[1]));
    }

    #[test]
    fn ai_side_cannot_be_placed_by_hand() {
        let mut game = seeded(4);
        assert_eq!(
            game.place_ship(Side::Opponent, "carrier", 0, 0, false),
            Err(PlacementError::NotHumanSide)
        );
    }

    #[test]
    fn last_placement_starts_battle() {
        let mut game = seeded(5);
        place_fleet_in_rows(&mut game, Side::Player);
        assert_eq!(game.phase(), Phase::Battle);
        assert_eq!(game.turn(), Side::Player);
        assert_eq!(
            game.place_ship(Side::Player, "carrier", 0, 1, false),
            Err(PlacementError::MatchNotInPlacement)
        );
    }

    #[test]
    fn shots_rejected_outside_battle() {
        let mut game = seeded(6);
        assert_eq!(
            game.fire_shot(Side::Player, 0, 0),
            Err(TurnError::MatchNotInBattle)
        );
        assert_eq!(game.take_ai_turn(), Err(TurnError::MatchNotInBattle));
    }

    #[test]
    fn turn_order_is_enforced() {
        let mut game = seeded(7);
        place_fleet_in_rows(&mut game, Side::Player);
        let before = game.current_state();
        assert_eq!(game.fire_shot(Side::Opponent, 0, 0), Err(TurnError::NotYourTurn));
        assert_eq!(game.take_ai_turn(), Err(TurnError::NotAiTurn));
        assert_eq!(game.current_state(), before);

        game.fire_shot(Side::Player, 0, 0).unwrap();
        assert_eq!(game.turn(), Side::Opponent);
        assert_eq!(game.fire_shot(Side::Player, 1, 0), Err(TurnError::NotYourTurn));

        let report = game.take_ai_turn().unwrap();
        assert_eq!(report.shooter, Side::Opponent);
        assert!(game.grid(Side::Player).is_resolved(report.at));
        assert_eq!(game.turn(), Side::Player);
    }

    #[test]
    fn out_of_bounds_shot_is_rejected() {
        let mut game = seeded(8);
        place_fleet_in_rows(&mut game, Side::Player);
        assert_eq!(game.fire_shot(Side::Player, 10, 0), Err(TurnError::OutOfBounds));
        assert_eq!(game.turn(), Side::Player);
    }

    #[test]
    fn restart_discards_previous_match() {
        let mut game = seeded(9);
        place_fleet_in_rows(&mut game, Side::Player);
        game.fire_shot(Side::Player, 0, 0).unwrap();
        let state = game.start_match().unwrap();
        assert_eq!(state.phase, Phase::Placement);
        assert_eq!(state.placed, [0, FLEET_TEMPLATE.len()]);
        assert_eq!(state.shots, [0, 0]);
    }

    #[test]
    fn auto_place_finishes_a_partial_fleet() {
        let mut game = seeded(11);
        game.place_ship(Side::Player, "carrier", 0, 0, false).unwrap();
        game.auto_place(Side::Player).unwrap();
        assert_eq!(game.phase(), Phase::Battle);
        let ships = game.grid(Side::Player).ships();
        assert_eq!(ships.len(), FLEET_TEMPLATE.len());
        assert_eq!(ships[0].origin(), Coord::new(0, 0));
        assert_eq!(
            game.auto_place(Side::Player),
            Err(PlacementError::MatchNotInPlacement)
        );
    }

    #[test]
    fn exhausted_ai_turn_leaves_state_unchanged() {
        let config = MatchConfig::default()
            .seed(12)
            .kinds(SideKind::Ai, SideKind::Ai);
        let mut game = MatchController::new(config).unwrap();
        let mut spent = Grid::new(GRID_SIZE, GRID_SIZE);
        for at in spent.coords().collect::<Vec<_>>() {
            spent.receive_shot(at.x, at.y).unwrap();
        }
        game.sides[Side::Opponent.index()].grid = spent;
        if let Some(ai) = game.sides[Side::Player.index()].ai.as_mut() {
            ai.record_outcome(Coord::new(0, 0), &Outcome::Hit);
        }

        let before = game.current_state();
        assert_eq!(game.take_ai_turn(), Err(TurnError::AlreadyResolved));
        assert_eq!(game.current_state(), before);
    }

    #[test]
    fn all_ai_match_starts_in_battle() {
        let config = MatchConfig::default()
            .seed(10)
            .kinds(SideKind::Ai, SideKind::Ai);
        let game = MatchController::new(config).unwrap();
        assert_eq!(game.phase(), Phase::Battle);
    }
}
