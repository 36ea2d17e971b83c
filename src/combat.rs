//! Shot resolution seam between the match controller and the grid.

use crate::common::{Coord, GridError, Outcome};
use crate::grid::Grid;

/// Applies a shot to a grid. Alternate damage rules plug in here without
/// touching `Grid`.
pub trait CombatResolver: Send {
    fn resolve(&self, grid: &mut Grid, at: Coord) -> Result<Outcome, GridError>;
}

/// One shot, one cell: defers to `Grid::receive_shot`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardResolver;

impl CombatResolver for StandardResolver {
    fn resolve(&self, grid: &mut Grid, at: Coord) -> Result<Outcome, GridError> {
        grid.receive_shot(at.x, at.y)
    }
}
