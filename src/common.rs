//! Common types for the match core: coordinates, shot outcomes and errors.

use alloc::string::String;
use core::fmt;

/// A cell address; `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours in probe order: up, down, left, right.
    /// Coordinates that would go below zero are dropped; callers clip the
    /// upper bound against their grid.
    pub fn neighbours(self) -> impl Iterator<Item = Coord> {
        let Coord { x, y } = self;
        [
            y.checked_sub(1).map(|y| Coord::new(x, y)),
            y.checked_add(1).map(|y| Coord::new(x, y)),
            x.checked_sub(1).map(|x| Coord::new(x, y)),
            x.checked_add(1).map(|x| Coord::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Result of a shot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// Shot struck a ship that is still afloat.
    Hit,
    /// Shot found open water, or a cell that was already resolved.
    Miss,
    /// Shot sank a ship, carrying its name.
    Sunk(String),
}

impl Outcome {
    /// `true` for both `Hit` and `Sunk`.
    pub fn is_hit(&self) -> bool {
        !matches!(self, Outcome::Miss)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Hit => write!(f, "hit"),
            Outcome::Miss => write!(f, "miss"),
            Outcome::Sunk(name) => write!(f, "sunk {}", name),
        }
    }
}

/// Errors returned by `Grid` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Footprint leaves the grid or overlaps another ship.
    InvalidPlacement,
    /// Coordinate lies outside the grid.
    OutOfBounds,
    /// Cells and ships of a loaded grid disagree.
    InconsistentLayout,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidPlacement => {
                write!(f, "Ship placement is out of bounds or overlaps another ship")
            }
            GridError::OutOfBounds => write!(f, "Coordinate is outside the grid"),
            GridError::InconsistentLayout => write!(f, "Grid cells do not match its ships"),
        }
    }
}

/// Errors returned when placing ships through the match controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// Footprint leaves the grid or overlaps another ship.
    InvalidPlacement,
    /// Placement attempted outside the placement phase.
    MatchNotInPlacement,
    /// The side is AI-controlled and places its fleet automatically.
    NotHumanSide,
    /// Every ship of the fleet is already placed.
    FleetComplete,
    /// Ships must be placed in template order.
    UnexpectedShip { expected: &'static str, got: String },
}

impl From<GridError> for PlacementError {
    fn from(_: GridError) -> Self {
        PlacementError::InvalidPlacement
    }
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::InvalidPlacement => {
                write!(f, "Ship placement is out of bounds or overlaps another ship")
            }
            PlacementError::MatchNotInPlacement => write!(f, "Match is not in the placement phase"),
            PlacementError::NotHumanSide => write!(f, "Side places its fleet automatically"),
            PlacementError::FleetComplete => write!(f, "All ships are already placed"),
            PlacementError::UnexpectedShip { expected, got } => {
                write!(f, "Expected to place the {}, got '{}'", expected, got)
            }
        }
    }
}

/// Errors returned when firing through the match controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnError {
    /// Shot coordinate outside the grid.
    OutOfBounds,
    /// The other side is to act.
    NotYourTurn,
    /// Cell was already hit or missed.
    AlreadyResolved,
    /// Shot attempted during placement or after the match ended.
    MatchNotInBattle,
    /// AI move requested while a human side is to act.
    NotAiTurn,
    /// The combat resolver rejected the shot.
    Resolver(GridError),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::OutOfBounds => write!(f, "Coordinate is outside the grid"),
            TurnError::NotYourTurn => write!(f, "It is not your turn"),
            TurnError::AlreadyResolved => write!(f, "That cell was already fired upon"),
            TurnError::MatchNotInBattle => write!(f, "Match is not in the battle phase"),
            TurnError::NotAiTurn => write!(f, "Side to act is not AI-controlled"),
            TurnError::Resolver(err) => write!(f, "Shot rejected: {}", err),
        }
    }
}

/// Errors returned by `MatchConfig::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyGrid,
    /// Width or height exceeds `MAX_GRID_SIZE`.
    GridTooLarge,
    EmptyFleet,
    /// Ship has zero length or is longer than either grid axis allows.
    InvalidShipLength(&'static str),
    /// Fleet has more segments than the grid has cells.
    FleetTooLarge,
    /// Random placement found no room for some ship.
    FleetUnplaceable,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyGrid => write!(f, "Grid must have non-zero width and height"),
            ConfigError::GridTooLarge => write!(f, "Grid is larger than the supported maximum"),
            ConfigError::EmptyFleet => write!(f, "Fleet must contain at least one ship"),
            ConfigError::InvalidShipLength(name) => {
                write!(f, "The {} cannot fit on the grid", name)
            }
            ConfigError::FleetTooLarge => write!(f, "Fleet has more segments than the grid has cells"),
            ConfigError::FleetUnplaceable => write!(f, "Fleet could not be placed on the grid"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GridError {}
#[cfg(feature = "std")]
impl std::error::Error for PlacementError {}
#[cfg(feature = "std")]
impl std::error::Error for TurnError {}
#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
