use alloc::vec::Vec;

use crate::common::ConfigError;
use crate::game::Side;
use crate::ship::ShipType;

pub const GRID_SIZE: usize = 10;
/// Largest accepted width or height.
pub const MAX_GRID_SIZE: usize = 100;
pub const NUM_SHIPS: usize = 5;

/// Standard fleet, in the order ships are placed.
pub const FLEET_TEMPLATE: [ShipType; NUM_SHIPS] = [
    ShipType::new("carrier", 5),
    ShipType::new("battleship", 4),
    ShipType::new("cruiser", 3),
    ShipType::new("submarine", 3),
    ShipType::new("destroyer", 2),
];

/// Total number of ship segments in the standard fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Who drives a side of the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum SideKind {
    Human,
    Ai,
}

/// Runtime parameters of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    pub width: usize,
    pub height: usize,
    pub fleet: Vec<ShipType>,
    /// Controllers for `[Side::Player, Side::Opponent]`.
    pub kinds: [SideKind; 2],
    /// Side that fires first once battle begins.
    pub first: Side,
    /// Fixed RNG seed for reproducible matches.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: GRID_SIZE,
            height: GRID_SIZE,
            fleet: FLEET_TEMPLATE.to_vec(),
            kinds: [SideKind::Human, SideKind::Ai],
            first: Side::Player,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Square grid of `size` with the standard fleet.
    pub fn with_size(size: usize) -> Self {
        Self {
            width: size,
            height: size,
            ..Self::default()
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn kinds(mut self, player: SideKind, opponent: SideKind) -> Self {
        self.kinds = [player, opponent];
        self
    }

    pub fn kind(&self, side: Side) -> SideKind {
        self.kinds[side.index()]
    }

    /// Reject grids the fleet can never fit on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.width > MAX_GRID_SIZE || self.height > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge);
        }
        if self.fleet.is_empty() {
            return Err(ConfigError::EmptyFleet);
        }
        let longest_axis = self.width.max(self.height);
        if let Some(def) = self
            .fleet
            .iter()
            .find(|def| def.length() == 0 || def.length() > longest_axis)
        {
            return Err(ConfigError::InvalidShipLength(def.name()));
        }
        let total = self
            .fleet
            .iter()
            .try_fold(0usize, |acc, def| acc.checked_add(def.length()));
        if !total.is_some_and(|total| total <= self.width * self.height) {
            return Err(ConfigError::FleetTooLarge);
        }
        Ok(())
    }
}
