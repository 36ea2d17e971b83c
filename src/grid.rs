//! Grid state: ship placements, hits and misses.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use rand::Rng;

use crate::common::{Coord, GridError, Outcome};
use crate::config::MAX_GRID_SIZE;
use crate::ship::{footprint, Orientation, Ship, ShipType};

/// Index of a ship in its grid's ship list.
pub type ShipId = usize;

/// State of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Cell {
    Empty,
    Occupied(ShipId),
    Hit,
    Miss,
}

impl Cell {
    /// Hit or Miss.
    pub fn is_resolved(self) -> bool {
        matches!(self, Cell::Hit | Cell::Miss)
    }
}

/// Fixed-size cell matrix plus the ships placed on it.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawGrid")
)]
pub struct Grid {
    width: usize,
    height: usize,
    // row-major, `y * width + x`
    cells: Vec<Cell>,
    ships: Vec<Ship>,
}

impl Grid {
    /// Create an empty grid (no ships placed).
    ///
    /// # Panics
    ///
    /// If either dimension exceeds `MAX_GRID_SIZE`.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width <= MAX_GRID_SIZE && height <= MAX_GRID_SIZE,
            "grid exceeds MAX_GRID_SIZE"
        );
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
            ships: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, at: Coord) -> bool {
        at.x < self.width && at.y < self.height
    }

    fn index(&self, at: Coord) -> Option<usize> {
        self.in_bounds(at).then(|| at.y * self.width + at.x)
    }

    /// Cell at `at`, or `None` outside the grid.
    pub fn cell(&self, at: Coord) -> Option<Cell> {
        self.index(at).map(|i| self.cells[i])
    }

    /// `true` if the cell was already hit or missed.
    pub fn is_resolved(&self, at: Coord) -> bool {
        self.cell(at).is_some_and(Cell::is_resolved)
    }

    /// Placed ships, in placement order.
    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Ship occupying or previously occupying `at`.
    pub fn ship_at(&self, at: Coord) -> Option<&Ship> {
        self.ships.iter().find(|s| s.contains(at))
    }

    /// Returns `true` when ships were placed and all of them are sunk.
    pub fn all_sunk(&self) -> bool {
        !self.ships.is_empty() && self.ships.iter().all(Ship::is_sunk)
    }

    /// Number of ships still afloat.
    pub fn remaining_ships(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_sunk()).count()
    }

    /// Every coordinate of the grid, row by row.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }

    /// Whether a ship of `length` fits at (`x`, `y`) without leaving the
    /// grid or touching a non-empty cell.
    pub fn can_place(&self, length: usize, x: usize, y: usize, vertical: bool) -> bool {
        length > 0
            && footprint(Coord::new(x, y), length, Orientation::from_vertical(vertical))
                .all(|c| c.and_then(|c| self.cell(c)) == Some(Cell::Empty))
    }

    /// Place `ship`, marking its footprint occupied.
    pub fn place_ship(&mut self, ship: Ship) -> Result<ShipId, GridError> {
        let origin = ship.origin();
        if !self.can_place(
            ship.length(),
            origin.x,
            origin.y,
            ship.orientation().is_vertical(),
        ) {
            return Err(GridError::InvalidPlacement);
        }
        let id = self.ships.len();
        for at in ship.cells() {
            if let Some(i) = self.index(at) {
                self.cells[i] = Cell::Occupied(id);
            }
        }
        log::debug!("placed {:?} as #{}", ship, id);
        self.ships.push(ship);
        Ok(id)
    }

    /// Process a shot at (`x`, `y`). Resolved cells are tolerated and
    /// reported as a miss without changing anything.
    pub fn receive_shot(&mut self, x: usize, y: usize) -> Result<Outcome, GridError> {
        let i = self.index(Coord::new(x, y)).ok_or(GridError::OutOfBounds)?;
        match self.cells[i] {
            Cell::Occupied(id) => {
                self.cells[i] = Cell::Hit;
                let ship = &mut self.ships[id];
                ship.register_hit();
                if ship.is_sunk() {
                    Ok(Outcome::Sunk(ship.name().into()))
                } else {
                    Ok(Outcome::Hit)
                }
            }
            Cell::Empty => {
                self.cells[i] = Cell::Miss;
                Ok(Outcome::Miss)
            }
            Cell::Hit | Cell::Miss => Ok(Outcome::Miss),
        }
    }

    /// A uniformly chosen valid origin and orientation for a ship of
    /// `length`, or `None` if it fits nowhere.
    pub fn random_placement<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        length: usize,
    ) -> Option<(Coord, Orientation)> {
        let candidates: Vec<(Coord, Orientation)> = self
            .coords()
            .flat_map(|c| {
                [Orientation::Horizontal, Orientation::Vertical]
                    .into_iter()
                    .map(move |o| (c, o))
            })
            .filter(|&(c, o)| self.can_place(length, c.x, c.y, o.is_vertical()))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[rng.random_range(0..candidates.len())])
    }

    /// Place every ship of `fleet` at random valid positions. On failure
    /// the grid is left untouched.
    pub fn place_fleet_randomly<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        fleet: &[ShipType],
    ) -> Result<(), GridError> {
        let mut scratch = self.clone();
        for def in fleet {
            let (origin, orient) = scratch
                .random_placement(rng, def.length())
                .ok_or(GridError::InvalidPlacement)?;
            scratch.place_ship(Ship::new(*def, origin, orient))?;
        }
        *self = scratch;
        Ok(())
    }
}

/// Unchecked wire form of a `Grid`.
#[cfg(feature = "std")]
#[derive(serde::Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    ships: Vec<Ship>,
}

#[cfg(feature = "std")]
impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let RawGrid {
            width,
            height,
            cells,
            ships,
        } = raw;
        if width > MAX_GRID_SIZE || height > MAX_GRID_SIZE || cells.len() != width * height {
            return Err(GridError::InconsistentLayout);
        }
        let grid = Grid {
            width,
            height,
            cells,
            ships,
        };
        let longest = width.max(height);
        for ship in &grid.ships {
            if ship.length() == 0
                || ship.length() > longest
                || ship.hit_count() > ship.length()
                || footprint(ship.origin(), ship.length(), ship.orientation())
                    .any(|c| !c.is_some_and(|c| grid.in_bounds(c)))
            {
                return Err(GridError::InconsistentLayout);
            }
        }
        for at in grid.coords() {
            if let Some(Cell::Occupied(id)) = grid.cell(at) {
                if !grid.ships.get(id).is_some_and(|s| s.contains(at)) {
                    return Err(GridError::InconsistentLayout);
                }
            }
        }
        Ok(grid)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{} {{", self.width, self.height)?;
        for y in 0..self.height {
            f.write_str("  ")?;
            for x in 0..self.width {
                let ch = match self.cells[y * self.width + x] {
                    Cell::Empty => '.',
                    Cell::Occupied(_) => 'S',
                    Cell::Hit => 'X',
                    Cell::Miss => 'o',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  ships: {:?}", self.ships)?;
        write!(f, "}}")
    }
}
