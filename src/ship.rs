//! Ship definitions and placed ships.

use alloc::string::{String, ToString};
use core::fmt;

use crate::common::Coord;

/// Orientation of a ship on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extends along +x from its origin.
    Horizontal,
    /// Extends along +y from its origin.
    Vertical,
}

impl Orientation {
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        }
    }

    pub fn is_vertical(self) -> bool {
        self == Orientation::Vertical
    }
}

/// Type of ship: name and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipType {
    name: &'static str,
    length: usize,
}

impl ShipType {
    /// Create a new ship type.
    pub const fn new(name: &'static str, length: usize) -> Self {
        Self { name, length }
    }

    /// Ship's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ship's length.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// Cells covered by a ship of `length` at `origin`. Returns `None` if the
/// footprint would overflow `usize`.
pub fn footprint(
    origin: Coord,
    length: usize,
    orientation: Orientation,
) -> impl Iterator<Item = Option<Coord>> {
    (0..length).map(move |i| match orientation {
        Orientation::Horizontal => origin.x.checked_add(i).map(|x| Coord::new(x, origin.y)),
        Orientation::Vertical => origin.y.checked_add(i).map(|y| Coord::new(origin.x, y)),
    })
}

/// A ship placed on a grid, tracking how many of its segments were hit.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Ship {
    name: String,
    length: usize,
    origin: Coord,
    orientation: Orientation,
    hit_count: usize,
}

impl Ship {
    /// Build an undamaged ship from its type. Bounds and overlap are the
    /// grid's concern.
    pub fn new(ship_type: ShipType, origin: Coord, orientation: Orientation) -> Self {
        Self {
            name: ship_type.name().to_string(),
            length: ship_type.length(),
            origin,
            orientation,
            hit_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn hit_count(&self) -> usize {
        self.hit_count
    }

    /// Check if the ship is sunk (all segments hit).
    pub fn is_sunk(&self) -> bool {
        self.hit_count == self.length
    }

    /// Cells occupied by this ship, origin first.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        footprint(self.origin, self.length, self.orientation).flatten()
    }

    pub fn contains(&self, at: Coord) -> bool {
        self.cells().any(|c| c == at)
    }

    /// Count one more hit. Saturates at the ship's length.
    pub(crate) fn register_hit(&mut self) {
        if self.hit_count < self.length {
            self.hit_count += 1;
        }
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ name: \"{}\", origin: {}, orientation: {:?}, hits: {}/{} }}",
            self.name, self.origin, self.orientation, self.hit_count, self.length,
        )
    }
}
