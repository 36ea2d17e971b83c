//! Hunt/target opponent: random probing until a hit, then work the
//! neighbours of that hit until something sinks.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use rand::Rng;

use crate::common::{Coord, Outcome};
use crate::config::MAX_GRID_SIZE;
use crate::grid::Grid;

/// Current strategy of the targeting AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum AiMode {
    /// Fire at random unresolved cells.
    Hunt,
    /// Probe the queued neighbours of recent hits.
    Target,
}

/// Snapshot of the AI's targeting state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct AiState {
    pub mode: AiMode,
    pub pending: Vec<Coord>,
}

/// Chooses shots against a grid of fixed dimensions.
#[derive(Debug, Clone)]
pub struct TargetingAi {
    width: usize,
    height: usize,
    mode: AiMode,
    pending: VecDeque<Coord>,
    // Hunt candidates; shrinks on every hunt pick
    untried: Vec<Coord>,
}

impl TargetingAi {
    /// Fresh AI in hunt mode for a `width` x `height` target grid.
    ///
    /// # Panics
    ///
    /// If either dimension exceeds `MAX_GRID_SIZE`.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(
            width <= MAX_GRID_SIZE && height <= MAX_GRID_SIZE,
            "target grid exceeds MAX_GRID_SIZE"
        );
        let untried = (0..height)
            .flat_map(|y| (0..width).map(move |x| Coord::new(x, y)))
            .collect();
        Self {
            width,
            height,
            mode: AiMode::Hunt,
            pending: VecDeque::new(),
            untried,
        }
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    /// Queued probe coordinates, front first.
    pub fn pending(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pending.iter().copied()
    }

    pub fn state(&self) -> AiState {
        AiState {
            mode: self.mode,
            pending: self.pending.iter().copied().collect(),
        }
    }

    /// Pick the next coordinate to fire at on `target`. Returns `None`,
    /// leaving the AI untouched, only when every cell is already resolved.
    pub fn next_target<R: Rng + ?Sized>(&mut self, rng: &mut R, target: &Grid) -> Option<Coord> {
        if target.coords().all(|c| target.is_resolved(c)) {
            return None;
        }
        while let Some(at) = self.pending.pop_front() {
            if !target.is_resolved(at) {
                log::debug!("ai targeting queued {}", at);
                return Some(at);
            }
        }
        self.mode = AiMode::Hunt;
        self.hunt(rng, target)
    }

    fn hunt<R: Rng + ?Sized>(&mut self, rng: &mut R, target: &Grid) -> Option<Coord> {
        while !self.untried.is_empty() {
            let at = self.untried.swap_remove(rng.random_range(0..self.untried.len()));
            if !target.is_resolved(at) {
                log::debug!("ai hunting at {}", at);
                return Some(at);
            }
        }
        None
    }

    /// Feed back the outcome of the AI's own shot at `at`.
    ///
    /// A sink clears the whole queue, including probes left over from hits
    /// on other ships.
    pub fn record_outcome(&mut self, at: Coord, outcome: &Outcome) {
        match outcome {
            Outcome::Hit => {
                self.mode = AiMode::Target;
                let (width, height) = (self.width, self.height);
                self.pending.extend(
                    at.neighbours()
                        .filter(|c| c.x < width && c.y < height),
                );
            }
            Outcome::Sunk(_) => {
                self.mode = AiMode::Hunt;
                self.pending.clear();
            }
            Outcome::Miss => {}
        }
    }
}
