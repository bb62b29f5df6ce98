//! Random placement of food, SuperFood and obstacles
//!
//! Placement never fails: after a bounded number of attempts it logs a warning
//! and returns the last candidate even if it overlaps an occupied cell.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::component::{Footprint, Position};
use crate::consts::DEFAULT_PLACEMENT_ATTEMPTS;

/// Source of free cells for spawning
pub trait CellPicker {
    /// Pick a top-left anchor so the `size`×`size` square fits on the board
    /// and, if possible, overlaps none of `occupied`.
    fn pick(&mut self, board_size: i32, size: i32, occupied: &HashSet<Position>) -> Position;
}

/// Seeded uniform placement with bounded retries
#[derive(Debug, Clone)]
pub struct RandomPlacer {
    rng: Pcg32,
    max_attempts: u32,
}

impl RandomPlacer {
    pub fn new(seed: u64) -> Self {
        Self::with_attempts(seed, DEFAULT_PLACEMENT_ATTEMPTS)
    }

    pub fn with_attempts(seed: u64, max_attempts: u32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            max_attempts: max_attempts.max(1),
        }
    }
}

impl CellPicker for RandomPlacer {
    fn pick(&mut self, board_size: i32, size: i32, occupied: &HashSet<Position>) -> Position {
        let footprint = Footprint::new(size);
        // Anchors whose square stays on the board
        let span = (board_size - footprint.size + 1).max(1);

        let mut candidate = Position::new(0, 0);
        for _ in 0..self.max_attempts {
            candidate = Position::new(self.rng.random_range(0..span), self.rng.random_range(0..span));
            let blocked = footprint
                .cells(candidate)
                .iter()
                .any(|cell| occupied.contains(cell));
            if !blocked {
                return candidate;
            }
        }

        log::warn!(
            "No free {}x{} spot after {} attempts, placing at ({}, {}) anyway",
            footprint.size,
            footprint.size,
            self.max_attempts,
            candidate.x,
            candidate.y
        );
        candidate
    }
}
