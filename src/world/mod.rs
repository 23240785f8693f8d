//! The outer world: generated terrain, cell contents and what lies on them

pub mod generation;
pub mod grid;
pub mod interaction;
pub mod noise;

use serde::{Deserialize, Serialize};

use crate::core::types::GridPos;

pub use generation::{content_for_roll, generate_world, place_factions};
pub use grid::{Biome, Cell, CellContent, Grid};
pub use interaction::{step_onto, Encounter};
pub use noise::GradientNoise;

/// Experience left behind where the player fell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoulRemnant {
    pub position: GridPos,
    pub exp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    pub seed: u32,
    pub grid: Grid,
    pub soul_remnants: Vec<SoulRemnant>,
}

impl WorldState {
    pub fn generate(width: u32, height: u32, seed: u32, player_start: GridPos) -> Self {
        Self {
            seed,
            grid: generate_world(width, height, seed, Some(player_start)),
            soul_remnants: Vec::new(),
        }
    }

    /// Remove and return the remnant at `pos`
    pub fn take_remnant(&mut self, pos: GridPos) -> Option<SoulRemnant> {
        let index = self.soul_remnants.iter().position(|r| r.position == pos)?;
        Some(self.soul_remnants.remove(index))
    }

    /// Empty a cell once its content has been used up
    pub fn clear_cell(&mut self, pos: GridPos) {
        if let Some(cell) = self.grid.get_mut(pos) {
            cell.content = CellContent::Empty;
        }
    }
}
