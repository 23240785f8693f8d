//! World generation
//!
//! One-shot: biomes come from a noise field sampled at a tenth of the cell
//! coordinates, then each cell except the player's start rolls its content.

use tracing::debug;

use crate::core::rng::Mulberry32;
use crate::core::types::GridPos;
use crate::factions::Faction;
use crate::world::grid::{Biome, Cell, CellContent, Grid};
use crate::world::noise::GradientNoise;

/// Noise is sampled at (x / NOISE_SCALE, y / NOISE_SCALE)
const NOISE_SCALE: f64 = 10.0;

/// Keeps the content stream independent of the noise permutation stream
const CONTENT_STREAM_SALT: u32 = 0x5bd1_e995;

/// Cumulative upper bounds of each content band
const ENEMY_BAND: f64 = 0.20;
const RESOURCE_BAND: f64 = 0.38;
const RUIN_BAND: f64 = 0.46;
const SPECIAL_BAND: f64 = 0.50;

/// Map a uniform roll in [0, 1) onto a content type
pub fn content_for_roll(roll: f64) -> CellContent {
    if roll < ENEMY_BAND {
        CellContent::Enemy
    } else if roll < RESOURCE_BAND {
        CellContent::Resource
    } else if roll < RUIN_BAND {
        CellContent::Ruin
    } else if roll < SPECIAL_BAND {
        CellContent::Special
    } else {
        CellContent::Empty
    }
}

/// Generate a `width` x `height` world, row-major
///
/// The player's start cell is always empty. Same arguments, same grid.
pub fn generate_world(width: u32, height: u32, seed: u32, player_start: Option<GridPos>) -> Grid {
    let noise = GradientNoise::new(seed);
    let mut content_rng = Mulberry32::new(seed ^ CONTENT_STREAM_SALT);

    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let sample = noise.sample(x as f64 / NOISE_SCALE, y as f64 / NOISE_SCALE);
            let biome = Biome::from_noise(sample);

            let content = if player_start == Some(GridPos::new(x, y)) {
                CellContent::Empty
            } else {
                content_for_roll(content_rng.next_unit())
            };

            cells.push(Cell::new(biome, content));
        }
    }

    let grid = Grid { width, height, cells };
    debug!(
        width,
        height,
        seed,
        enemies = grid.count_content(CellContent::Enemy),
        resources = grid.count_content(CellContent::Resource),
        ruins = grid.count_content(CellContent::Ruin),
        specials = grid.count_content(CellContent::Special),
        "world generated"
    );
    grid
}

/// Mark each faction's home cell. Factions outside the grid are ignored.
pub fn place_factions(grid: &mut Grid, factions: &[Faction]) {
    for faction in factions {
        if let Some(cell) = grid.get_mut(faction.position) {
            cell.content = CellContent::Faction(faction.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_bands() {
        assert_eq!(content_for_roll(0.0), CellContent::Enemy);
        assert_eq!(content_for_roll(0.199), CellContent::Enemy);
        assert_eq!(content_for_roll(0.20), CellContent::Resource);
        assert_eq!(content_for_roll(0.379), CellContent::Resource);
        assert_eq!(content_for_roll(0.38), CellContent::Ruin);
        assert_eq!(content_for_roll(0.46), CellContent::Special);
        assert_eq!(content_for_roll(0.50), CellContent::Empty);
        assert_eq!(content_for_roll(0.99), CellContent::Empty);
    }

    #[test]
    fn test_dimensions() {
        let grid = generate_world(30, 20, 9, None);
        assert_eq!(grid.cells.len(), 600);
        assert_eq!(grid.width, 30);
        assert_eq!(grid.height, 20);
    }

    #[test]
    fn test_start_cell_forced_empty() {
        let start = GridPos::new(15, 10);
        for seed in 0..200 {
            let grid = generate_world(30, 20, seed, Some(start));
            assert_eq!(grid.get(start).unwrap().content, CellContent::Empty);
        }
    }

    #[test]
    fn test_content_roughly_matches_bands() {
        let grid = generate_world(100, 100, 31337, None);
        let enemies = grid.count_content(CellContent::Enemy) as f64 / 10_000.0;
        let empty = grid.count_content(CellContent::Empty) as f64 / 10_000.0;
        assert!((enemies - 0.20).abs() < 0.03, "enemy share {}", enemies);
        assert!((empty - 0.50).abs() < 0.03, "empty share {}", empty);
    }

    #[test]
    fn test_place_factions() {
        let mut grid = generate_world(10, 10, 1, None);
        let factions = vec![Faction::new(crate::core::types::FactionId(7), "Test", 50, GridPos::new(2, 3))];
        place_factions(&mut grid, &factions);
        assert_eq!(
            grid.get(GridPos::new(2, 3)).unwrap().content,
            CellContent::Faction(crate::core::types::FactionId(7))
        );
    }
}
