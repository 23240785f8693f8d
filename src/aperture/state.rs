//! Aperture state - the player's personal micro-world

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::config::ApertureConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{DaoElement, FaunaId, FloraId, GridPos};
use crate::data::Catalog;
use crate::player::PlayerState;
use crate::world::grid::{Biome, Cell, Grid};

/// Stability is kept within [0, MAX_STABILITY]
pub const MAX_STABILITY: f32 = 100.0;

/// A planted spirit herb
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloraInstance {
    pub species: FloraId,
    pub position: GridPos,
    /// Never decreases; capped at the species' growth time
    pub growth_progress: f32,
}

/// A living creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaunaInstance {
    pub species: FaunaId,
    pub position: GridPos,
    pub reproduction_progress: f32,
    pub health: u32,
}

/// A fresh aperture grid: every cell spiritual forest, no marks, no fissures
pub fn init_grid(size: u32) -> Grid {
    Grid::filled(size, size, Cell::new(Biome::Forest, Default::default()))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApertureState {
    pub unlocked: bool,
    /// Health of the realm, 0-100
    pub stability: f32,
    /// Currency spent to seal fissures
    pub soul_foundation: u32,
    /// Multiplier on every growth and reproduction delta
    pub time_rate: f32,
    pub flora: Vec<FloraInstance>,
    pub fauna: Vec<FaunaInstance>,
    grid: Grid,
    /// Mirrors the `fissure` flags on the grid, one entry per flagged cell
    fissures: Vec<GridPos>,
}

impl Default for ApertureState {
    fn default() -> Self {
        Self::new(&ApertureConfig::default())
    }
}

impl ApertureState {
    pub fn new(config: &ApertureConfig) -> Self {
        Self {
            unlocked: false,
            stability: config.initial_stability.clamp(0.0, MAX_STABILITY),
            soul_foundation: config.initial_soul_foundation,
            time_rate: config.initial_time_rate,
            flora: Vec::new(),
            fauna: Vec::new(),
            grid: init_grid(config.size),
            fissures: Vec::new(),
        }
    }

    /// The herbs and creatures every new aperture starts with
    pub fn seed_starting_life(&mut self, catalog: &Catalog) {
        let flora = [
            (FloraId::new("f1"), GridPos::new(3, 4), 8.0),
            (FloraId::new("f2"), GridPos::new(7, 2), 15.0),
        ];
        for (species, position, growth_progress) in flora {
            if self.grid.contains(position) {
                self.flora.push(FloraInstance { species, position, growth_progress });
            }
        }

        let rabbit = GridPos::new(5, 8);
        if let Some(species) = catalog.fauna_species(&FaunaId::new("fa1")) {
            if self.grid.contains(rabbit) {
                self.fauna.push(FaunaInstance {
                    species: species.id.clone(),
                    position: rabbit,
                    reproduction_progress: 12.0,
                    health: species.base_health,
                });
            }
        }
    }

    /// Side length, always taken from the grid itself
    pub fn size(&self) -> u32 {
        self.grid.width
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Whether `pos` lies inside the aperture
    pub fn contains(&self, pos: GridPos) -> bool {
        self.grid.contains(pos)
    }

    pub fn fissures(&self) -> &[GridPos] {
        &self.fissures
    }

    /// floor(size² × ratio)
    pub fn population_cap(&self, ratio: f64) -> usize {
        (self.grid.area() as f64 * ratio).floor() as usize
    }

    pub fn adjust_stability(&mut self, delta: f32) {
        self.stability = (self.stability + delta).clamp(0.0, MAX_STABILITY);
    }

    /// Flag a cell as fissured. Returns false if out of bounds or already fissured.
    pub fn open_fissure(&mut self, pos: GridPos) -> bool {
        match self.grid.get_mut(pos) {
            Some(cell) if !cell.fissure => {
                cell.fissure = true;
                self.fissures.push(pos);
                debug!(%pos, "fissure opened");
                true
            }
            _ => false,
        }
    }

    /// Clear a fissure. Returns false if there was none.
    pub fn close_fissure(&mut self, pos: GridPos) -> bool {
        match self.grid.get_mut(pos) {
            Some(cell) if cell.fissure => {
                cell.fissure = false;
                self.fissures.retain(|f| *f != pos);
                true
            }
            _ => false,
        }
    }

    /// Cells that could still open a fissure
    pub fn unfissured_cells(&self) -> Vec<GridPos> {
        self.grid
            .iter()
            .filter(|(_, cell)| !cell.fissure)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Every flagged cell has exactly one list entry and vice versa
    pub fn fissures_consistent(&self) -> bool {
        let mut flagged: Vec<GridPos> = self
            .grid
            .iter()
            .filter(|(_, cell)| cell.fissure)
            .map(|(pos, _)| pos)
            .collect();
        flagged.sort();
        let mut listed = self.fissures.clone();
        listed.sort();
        let before = listed.len();
        listed.dedup();
        before == listed.len() && listed == flagged
    }

    pub fn plant_at(&self, pos: GridPos) -> Option<&FloraInstance> {
        self.flora.iter().find(|p| p.position == pos)
    }

    /// Plant a new herb at `pos`
    pub fn plant(&mut self, catalog: &Catalog, species: &FloraId, pos: GridPos) -> Result<()> {
        if !self.grid.contains(pos) || self.plant_at(pos).is_some() {
            return Err(GameError::InvalidPosition { x: pos.x, y: pos.y });
        }
        if catalog.flora_species(species).is_none() {
            return Err(GameError::UnknownFlora(species.clone()));
        }

        self.flora.push(FloraInstance {
            species: species.clone(),
            position: pos,
            growth_progress: 0.0,
        });
        debug!(%species, %pos, "planted");
        Ok(())
    }

    /// Pour the player's dao marks into a cell; the cell's biome follows
    /// its dominant element
    pub fn terraform(
        &mut self,
        player: &mut PlayerState,
        pos: GridPos,
        element: DaoElement,
        amount: u32,
    ) -> Result<()> {
        if !self.grid.contains(pos) {
            return Err(GameError::InvalidPosition { x: pos.x, y: pos.y });
        }
        player.spend_dao_marks(element, amount)?;

        if let Some(cell) = self.grid.get_mut(pos) {
            *cell.terraform_marks.entry(element).or_insert(0) += amount;
            if let Some(dominant) = cell.dominant_mark() {
                cell.biome = Biome::for_element(dominant);
            }
        }
        Ok(())
    }
}
