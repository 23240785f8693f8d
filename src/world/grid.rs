//! Rectangular cell grid shared by the outer world and the aperture

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::{DaoElement, FactionId, GridPos};

/// Terrain classification of a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    Ocean,
    Desert,
    #[default]
    Forest,
    Mountain,
    Volcanic,
}

impl Biome {
    pub const ALL: [Biome; 5] = [
        Biome::Ocean,
        Biome::Desert,
        Biome::Forest,
        Biome::Mountain,
        Biome::Volcanic,
    ];

    /// Classify a noise sample. Thresholds are ascending and half-open,
    /// so every value maps to exactly one biome.
    pub fn from_noise(value: f64) -> Self {
        if value < -0.2 {
            Biome::Ocean
        } else if value < 0.0 {
            Biome::Desert
        } else if value < 0.2 {
            Biome::Forest
        } else if value < 0.5 {
            Biome::Mountain
        } else {
            Biome::Volcanic
        }
    }

    /// Biome a cell drifts toward when dominated by an element's marks
    pub fn for_element(element: DaoElement) -> Self {
        match element {
            DaoElement::Fire => Biome::Volcanic,
            DaoElement::Ice | DaoElement::Water => Biome::Mountain,
            DaoElement::Life => Biome::Forest,
            DaoElement::Earth => Biome::Desert,
        }
    }
}

/// What occupies a cell; exactly one at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellContent {
    #[default]
    Empty,
    Enemy,
    Resource,
    Ruin,
    Special,
    Faction(FactionId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cell {
    pub biome: Biome,
    pub content: CellContent,
    /// Accumulated elemental marks from terraforming
    pub terraform_marks: BTreeMap<DaoElement, u32>,
    pub fissure: bool,
}

impl Cell {
    pub fn new(biome: Biome, content: CellContent) -> Self {
        Self {
            biome,
            content,
            ..Default::default()
        }
    }

    /// Element with the most marks; ties go to the earlier element
    pub fn dominant_mark(&self) -> Option<DaoElement> {
        self.terraform_marks
            .iter()
            .filter(|(_, amount)| **amount > 0)
            .fold(None, |best: Option<(DaoElement, u32)>, (element, amount)| match best {
                Some((_, best_amount)) if best_amount >= *amount => best,
                _ => Some((*element, *amount)),
            })
            .map(|(element, _)| element)
    }
}

/// Row-major grid of cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// A grid filled with default cells
    pub fn filled(width: u32, height: u32, cell: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; (width as usize) * (height as usize)],
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    pub fn pos_of(&self, index: usize) -> GridPos {
        let width = self.width.max(1) as usize;
        GridPos::new((index % width) as u32, (index / width) as u32)
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        self.index_of(pos).and_then(|i| self.cells.get(i))
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        self.index_of(pos).and_then(move |i| self.cells.get_mut(i))
    }

    /// Iterate cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| (self.pos_of(i), c))
    }

    /// Count cells holding a given content type
    pub fn count_content(&self, content: CellContent) -> usize {
        self.cells.iter().filter(|c| c.content == content).count()
    }
}
