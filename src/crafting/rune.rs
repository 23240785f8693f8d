//! Rune components - immutable catalog data combined into abilities

use serde::{Deserialize, Serialize};

use crate::core::types::RuneId;

/// Descriptive tags carried by runes and concatenated into abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuneTag {
    Force,
    Fire,
    Projectile,
    Water,
    Cold,
    Life,
    Light,
    Aoe,
    MultiTarget,
    Blood,
    Distance,
    Personal,
    Channeled,
}

impl RuneTag {
    /// Tags that destabilise a composed ability
    pub fn is_unstable(self) -> bool {
        matches!(
            self,
            RuneTag::Aoe | RuneTag::MultiTarget | RuneTag::Blood | RuneTag::Channeled
        )
    }
}

/// The three slots an ability is composed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuneSlot {
    Base,
    Modifier,
    Vector,
}

/// Base rune: supplies raw power and cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRune {
    pub id: RuneId,
    pub name: String,
    pub power: i32,
    pub cost: u32,
    #[serde(default)]
    pub tags: Vec<RuneTag>,
}

/// Modifier rune: scales power and cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierRune {
    pub id: RuneId,
    pub name: String,
    pub power_multiplier: f64,
    pub cost_multiplier: f64,
    #[serde(default)]
    pub tags: Vec<RuneTag>,
}

/// Vector rune: how the ability is delivered; scales cost only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRune {
    pub id: RuneId,
    pub name: String,
    pub cost_multiplier: f64,
    #[serde(default)]
    pub tags: Vec<RuneTag>,
}
