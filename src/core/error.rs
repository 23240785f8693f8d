use thiserror::Error;

use crate::core::types::{FloraId, ResourceKind, RuneId};
use crate::crafting::RuneSlot;

/// Expected game conditions reported back to the caller.
///
/// None of these mutate state: an operation that returns one of them has
/// left everything exactly as it found it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    #[error("Ability selection is missing its {missing:?} rune")]
    IncompleteSelection { missing: RuneSlot },

    #[error("Insufficient {resource}: need {required}, have {available}")]
    InsufficientResource {
        resource: ResourceKind,
        required: i64,
        available: i64,
    },

    #[error("Invalid position ({x}, {y})")]
    InvalidPosition { x: u32, y: u32 },

    #[error("Plant at ({x}, {y}) is not ready for harvest")]
    NotMature { x: u32, y: u32 },

    #[error("No plant at ({x}, {y})")]
    NoPlant { x: u32, y: u32 },

    #[error("No fissure at ({x}, {y})")]
    NoFissure { x: u32, y: u32 },

    #[error("Rune not unlocked: {0}")]
    RuneLocked(RuneId),

    #[error("Unknown rune: {0}")]
    UnknownRune(RuneId),

    #[error("Unknown flora species: {0}")]
    UnknownFlora(FloraId),

    #[error("Aperture has not been unlocked")]
    ApertureLocked,
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Failures while loading configuration, catalogs or snapshots
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}
