//! Persisted game snapshot
//!
//! Every struct in the snapshot is `#[serde(default)]`, so a snapshot
//! written before a field existed still loads with that field defaulted.

use serde::{Deserialize, Serialize};

use crate::aperture::ApertureState;
use crate::core::error::LoadError;
use crate::core::types::Tick;
use crate::factions::Faction;
use crate::player::PlayerState;
use crate::quests::Quest;
use crate::world::WorldState;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTime {
    pub tick: Tick,
    pub day: u64,
}

impl Default for GameTime {
    fn default() -> Self {
        Self { tick: 0, day: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub version: u32,
    pub seed: u64,
    pub time: GameTime,
    pub player: PlayerState,
    pub world: WorldState,
    pub aperture: ApertureState,
    pub factions: Vec<Faction>,
    pub quests: Vec<Quest>,
    pub next_quest_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            seed: 0,
            time: GameTime::default(),
            player: PlayerState::default(),
            world: WorldState::default(),
            aperture: ApertureState::default(),
            factions: Vec::new(),
            quests: Vec::new(),
            next_quest_id: 1,
        }
    }
}

impl GameState {
    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a snapshot, filling any missing field with its default
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let mut state: GameState = serde_json::from_str(json)?;
        state.version = SNAPSHOT_VERSION;
        Ok(state)
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), LoadError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &std::path::Path) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
