//! Rival cultivation factions of the outer world

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::types::{FactionId, GridPos};

/// Power never drifts below this
pub const MIN_FACTION_POWER: i32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionGoal {
    #[default]
    Dominance,
    Wealth,
    Knowledge,
}

/// How a faction regards the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    MortalEnemy,
    Hostile,
    Neutral,
    Friendly,
    Allied,
}

impl Standing {
    pub fn from_relation(relation: i32) -> Self {
        match relation {
            r if r < -50 => Standing::MortalEnemy,
            r if r < 0 => Standing::Hostile,
            r if r < 30 => Standing::Neutral,
            r if r < 70 => Standing::Friendly,
            _ => Standing::Allied,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub power: i32,
    pub position: GridPos,
    #[serde(default)]
    pub goal: FactionGoal,
    #[serde(default)]
    pub relation: i32,
}

impl Faction {
    pub fn new(id: FactionId, name: &str, power: i32, position: GridPos) -> Self {
        Self {
            id,
            name: name.to_string(),
            power,
            position,
            goal: FactionGoal::default(),
            relation: 0,
        }
    }

    pub fn standing(&self) -> Standing {
        Standing::from_relation(self.relation)
    }
}

/// The three factions of a new game
pub fn default_factions() -> Vec<Faction> {
    vec![
        Faction {
            goal: FactionGoal::Dominance,
            ..Faction::new(FactionId(1), "Iron Mountain Clan", 100, GridPos::new(5, 5))
        },
        Faction {
            goal: FactionGoal::Wealth,
            ..Faction::new(FactionId(2), "Hidden Mist Sect", 80, GridPos::new(25, 15))
        },
        Faction {
            goal: FactionGoal::Knowledge,
            relation: 20,
            ..Faction::new(FactionId(3), "Order of Eternal Life", 120, GridPos::new(10, 18))
        },
    ]
}

/// Each faction independently rolls `chance` to shift its power by -2..=2
pub fn drift_factions<R: Rng>(factions: &mut [Faction], chance: f64, rng: &mut R) {
    for faction in factions.iter_mut() {
        if rng.gen_bool(chance) {
            let delta = rng.gen_range(-2..=2);
            faction.power = (faction.power + delta).max(MIN_FACTION_POWER);
            debug!(faction = %faction.name, power = faction.power, "faction power drifted");
        }
    }
}
