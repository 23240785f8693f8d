//! Simulation configuration with documented constants
//!
//! All magic numbers are collected here with explanations of their purpose
//! and how they interact with each other. The config is owned by the
//! simulation context and passed down by reference; there is no global copy.

use serde::{Deserialize, Serialize};

use crate::core::error::LoadError;
use crate::core::types::GridPos;

/// Configuration for the simulation systems
///
/// These values have been tuned to produce the intended pacing. Every
/// section deserializes with defaults, so a TOML file only needs the keys
/// it wants to override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub world: WorldConfig,
    pub aperture: ApertureConfig,
    pub combat: CombatConfig,
    pub death: DeathConfig,
    pub time: TimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    /// Cell the player starts on; always generated empty
    pub player_start: GridPos,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApertureConfig {
    /// Side length of the aperture grid
    pub size: u32,
    pub initial_stability: f32,
    pub initial_soul_foundation: u32,
    pub initial_time_rate: f32,

    // === FISSURES ===
    /// Below this stability, each tick rolls for a new fissure
    pub fissure_stability_threshold: f32,

    /// Chance per tick (while unstable) that a fissure opens
    ///
    /// Observed behaviour ranged between 8% and 20%; 10% keeps a neglected
    /// aperture deteriorating without overwhelming a tended one.
    pub fissure_chance: f64,

    /// Soul foundation spent to seal one fissure
    pub seal_cost: u32,

    /// Stability regained when a fissure is sealed
    pub seal_stability_gain: f32,

    // === ECOLOGY ===
    /// Stability gained for every successful fauna birth
    pub reproduction_stability_bonus: f32,

    /// Fauna cap as a fraction of grid area (floor(size² × ratio))
    pub population_cap_ratio: f64,

    /// Chance per tick of a random aperture event
    pub event_chance: f64,

    /// How an event picks between its choices
    pub event_choice_policy: EventChoicePolicy,
}

/// Strategy for resolving a random aperture event's choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventChoicePolicy {
    /// Pick by weight among all choices; skip the event if the pick is unaffordable
    Weighted,
    /// Pick by weight among the affordable choices; skip if none are affordable
    Affordable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Turns before a combat is declared a draw
    pub turn_cap: u32,

    /// Random bonus added to enemy power on each counter-attack (exclusive upper bound)
    pub enemy_counter_bonus_max: i32,

    /// Basic attack damage range (inclusive)
    pub basic_damage_min: i32,
    pub basic_damage_max: i32,

    /// Basic attack qi cost range (inclusive)
    pub basic_cost_min: i32,
    pub basic_cost_max: i32,

    /// Qi lost to a catastrophic ability failure
    pub catastrophic_backlash: i32,

    /// Experience granted per point of enemy power on victory
    pub exp_per_enemy_power: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathConfig {
    /// Fraction of max qi restored after a defeat
    pub restore_fraction: f32,

    /// Fraction of current experience lost on a repeated death
    pub exp_loss_fraction: f64,

    /// Consecutive deaths at which the soul becomes wounded
    pub soul_wound_threshold: u32,

    /// Chance that a defeat tears a fissure in the aperture
    pub trauma_fissure_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub ticks_per_day: u64,

    /// Chance per tick that a faction's power drifts
    pub faction_drift_chance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            aperture: ApertureConfig::default(),
            combat: CombatConfig::default(),
            death: DeathConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
            player_start: GridPos::new(15, 10),
        }
    }
}

impl Default for ApertureConfig {
    fn default() -> Self {
        Self {
            size: 15,
            initial_stability: 100.0,
            initial_soul_foundation: 1000,
            initial_time_rate: 1.0,

            fissure_stability_threshold: 80.0,
            fissure_chance: 0.10,
            seal_cost: 50,
            seal_stability_gain: 5.0,

            reproduction_stability_bonus: 0.5,
            population_cap_ratio: 0.3,
            event_chance: 0.10,
            event_choice_policy: EventChoicePolicy::Affordable,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            turn_cap: 10,
            enemy_counter_bonus_max: 15,
            basic_damage_min: 10,
            basic_damage_max: 20,
            basic_cost_min: 2,
            basic_cost_max: 5,
            catastrophic_backlash: 5,
            exp_per_enemy_power: 10,
        }
    }
}

impl Default for DeathConfig {
    fn default() -> Self {
        Self {
            restore_fraction: 0.5,
            exp_loss_fraction: 0.05,
            soul_wound_threshold: 2,
            trauma_fissure_chance: 0.30,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: 24,
            faction_drift_chance: 0.05,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, filling unspecified keys with defaults
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate().map_err(LoadError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err("world dimensions must be non-zero".into());
        }

        let start = self.world.player_start;
        if start.x >= self.world.width || start.y >= self.world.height {
            return Err(format!(
                "player_start {} lies outside the {}x{} world",
                start, self.world.width, self.world.height
            ));
        }

        if self.aperture.size == 0 {
            return Err("aperture size must be non-zero".into());
        }

        let probabilities = [
            ("fissure_chance", self.aperture.fissure_chance),
            ("event_chance", self.aperture.event_chance),
            ("population_cap_ratio", self.aperture.population_cap_ratio),
            ("exp_loss_fraction", self.death.exp_loss_fraction),
            ("trauma_fissure_chance", self.death.trauma_fissure_chance),
            ("faction_drift_chance", self.time.faction_drift_chance),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} ({}) must lie in [0, 1]", name, value));
            }
        }

        if self.aperture.initial_time_rate <= 0.0 {
            return Err("initial_time_rate must be positive".into());
        }

        if self.combat.turn_cap == 0 {
            return Err("turn_cap must be at least 1".into());
        }

        if self.combat.basic_damage_min > self.combat.basic_damage_max
            || self.combat.basic_cost_min > self.combat.basic_cost_max
        {
            return Err("basic attack ranges must have min <= max".into());
        }

        if self.combat.enemy_counter_bonus_max < 0 {
            return Err("enemy_counter_bonus_max must not be negative".into());
        }

        if self.time.ticks_per_day == 0 {
            return Err("ticks_per_day must be at least 1".into());
        }

        Ok(())
    }
}
