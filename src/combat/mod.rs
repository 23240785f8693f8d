//! Combat against world enemies, its spoils and its price

pub mod death;
pub mod loot;
pub mod resolver;

pub use death::{handle_death, DeathReport};
pub use loot::roll_loot;
pub use resolver::{resolve_combat, CombatEvent, CombatOutcome, CombatReport};
