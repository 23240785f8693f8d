//! Apotheosis - cultivation world simulation core
//!
//! Procedural world generation, the player's aperture micro-world and its
//! ecology, rune-based ability crafting and turn-based combat.

pub mod advisor;
pub mod aperture;
pub mod combat;
pub mod core;
pub mod crafting;
pub mod data;
pub mod factions;
pub mod player;
pub mod quests;
pub mod simulation;
pub mod world;
