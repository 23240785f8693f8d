//! Ability composition
//!
//! An ability is derived from exactly one base, one modifier and one vector
//! rune. Composition is pure: the same three runes always produce the same
//! ability, down to its stability.

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{AbilityId, RuneId};
use crate::crafting::rune::{BaseRune, ModifierRune, RuneSlot, RuneTag, VectorRune};
use crate::data::Catalog;

/// Stability lost for each unstable tag occurrence
pub const UNSTABLE_TAG_PENALTY: u32 = 10;

/// Stability never drops below this floor
pub const MIN_STABILITY: u32 = 10;

/// A crafted ability, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Assigned when the ability joins a player's collection
    #[serde(default)]
    pub id: AbilityId,
    pub name: String,
    pub base: RuneId,
    pub modifier: RuneId,
    pub vector: RuneId,
    pub power: i32,
    pub cost: u32,
    pub tags: Vec<RuneTag>,
    /// Percent chance (10-100) the ability fires without backlash
    pub stability: u32,
}

impl Ability {
    /// Healing abilities carry negative power
    pub fn is_restorative(&self) -> bool {
        self.power < 0
    }
}

/// Rounds half-way values upward, matching the game's balance tables
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Stability from a combined tag list.
///
/// Tags are concatenated, not deduplicated, so a tag contributed by two
/// runes is penalised twice.
pub fn calculate_stability(tags: &[RuneTag]) -> u32 {
    let penalty: u32 = tags
        .iter()
        .filter(|t| t.is_unstable())
        .map(|_| UNSTABLE_TAG_PENALTY)
        .sum();
    100u32.saturating_sub(penalty).max(MIN_STABILITY)
}

/// Combine three runes into an ability
pub fn compose(base: &BaseRune, modifier: &ModifierRune, vector: &VectorRune) -> Ability {
    let power = round_half_up(base.power as f64 * modifier.power_multiplier) as i32;
    let cost = round_half_up(
        base.cost as f64 * modifier.cost_multiplier * vector.cost_multiplier,
    )
    .max(0.0) as u32;

    let tags: Vec<RuneTag> = base
        .tags
        .iter()
        .chain(modifier.tags.iter())
        .chain(vector.tags.iter())
        .copied()
        .collect();
    let stability = calculate_stability(&tags);

    Ability {
        id: AbilityId::default(),
        name: format!("{} {} {}", base.name, modifier.name, vector.name),
        base: base.id.clone(),
        modifier: modifier.id.clone(),
        vector: vector.id.clone(),
        power,
        cost,
        tags,
        stability,
    }
}

/// The three slots of the crafting table; any may still be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuneSelection {
    pub base: Option<RuneId>,
    pub modifier: Option<RuneId>,
    pub vector: Option<RuneId>,
}

impl RuneSelection {
    pub fn new(base: &str, modifier: &str, vector: &str) -> Self {
        Self {
            base: Some(RuneId::new(base)),
            modifier: Some(RuneId::new(modifier)),
            vector: Some(RuneId::new(vector)),
        }
    }

    /// All three ids, or the first empty slot
    pub fn slots(&self) -> Result<(&RuneId, &RuneId, &RuneId)> {
        let base = self
            .base
            .as_ref()
            .ok_or(GameError::IncompleteSelection { missing: RuneSlot::Base })?;
        let modifier = self
            .modifier
            .as_ref()
            .ok_or(GameError::IncompleteSelection { missing: RuneSlot::Modifier })?;
        let vector = self
            .vector
            .as_ref()
            .ok_or(GameError::IncompleteSelection { missing: RuneSlot::Vector })?;
        Ok((base, modifier, vector))
    }
}

/// Resolve a selection against the catalog and compose it
pub fn compose_ability(catalog: &Catalog, selection: &RuneSelection) -> Result<Ability> {
    let (base_id, modifier_id, vector_id) = selection.slots()?;

    let base = catalog
        .base_rune(base_id)
        .ok_or_else(|| GameError::UnknownRune(base_id.clone()))?;
    let modifier = catalog
        .modifier_rune(modifier_id)
        .ok_or_else(|| GameError::UnknownRune(modifier_id.clone()))?;
    let vector = catalog
        .vector_rune(vector_id)
        .ok_or_else(|| GameError::UnknownRune(vector_id.clone()))?;

    Ok(compose(base, modifier, vector))
}
