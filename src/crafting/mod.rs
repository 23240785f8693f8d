//! Ability crafting from rune components

pub mod ability;
pub mod rune;

pub use ability::{calculate_stability, compose, compose_ability, Ability, RuneSelection};
pub use rune::{BaseRune, ModifierRune, RuneSlot, RuneTag, VectorRune};

use tracing::info;

use crate::core::error::{GameError, Result};
use crate::core::types::AbilityId;
use crate::data::Catalog;
use crate::player::PlayerState;

/// Compose the selected runes and add the ability to the player's collection.
///
/// Every selected rune must already be unlocked by the player.
pub fn craft_ability(
    player: &mut PlayerState,
    catalog: &Catalog,
    selection: &RuneSelection,
) -> Result<AbilityId> {
    let (base, modifier, vector) = selection.slots()?;
    for id in [base, modifier, vector] {
        if !player.has_rune(id) {
            return Err(GameError::RuneLocked(id.clone()));
        }
    }

    let ability = compose_ability(catalog, selection)?;
    info!(name = %ability.name, stability = ability.stability, "ability crafted");
    Ok(player.add_ability(ability))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RuneId;

    #[test]
    fn test_craft_requires_unlocked_runes() {
        let catalog = Catalog::builtin();
        let mut player = PlayerState::default();

        let locked = RuneSelection::new("b2", "m1", "v1");
        assert_eq!(
            craft_ability(&mut player, &catalog, &locked),
            Err(GameError::RuneLocked(RuneId::new("b2")))
        );
        assert!(player.abilities.is_empty());

        let id = craft_ability(&mut player, &catalog, &RuneSelection::new("b1", "m1", "v1")).unwrap();
        assert_eq!(player.ability(id).unwrap().cost, 9);
    }

    #[test]
    fn test_craft_incomplete_selection_mutates_nothing() {
        let catalog = Catalog::builtin();
        let mut player = PlayerState::default();
        let before = player.clone();
        let result = craft_ability(&mut player, &catalog, &RuneSelection::default());
        assert_eq!(result, Err(GameError::IncompleteSelection { missing: RuneSlot::Base }));
        assert_eq!(player, before);
    }
}
