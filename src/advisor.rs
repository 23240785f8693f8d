//! Offline combat advice
//!
//! A quick heuristic that picks one rune combination for the coming fight.
//! It only reads state; following the advice is up to the player.

use serde::{Deserialize, Serialize};

use crate::crafting::{compose_ability, RuneSelection};
use crate::data::{Catalog, EnemyKind};
use crate::player::PlayerState;

/// Threat above this multiple of the player's power calls for sustain
const OVERWHELMING_THREAT: f64 = 1.5;
/// Qi above this affords an all-out attack
const BURST_QI: i32 = 80;
const RUNE_POWER_BONUS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tactic {
    /// Heal through a fight that cannot be won quickly
    Sustain,
    Burst,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub tactic: Tactic,
    pub combo: RuneSelection,
    pub priority: u8,
    pub confidence: f32,
    pub estimated_damage: i32,
    pub qi_cost: u32,
    /// The player owns every rune in the combo
    pub viable: bool,
}

/// max_qi × (qi / max_qi) + 5 per unlocked rune
pub fn estimate_player_power(player: &PlayerState, catalog: &Catalog) -> f64 {
    let max_qi = f64::from(player.max_qi(catalog));
    let qi_ratio = if max_qi > 0.0 {
        f64::from(player.qi) / max_qi
    } else {
        0.0
    };
    max_qi * qi_ratio + player.unlocked_runes.len() as f64 * RUNE_POWER_BONUS
}

pub fn enemy_threat(enemy: &EnemyKind) -> f64 {
    f64::from(enemy.hp + enemy.power)
}

/// Pick one combo for fighting `enemy`
pub fn quick_suggestion(enemy: &EnemyKind, player: &PlayerState, catalog: &Catalog) -> Suggestion {
    let power = estimate_player_power(player, catalog);

    let (tactic, combo, priority, confidence) = if enemy_threat(enemy) > power * OVERWHELMING_THREAT {
        (Tactic::Sustain, RuneSelection::new("b4", "m3", "v2"), 1, 0.8)
    } else if player.qi > BURST_QI {
        (Tactic::Burst, RuneSelection::new("b2", "m1", "v1"), 1, 0.7)
    } else {
        (Tactic::Balanced, RuneSelection::new("b1", "m2", "v1"), 2, 0.6)
    };

    let (estimated_damage, qi_cost) = compose_ability(catalog, &combo)
        .map(|a| (a.power, a.cost))
        .unwrap_or((0, 0));
    let viable = combo
        .slots()
        .map(|(b, m, v)| [b, m, v].iter().all(|id| player.has_rune(id)))
        .unwrap_or(false);

    Suggestion {
        tactic,
        combo,
        priority,
        confidence,
        estimated_damage,
        qi_cost,
        viable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EnemyId;

    fn enemy(hp: i32, power: i32) -> EnemyKind {
        EnemyKind {
            id: EnemyId::new("x"),
            name: "X".into(),
            hp,
            power,
            loot: Vec::new(),
        }
    }

    #[test]
    fn test_player_power_estimate() {
        let catalog = Catalog::builtin();
        let player = PlayerState::default();
        // 100 qi + 4 runes
        assert_eq!(estimate_player_power(&player, &catalog), 120.0);
    }

    #[test]
    fn test_strong_enemy_gets_sustain() {
        let catalog = Catalog::builtin();
        let player = PlayerState::default();
        let suggestion = quick_suggestion(&enemy(150, 40), &player, &catalog);
        assert_eq!(suggestion.tactic, Tactic::Sustain);
        assert!(suggestion.estimated_damage < 0);
        assert!(!suggestion.viable);
    }

    #[test]
    fn test_high_qi_gets_burst() {
        let catalog = Catalog::builtin();
        let player = PlayerState::default();
        let suggestion = quick_suggestion(&enemy(50, 10), &player, &catalog);
        assert_eq!(suggestion.tactic, Tactic::Burst);
        // Fireball 15 × 1.5
        assert_eq!(suggestion.estimated_damage, 23);
    }

    #[test]
    fn test_low_qi_gets_balanced() {
        let catalog = Catalog::builtin();
        let mut player = PlayerState::default();
        player.qi = 60;
        let suggestion = quick_suggestion(&enemy(30, 5), &player, &catalog);
        assert_eq!(suggestion.tactic, Tactic::Balanced);
        assert_eq!(suggestion.priority, 2);
    }
}
