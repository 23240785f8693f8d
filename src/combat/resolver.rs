//! Turn-based combat resolution
//!
//! A fight is a bounded state machine: each turn the player acts, a dead
//! enemy ends the fight at once, otherwise the enemy strikes back. The
//! fight always ends within `turn_cap` turns.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::CombatConfig;
use crate::core::types::EnemyId;
use crate::crafting::Ability;
use crate::data::{Catalog, EnemyKind};
use crate::player::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatOutcome {
    Win,
    Lose,
    Draw,
}

/// One line of the combat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    AbilityHit { ability: String, damage: i32, enemy_hp: i32 },
    AbilityHealed { ability: String, restored: i32 },
    /// The ability misfired; the caster takes the backlash
    Backlash { ability: String, damage: i32 },
    BasicAttack { damage: i32, cost: i32, enemy_hp: i32 },
    EnemyStrike { damage: i32, player_qi: i32 },
    Ended { outcome: CombatOutcome, turns: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub enemy: EnemyId,
    pub outcome: CombatOutcome,
    pub turns: u32,
    pub log: Vec<CombatEvent>,
    pub exp_gained: u64,
}

impl CombatReport {
    /// Signal for the realm-advancement check
    pub fn enemy_defeated(&self) -> bool {
        self.outcome == CombatOutcome::Win
    }
}

fn player_turn<R: Rng>(
    enemy_hp: &mut i32,
    ability: Option<&Ability>,
    player: &mut PlayerState,
    catalog: &Catalog,
    config: &CombatConfig,
    rng: &mut R,
    log: &mut Vec<CombatEvent>,
) {
    if let Some(ability) = ability.filter(|a| i64::from(player.qi) >= i64::from(a.cost)) {
        player.qi -= ability.cost as i32;
        let roll: f64 = rng.gen_range(0.0..100.0);
        if roll >= f64::from(ability.stability) {
            player.qi -= config.catastrophic_backlash;
            log.push(CombatEvent::Backlash {
                ability: ability.name.clone(),
                damage: config.catastrophic_backlash,
            });
        } else if ability.is_restorative() {
            let restored = player.add_qi(-ability.power, catalog);
            log.push(CombatEvent::AbilityHealed {
                ability: ability.name.clone(),
                restored,
            });
        } else {
            *enemy_hp -= ability.power;
            log.push(CombatEvent::AbilityHit {
                ability: ability.name.clone(),
                damage: ability.power,
                enemy_hp: *enemy_hp,
            });
        }
        return;
    }

    let damage = rng.gen_range(config.basic_damage_min..=config.basic_damage_max);
    let cost = rng.gen_range(config.basic_cost_min..=config.basic_cost_max);
    player.qi -= cost;
    *enemy_hp -= damage;
    log.push(CombatEvent::BasicAttack {
        damage,
        cost,
        enemy_hp: *enemy_hp,
    });
}

/// Fight `enemy` until someone falls or the turn cap is reached
///
/// Qi is the player's vitality and is mutated in place. Experience is
/// granted on a win; death handling is left to the caller.
pub fn resolve_combat<R: Rng>(
    enemy: &EnemyKind,
    ability: Option<&Ability>,
    player: &mut PlayerState,
    catalog: &Catalog,
    config: &CombatConfig,
    rng: &mut R,
) -> CombatReport {
    let mut enemy_hp = enemy.hp;
    let mut log = Vec::new();
    let mut outcome = CombatOutcome::Draw;
    let mut turns = 0;

    while turns < config.turn_cap {
        turns += 1;

        player_turn(&mut enemy_hp, ability, player, catalog, config, rng, &mut log);
        if enemy_hp <= 0 {
            outcome = CombatOutcome::Win;
            break;
        }

        let bonus = if config.enemy_counter_bonus_max > 0 {
            rng.gen_range(0..config.enemy_counter_bonus_max)
        } else {
            0
        };
        let damage = enemy.power + bonus;
        player.qi -= damage;
        log.push(CombatEvent::EnemyStrike {
            damage,
            player_qi: player.qi,
        });
        if player.qi <= 0 {
            outcome = CombatOutcome::Lose;
            break;
        }
    }
    log.push(CombatEvent::Ended { outcome, turns });

    let mut exp_gained = 0;
    if outcome == CombatOutcome::Win {
        exp_gained = enemy.power.max(0) as u64 * u64::from(config.exp_per_enemy_power);
        player.add_exp(exp_gained);
        player.consecutive_deaths = 0;
    }

    debug!(enemy = %enemy.name, turns, qi = player.qi, "combat resolved");
    info!(enemy = %enemy.name, ?outcome, exp_gained, "combat ended");

    CombatReport {
        enemy: enemy.id.clone(),
        outcome,
        turns,
        log,
        exp_gained,
    }
}
