//! Game tick - advances time and everything that lives in it
//!
//! Order within a tick: clock, day rollover (with fresh quests when the
//! board is empty), the aperture's ecology if unlocked, then faction drift.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aperture::{advance_ecology, EcologyEvent};
use crate::combat::{CombatReport, DeathReport};
use crate::core::types::{AbilityId, EnemyId, InsightId, Tick};
use crate::data::LootDrop;
use crate::player::RealmAdvance;
use crate::quests::{generate_quests, QuestReward};
use crate::simulation::Simulation;
use crate::world::Encounter;

/// Everything the player is told about, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    NewDay { day: u64 },
    QuestsPosted { count: usize },
    Ecology(EcologyEvent),
    Moved { encounter: Encounter },
    Combat(CombatReport),
    Loot(LootDrop),
    Death(DeathReport),
    RealmAdvanced(RealmAdvance),
    ApertureUnlocked,
    AbilityCrafted { id: AbilityId, name: String },
    InsightDiscovered(InsightId),
    EnemyCleared { enemy: EnemyId },
    QuestCompleted { quest: u32, reward: QuestReward },
}

/// Run one game tick
pub fn run_game_tick(sim: &mut Simulation) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let state = &mut sim.state;

    state.time.tick += 1;
    let tick: Tick = state.time.tick;

    let ticks_per_day = sim.config.time.ticks_per_day.max(1);
    if tick % ticks_per_day == 0 {
        state.time.day += 1;
        info!(day = state.time.day, "a new day dawns");
        events.push(GameEvent::NewDay { day: state.time.day });

        if state.quests.is_empty() {
            let quests = generate_quests(
                state.time.day,
                state.next_quest_id,
                &sim.catalog,
                &state.factions,
                &mut sim.rng,
            );
            state.next_quest_id += quests.len() as u32;
            events.push(GameEvent::QuestsPosted { count: quests.len() });
            state.quests = quests;
        }
    }

    if state.aperture.unlocked {
        let report = advance_ecology(
            &mut state.aperture,
            &mut state.player,
            &sim.catalog,
            &sim.config.aperture,
            tick,
            &mut sim.rng,
        );
        events.extend(report.events.into_iter().map(GameEvent::Ecology));
    }

    crate::factions::drift_factions(
        &mut state.factions,
        sim.config.time.faction_drift_chance,
        &mut sim.rng,
    );

    debug!(tick, events = events.len(), "game tick");
    events
}
