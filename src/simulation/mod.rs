//! Simulation context: the snapshot plus everything needed to advance it
//!
//! `Simulation` owns the game state, the catalog, the configuration and the
//! random stream. All player actions and ticks go through it, so a fixed
//! seed replays identically.

pub mod state;
pub mod tick;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::advisor::{quick_suggestion, Suggestion};
use crate::aperture;
use crate::combat::{handle_death, resolve_combat, roll_loot, CombatOutcome};
use crate::core::config::SimulationConfig;
use crate::core::error::{GameError, LoadError, Result};
use crate::core::types::{AbilityId, DaoElement, EnemyId, FloraId, GridPos};
use crate::crafting::{craft_ability, RuneSelection};
use crate::data::{Catalog, LootDrop, RealmUnlock, Yield};
use crate::factions::default_factions;
use crate::player::{check_realm_advance, PlayerState};
use crate::quests::{generate_quests, record_progress, turn_in_quest, QuestProgress};
use crate::world::{place_factions, step_onto, CellContent, Encounter, WorldState};

pub use state::{GameState, GameTime, SNAPSHOT_VERSION};
pub use tick::{run_game_tick, GameEvent};

/// Spreads consecutive ticks across the seed space when reseeding
const TICK_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

pub struct Simulation {
    pub state: GameState,
    catalog: Catalog,
    config: SimulationConfig,
    rng: ChaCha8Rng,
}

impl Simulation {
    /// Start a new game from `seed`. Fails if `config` does not validate.
    pub fn new_game(
        seed: u64,
        config: SimulationConfig,
        catalog: Catalog,
    ) -> std::result::Result<Self, LoadError> {
        config.validate().map_err(LoadError::InvalidConfig)?;
        let start = config.world.player_start;
        let mut world = WorldState::generate(
            config.world.width,
            config.world.height,
            seed as u32,
            start,
        );
        let factions = default_factions();
        place_factions(&mut world.grid, &factions);

        let mut aperture = aperture::ApertureState::new(&config.aperture);
        aperture.seed_starting_life(&catalog);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let quests = generate_quests(1, 1, &catalog, &factions, &mut rng);

        let state = GameState {
            seed,
            player: PlayerState::new(start),
            world,
            aperture,
            factions,
            next_quest_id: 1 + quests.len() as u32,
            quests,
            ..GameState::default()
        };
        info!(seed, "new game");

        Ok(Self {
            state,
            catalog,
            config,
            rng,
        })
    }

    /// Resume from a snapshot. The random stream is rebuilt from the seed
    /// and the current tick.
    pub fn from_state(
        state: GameState,
        config: SimulationConfig,
        catalog: Catalog,
    ) -> std::result::Result<Self, LoadError> {
        config.validate().map_err(LoadError::InvalidConfig)?;
        let rng = ChaCha8Rng::seed_from_u64(
            state.seed ^ state.time.tick.wrapping_mul(TICK_SEED_MIX),
        );
        Ok(Self {
            state,
            catalog,
            config,
            rng,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run_game_tick(&mut self) -> Vec<GameEvent> {
        run_game_tick(self)
    }

    /// Apply any realm breakthroughs the player's experience now covers
    pub fn check_realm_advance(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.check_realm(&mut events);
        events
    }

    fn check_realm(&mut self, events: &mut Vec<GameEvent>) {
        for advance in check_realm_advance(&mut self.state.player, &self.catalog) {
            let unlocks_aperture = advance.unlocks.contains(&RealmUnlock::Aperture);
            events.push(GameEvent::RealmAdvanced(advance));
            if unlocks_aperture && !self.state.aperture.unlocked {
                self.state.aperture.unlocked = true;
                info!("aperture unlocked");
                events.push(GameEvent::ApertureUnlocked);
            }
        }
    }

    /// Step onto a world cell. An enemy there is fought at once with
    /// `ability` (or bare hands).
    pub fn move_player(&mut self, pos: GridPos, ability: Option<AbilityId>) -> Result<Vec<GameEvent>> {
        let encounter = step_onto(
            &mut self.state.world,
            &mut self.state.player,
            &self.catalog,
            pos,
            &mut self.rng,
        )?;

        let mut events = Vec::new();
        match &encounter {
            Encounter::Resource { flora: Some(flora), .. } => {
                record_progress(&mut self.state.quests, QuestProgress::ResourceGathered(flora));
            }
            Encounter::Ruin { insight: Some(insight) } => {
                events.push(GameEvent::InsightDiscovered(insight.clone()));
            }
            _ => {}
        }

        let enemy = match &encounter {
            Encounter::Enemy(id) => Some(id.clone()),
            _ => None,
        };
        events.push(GameEvent::Moved { encounter });

        match enemy {
            Some(enemy) => events.extend(self.engage_enemy(&enemy, ability)),
            None => self.check_realm(&mut events),
        }
        Ok(events)
    }

    /// Fight `enemy` where the player stands
    pub fn engage_enemy(&mut self, enemy: &EnemyId, ability: Option<AbilityId>) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let Some(kind) = self.catalog.enemy(enemy) else {
            return events;
        };

        let chosen = ability.and_then(|id| self.state.player.ability(id).cloned());
        let report = resolve_combat(
            kind,
            chosen.as_ref(),
            &mut self.state.player,
            &self.catalog,
            &self.config.combat,
            &mut self.rng,
        );
        let outcome = report.outcome;
        events.push(GameEvent::Combat(report));

        match outcome {
            CombatOutcome::Win => {
                for drop in roll_loot(kind, &mut self.state.player, &self.catalog, &mut self.rng) {
                    if let LootDrop::InsightFragment { insight } = &drop {
                        events.push(GameEvent::InsightDiscovered(insight.clone()));
                    }
                    events.push(GameEvent::Loot(drop));
                }
                record_progress(&mut self.state.quests, QuestProgress::EnemyKilled(enemy));

                let here = self.state.player.position;
                let on_enemy_cell = self
                    .state
                    .world
                    .grid
                    .get(here)
                    .is_some_and(|cell| cell.content == CellContent::Enemy);
                if on_enemy_cell {
                    self.state.world.clear_cell(here);
                    events.push(GameEvent::EnemyCleared { enemy: enemy.clone() });
                }
            }
            CombatOutcome::Lose => {
                let report = handle_death(
                    &mut self.state.player,
                    &mut self.state.world.soul_remnants,
                    &mut self.state.aperture,
                    &self.catalog,
                    &self.config.death,
                    &mut self.rng,
                );
                events.push(GameEvent::Death(report));
            }
            CombatOutcome::Draw => {}
        }

        self.check_realm(&mut events);
        events
    }

    pub fn craft(&mut self, selection: &RuneSelection) -> Result<GameEvent> {
        let id = craft_ability(&mut self.state.player, &self.catalog, selection)?;
        let name = self
            .state
            .player
            .ability(id)
            .map(|a| a.name.clone())
            .unwrap_or_default();
        Ok(GameEvent::AbilityCrafted { id, name })
    }

    fn ensure_aperture_unlocked(&self) -> Result<()> {
        if self.state.aperture.unlocked {
            Ok(())
        } else {
            Err(GameError::ApertureLocked)
        }
    }

    pub fn plant(&mut self, species: &FloraId, pos: GridPos) -> Result<()> {
        self.ensure_aperture_unlocked()?;
        self.state.aperture.plant(&self.catalog, species, pos)
    }

    pub fn harvest(&mut self, pos: GridPos) -> Result<Yield> {
        self.ensure_aperture_unlocked()?;
        aperture::harvest(&mut self.state.aperture, &mut self.state.player, &self.catalog, pos)
    }

    pub fn seal_fissure(&mut self, pos: GridPos) -> Result<()> {
        self.ensure_aperture_unlocked()?;
        aperture::seal_fissure(&mut self.state.aperture, &self.config.aperture, pos)
    }

    pub fn terraform(&mut self, pos: GridPos, element: DaoElement, amount: u32) -> Result<()> {
        self.ensure_aperture_unlocked()?;
        self.state
            .aperture
            .terraform(&mut self.state.player, pos, element, amount)
    }

    /// Hand in a finished quest; empty if it is unknown or unfinished
    pub fn turn_in_quest(&mut self, id: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if let Some(reward) = turn_in_quest(
            &mut self.state.quests,
            id,
            &mut self.state.player,
            &mut self.state.factions,
        ) {
            events.push(GameEvent::QuestCompleted { quest: id, reward });
            self.check_realm(&mut events);
        }
        events
    }

    /// Offline advice for fighting `enemy`
    pub fn advise(&self, enemy: &EnemyId) -> Option<Suggestion> {
        let kind = self.catalog.enemy(enemy)?;
        Some(quick_suggestion(kind, &self.state.player, &self.catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(seed: u64) -> Simulation {
        Simulation::new_game(seed, SimulationConfig::default(), Catalog::builtin()).unwrap()
    }

    #[test]
    fn test_new_game_layout() {
        let sim = sim(7);
        let start = GridPos::new(15, 10);
        assert_eq!(sim.state.player.position, start);
        assert_eq!(sim.state.world.grid.get(start).unwrap().content, CellContent::Empty);
        assert_eq!(sim.state.factions.len(), 3);
        for faction in &sim.state.factions {
            assert_eq!(
                sim.state.world.grid.get(faction.position).unwrap().content,
                CellContent::Faction(faction.id)
            );
        }
        assert!(!sim.state.aperture.unlocked);
        assert_eq!(sim.state.quests.len(), 2);
        assert_eq!(sim.state.next_quest_id, 3);
    }

    #[test]
    fn test_aperture_actions_require_unlock() {
        let mut sim = sim(1);
        let pos = GridPos::new(0, 0);
        assert_eq!(sim.plant(&FloraId::new("f1"), pos), Err(GameError::ApertureLocked));
        assert_eq!(sim.harvest(pos), Err(GameError::ApertureLocked));
        assert_eq!(sim.seal_fissure(pos), Err(GameError::ApertureLocked));
        assert_eq!(sim.terraform(pos, DaoElement::Fire, 1), Err(GameError::ApertureLocked));

        sim.state.aperture.unlocked = true;
        sim.plant(&FloraId::new("f1"), pos).unwrap();
        assert_eq!(sim.harvest(pos), Err(GameError::NotMature { x: 0, y: 0 }));
    }

    #[test]
    fn test_breakthrough_unlocks_aperture() {
        let mut sim = sim(1);
        sim.state.player.exp = 800;
        let mut events = Vec::new();
        sim.check_realm(&mut events);
        assert!(sim.state.aperture.unlocked);
        assert!(events.contains(&GameEvent::ApertureUnlocked));
        assert_eq!(sim.state.player.qi, 250);
    }

    #[test]
    fn test_winning_clears_enemy_cell() {
        let mut config = SimulationConfig::default();
        config.combat.turn_cap = 50;
        let mut sim = Simulation::new_game(5, config, Catalog::builtin()).unwrap();
        let pos = GridPos::new(14, 10);
        sim.state.world.grid.get_mut(pos).unwrap().content = CellContent::Enemy;
        sim.state.player.realm_index = 4;
        sim.state.player.qi = 4000;
        let GameEvent::AbilityCrafted { id, .. } = sim.craft(&RuneSelection::new("b1", "m1", "v1")).unwrap() else {
            panic!("expected a crafted ability");
        };

        let events = sim.move_player(pos, Some(id)).unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Combat(r) if r.outcome == CombatOutcome::Win)));
        assert!(events.iter().any(|e| matches!(e, GameEvent::EnemyCleared { .. })));
        assert_eq!(sim.state.world.grid.get(pos).unwrap().content, CellContent::Empty);
        assert_eq!(sim.state.player.position, pos);
    }

    #[test]
    fn test_unfinished_quest_not_paid() {
        let mut sim = sim(3);
        let id = sim.state.quests[0].id;
        assert!(sim.turn_in_quest(id).is_empty());
        sim.state.quests[0].completed = sim.state.quests[0].amount;
        let events = sim.turn_in_quest(id);
        assert!(matches!(events[0], GameEvent::QuestCompleted { .. }));
        assert_eq!(sim.state.quests.len(), 1);
    }

    #[test]
    fn test_resume_from_snapshot() {
        let mut sim = sim(9);
        for _ in 0..10 {
            sim.run_game_tick();
        }
        let json = sim.state.to_json().unwrap();
        let restored = GameState::from_json(&json).unwrap();
        assert_eq!(restored, sim.state);

        let resume = |state: GameState| {
            Simulation::from_state(state, SimulationConfig::default(), Catalog::builtin()).unwrap()
        };
        let mut a = resume(restored.clone());
        let mut b = resume(restored);
        for _ in 0..30 {
            assert_eq!(a.run_game_tick(), b.run_game_tick());
        }
        assert_eq!(a.state, b.state);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = SimulationConfig::default();
        config.aperture.fissure_chance = 1.5;

        let result = Simulation::new_game(4, config.clone(), Catalog::builtin());
        assert!(matches!(result, Err(LoadError::InvalidConfig(_))));

        let state = sim(4).state;
        let result = Simulation::from_state(state, config, Catalog::builtin());
        assert!(matches!(result, Err(LoadError::InvalidConfig(_))));
    }
}
