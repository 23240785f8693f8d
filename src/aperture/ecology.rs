//! Ecology tick
//!
//! One tick runs four phases in a fixed order: flora growth, fauna
//! reproduction, fissure emergence and the random event roll. The offspring
//! born during a tick are not themselves advanced until the next tick.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aperture::events::{trigger_random_event, EventOutcome};
use crate::aperture::state::{ApertureState, FaunaInstance};
use crate::core::config::ApertureConfig;
use crate::core::types::{FaunaId, FloraId, GridPos, Tick};
use crate::data::Catalog;
use crate::player::PlayerState;

/// Something observable that happened during an ecology tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EcologyEvent {
    PlantMatured { species: FloraId, position: GridPos },
    FaunaBorn { species: FaunaId, position: GridPos },
    /// Creatures that were ready to reproduce this tick but were held back
    /// by the population cap; reported once per tick
    PopulationCapped { cap: usize, waiting: u32 },
    FissureOpened { position: GridPos },
    Event(EventOutcome),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcologyReport {
    pub ticks: u64,
    pub events: Vec<EcologyEvent>,
}

impl EcologyReport {
    pub fn births(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EcologyEvent::FaunaBorn { .. }))
            .count()
    }

    pub fn fissures_opened(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, EcologyEvent::FissureOpened { .. }))
            .count()
    }
}

fn grow_flora(aperture: &mut ApertureState, catalog: &Catalog, events: &mut Vec<EcologyEvent>) {
    let rate = aperture.time_rate;
    for plant in aperture.flora.iter_mut() {
        let Some(species) = catalog.flora_species(&plant.species) else {
            continue;
        };
        let before = plant.growth_progress;
        plant.growth_progress = (before + rate).min(species.growth_time);
        if before < species.growth_time && plant.growth_progress >= species.growth_time {
            debug!(species = %plant.species, pos = %plant.position, "plant matured");
            events.push(EcologyEvent::PlantMatured {
                species: plant.species.clone(),
                position: plant.position,
            });
        }
    }
}

const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// A random in-bounds cell adjacent to `pos`, or `pos` itself on a 1x1 grid
fn adjacent_cell<R: Rng>(aperture: &ApertureState, pos: GridPos, rng: &mut R) -> GridPos {
    let grid = aperture.grid();
    let candidates: Vec<GridPos> = NEIGHBOUR_OFFSETS
        .iter()
        .filter_map(|&(dx, dy)| pos.offset(dx, dy))
        .filter(|next| grid.contains(*next))
        .collect();
    candidates.choose(rng).copied().unwrap_or(pos)
}

fn reproduce_fauna<R: Rng>(
    aperture: &mut ApertureState,
    catalog: &Catalog,
    config: &ApertureConfig,
    rng: &mut R,
    events: &mut Vec<EcologyEvent>,
) {
    let cap = aperture.population_cap(config.population_cap_ratio);
    let rate = aperture.time_rate;
    let existing = aperture.fauna.len();
    let mut waiting = 0;

    for i in 0..existing {
        let Some(species) = catalog.fauna_species(&aperture.fauna[i].species) else {
            continue;
        };
        let threshold = species.reproduces_in;

        let parent = &mut aperture.fauna[i];
        parent.reproduction_progress = (parent.reproduction_progress + rate).min(threshold);
        if parent.reproduction_progress < threshold {
            continue;
        }

        if aperture.fauna.len() >= cap {
            waiting += 1;
            continue;
        }

        let health = species.base_health;
        let position = adjacent_cell(aperture, aperture.fauna[i].position, rng);
        let parent = &mut aperture.fauna[i];
        parent.reproduction_progress = 0.0;
        let offspring = FaunaInstance {
            species: parent.species.clone(),
            position,
            reproduction_progress: 0.0,
            health,
        };
        debug!(species = %offspring.species, %position, "fauna born");
        events.push(EcologyEvent::FaunaBorn {
            species: offspring.species.clone(),
            position,
        });
        aperture.fauna.push(offspring);
        aperture.adjust_stability(config.reproduction_stability_bonus);
    }

    if waiting > 0 {
        debug!(cap, waiting, "population capped");
        events.push(EcologyEvent::PopulationCapped { cap, waiting });
    }
}

fn roll_fissure<R: Rng>(
    aperture: &mut ApertureState,
    config: &ApertureConfig,
    rng: &mut R,
    events: &mut Vec<EcologyEvent>,
) {
    if aperture.stability >= config.fissure_stability_threshold {
        return;
    }
    if !rng.gen_bool(config.fissure_chance) {
        return;
    }
    let candidates = aperture.unfissured_cells();
    if let Some(&position) = candidates.choose(rng) {
        if aperture.open_fissure(position) {
            events.push(EcologyEvent::FissureOpened { position });
        }
    }
}

/// Run one ecology tick
pub fn advance_ecology<R: Rng>(
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    config: &ApertureConfig,
    tick: Tick,
    rng: &mut R,
) -> EcologyReport {
    let mut events = Vec::new();

    grow_flora(aperture, catalog, &mut events);
    reproduce_fauna(aperture, catalog, config, rng, &mut events);
    roll_fissure(aperture, config, rng, &mut events);

    if rng.gen_bool(config.event_chance) {
        if let Some(outcome) =
            trigger_random_event(aperture, player, catalog, config.event_choice_policy, rng)
        {
            events.push(EcologyEvent::Event(outcome));
        }
    }

    debug!(
        tick,
        flora = aperture.flora.len(),
        fauna = aperture.fauna.len(),
        stability = aperture.stability,
        fissures = aperture.fissures().len(),
        "ecology tick"
    );

    EcologyReport { ticks: 1, events }
}

/// Run `ticks` consecutive ecology ticks starting at `start`
pub fn advance_ecology_ticks<R: Rng>(
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    config: &ApertureConfig,
    start: Tick,
    ticks: u64,
    rng: &mut R,
) -> EcologyReport {
    let mut report = EcologyReport::default();
    for offset in 0..ticks {
        let step = advance_ecology(aperture, player, catalog, config, start + offset, rng);
        report.ticks += step.ticks;
        report.events.extend(step.events);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aperture::state::FloraInstance;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet_config() -> ApertureConfig {
        ApertureConfig {
            event_chance: 0.0,
            fissure_chance: 0.0,
            ..ApertureConfig::default()
        }
    }

    fn rabbit(pos: GridPos, progress: f32) -> FaunaInstance {
        FaunaInstance {
            species: FaunaId::new("fa1"),
            position: pos,
            reproduction_progress: progress,
            health: 100,
        }
    }

    #[test]
    fn test_flora_growth_clamped() {
        let catalog = Catalog::builtin();
        let config = quiet_config();
        let mut aperture = ApertureState::new(&config);
        aperture.flora.push(FloraInstance {
            species: FloraId::new("f1"),
            position: GridPos::new(1, 1),
            growth_progress: 9.5,
        });
        let mut player = PlayerState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 0, &mut rng);
        assert_eq!(aperture.flora[0].growth_progress, 10.0);
        assert!(matches!(report.events[0], EcologyEvent::PlantMatured { .. }));

        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 1, &mut rng);
        assert_eq!(aperture.flora[0].growth_progress, 10.0);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_reproduction_spawns_one_offspring() {
        let catalog = Catalog::builtin();
        let config = quiet_config();
        let mut aperture = ApertureState::new(&config);
        aperture.stability = 90.0;
        let mut parent = rabbit(GridPos::new(0, 0), 19.0);
        parent.health = 40;
        aperture.fauna.push(parent);
        let mut player = PlayerState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 0, &mut rng);
        assert_eq!(report.births(), 1);
        assert_eq!(aperture.fauna.len(), 2);
        assert_eq!(aperture.fauna[0].reproduction_progress, 0.0);
        assert_eq!(aperture.fauna[1].reproduction_progress, 0.0);
        let child = aperture.fauna[1].position;
        assert!(child.x <= 1 && child.y <= 1);
        assert_ne!(child, GridPos::new(0, 0));
        assert_eq!(aperture.fauna[0].health, 40);
        assert_eq!(aperture.fauna[1].health, 100);
        assert_eq!(aperture.stability, 90.5);
    }

    #[test]
    fn test_population_cap_holds_progress() {
        let catalog = Catalog::builtin();
        let config = ApertureConfig {
            size: 3,
            ..quiet_config()
        };
        // cap = floor(9 * 0.3) = 2
        let mut aperture = ApertureState::new(&config);
        aperture.fauna.push(rabbit(GridPos::new(0, 0), 19.0));
        aperture.fauna.push(rabbit(GridPos::new(1, 1), 19.0));
        let mut player = PlayerState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 0, &mut rng);
        assert_eq!(aperture.fauna.len(), 2);
        assert_eq!(report.births(), 0);
        assert!(aperture.fauna.iter().all(|f| f.reproduction_progress == 20.0));
        assert_eq!(report.events, vec![EcologyEvent::PopulationCapped { cap: 2, waiting: 2 }]);

        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 1, &mut rng);
        assert_eq!(report.events.len(), 1);
    }

    #[test]
    fn test_offspring_never_share_the_parent_cell() {
        let catalog = Catalog::builtin();
        let config = quiet_config();
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let mut player = PlayerState::default();

        for _ in 0..50 {
            let mut aperture = ApertureState::new(&config);
            let parent = GridPos::new(7, 7);
            aperture.fauna.push(rabbit(parent, 19.0));
            advance_ecology(&mut aperture, &mut player, &catalog, &config, 0, &mut rng);

            let child = aperture.fauna[1].position;
            assert_ne!(child, parent);
            assert!(child.x.abs_diff(parent.x) <= 1 && child.y.abs_diff(parent.y) <= 1);
        }
    }

    #[test]
    fn test_no_fissures_while_stable() {
        let catalog = Catalog::builtin();
        let config = ApertureConfig {
            fissure_chance: 1.0,
            event_chance: 0.0,
            ..ApertureConfig::default()
        };
        let mut aperture = ApertureState::new(&config);
        let mut player = PlayerState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        advance_ecology_ticks(&mut aperture, &mut player, &catalog, &config, 0, 20, &mut rng);
        assert!(aperture.fissures().is_empty());

        aperture.stability = 50.0;
        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 20, &mut rng);
        assert_eq!(report.fissures_opened(), 1);
        assert_eq!(aperture.fissures().len(), 1);
        assert!(aperture.fissures_consistent());
    }

    #[test]
    fn test_same_stream_same_outcome() {
        let catalog = Catalog::builtin();
        let config = ApertureConfig {
            initial_stability: 60.0,
            ..ApertureConfig::default()
        };
        let run = || {
            let mut aperture = ApertureState::new(&config);
            aperture.seed_starting_life(&catalog);
            let mut player = PlayerState::default();
            let mut rng = ChaCha8Rng::seed_from_u64(1234);
            let report =
                advance_ecology_ticks(&mut aperture, &mut player, &catalog, &config, 0, 100, &mut rng);
            (aperture, player, report)
        };
        assert_eq!(run(), run());
    }
}
