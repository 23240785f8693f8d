//! Aperture ecology integration tests

use apotheosis::aperture::*;
use apotheosis::core::config::{ApertureConfig, EventChoicePolicy};
use apotheosis::core::types::{FaunaId, FloraId, GridPos, ResourceKind};
use apotheosis::data::{Catalog, Yield};
use apotheosis::player::PlayerState;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rabbit(pos: GridPos, progress: f32) -> FaunaInstance {
    FaunaInstance {
        species: FaunaId::new("fa1"),
        position: pos,
        reproduction_progress: progress,
        health: 100,
    }
}

#[test]
fn test_one_tick_short_of_threshold_spawns_exactly_one() {
    let catalog = Catalog::builtin();
    let config = ApertureConfig {
        event_chance: 0.0,
        ..ApertureConfig::default()
    };
    let mut aperture = ApertureState::new(&config);
    aperture.fauna.push(rabbit(GridPos::new(7, 7), 19.0));
    let mut player = PlayerState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 0, &mut rng);

    assert_eq!(report.births(), 1);
    assert_eq!(aperture.fauna.len(), 2);
    assert_eq!(aperture.fauna[0].reproduction_progress, 0.0);
    let child = &aperture.fauna[1];
    assert_eq!(child.reproduction_progress, 0.0);
    assert!(child.position.x.abs_diff(7) <= 1 && child.position.y.abs_diff(7) <= 1);
    assert_ne!(child.position, GridPos::new(7, 7));
}

#[test]
fn test_plant_grow_harvest_cycle() {
    let catalog = Catalog::builtin();
    let config = ApertureConfig {
        event_chance: 0.0,
        fissure_chance: 0.0,
        ..ApertureConfig::default()
    };
    let mut aperture = ApertureState::new(&config);
    let mut player = PlayerState::default();
    player.qi = 10;
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let pos = GridPos::new(6, 6);

    aperture.plant(&catalog, &FloraId::new("f1"), pos).unwrap();
    advance_ecology_ticks(&mut aperture, &mut player, &catalog, &config, 0, 9, &mut rng);
    assert!(harvest(&mut aperture, &mut player, &catalog, pos).is_err());
    assert_eq!(player.qi, 10);

    let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, 9, &mut rng);
    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, EcologyEvent::PlantMatured { position, .. } if *position == pos)));
    assert_eq!(
        harvest(&mut aperture, &mut player, &catalog, pos).unwrap(),
        Yield::Qi { amount: 5 }
    );
    assert_eq!(player.qi, 15);
    assert!(aperture.plant_at(pos).is_none());
}

#[test]
fn test_time_rate_speeds_growth() {
    let catalog = Catalog::builtin();
    let config = ApertureConfig {
        event_chance: 0.0,
        initial_time_rate: 2.5,
        ..ApertureConfig::default()
    };
    let mut aperture = ApertureState::new(&config);
    aperture.plant(&catalog, &FloraId::new("f2"), GridPos::new(0, 0)).unwrap();
    let mut player = PlayerState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    advance_ecology_ticks(&mut aperture, &mut player, &catalog, &config, 0, 4, &mut rng);
    assert_eq!(aperture.flora[0].growth_progress, 10.0);
}

#[test]
fn test_unstable_aperture_tears_and_seals() {
    let catalog = Catalog::builtin();
    let config = ApertureConfig {
        initial_stability: 40.0,
        fissure_chance: 1.0,
        event_chance: 0.0,
        ..ApertureConfig::default()
    };
    let mut aperture = ApertureState::new(&config);
    let mut player = PlayerState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let report = advance_ecology_ticks(&mut aperture, &mut player, &catalog, &config, 0, 5, &mut rng);
    assert_eq!(report.fissures_opened(), 5);
    assert!(aperture.fissures_consistent());

    let first = aperture.fissures()[0];
    seal_fissure(&mut aperture, &config, first).unwrap();
    assert_eq!(aperture.fissures().len(), 4);
    assert_eq!(aperture.stability, 45.0);
    assert!(aperture.fissures_consistent());
}

#[test]
fn test_events_never_overdraw() {
    let catalog = Catalog::builtin();
    let config = ApertureConfig {
        event_chance: 1.0,
        event_choice_policy: EventChoicePolicy::Weighted,
        ..ApertureConfig::default()
    };
    let mut aperture = ApertureState::new(&config);
    aperture.soul_foundation = 0;
    let mut player = PlayerState::default();
    player.qi = 0;
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    for tick in 0..200 {
        let report = advance_ecology(&mut aperture, &mut player, &catalog, &config, tick, &mut rng);
        assert!(player.qi >= 0);
        assert_eq!(aperture.soul_foundation, 0);
        for event in &report.events {
            if let EcologyEvent::Event(outcome) = event {
                if let EventResolution::Applied { cost: Some(cost), .. } = &outcome.resolution {
                    assert_ne!(cost.resource, ResourceKind::SoulFoundation);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_population_never_exceeds_cap(
        seed in any::<u64>(),
        size in 2u32..10,
        ticks in 1u64..150,
    ) {
        let catalog = Catalog::builtin();
        let config = ApertureConfig { size, ..ApertureConfig::default() };
        let mut aperture = ApertureState::new(&config);
        aperture.fauna.push(rabbit(GridPos::new(0, 0), 0.0));
        let cap = aperture.population_cap(config.population_cap_ratio).max(1);
        let mut player = PlayerState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for tick in 0..ticks {
            advance_ecology(&mut aperture, &mut player, &catalog, &config, tick, &mut rng);
            prop_assert!(aperture.fauna.len() <= cap);
            prop_assert!(aperture.fissures_consistent());
            prop_assert!((0.0..=MAX_STABILITY).contains(&aperture.stability));
            for fauna in &aperture.fauna {
                prop_assert!(fauna.position.x < size && fauna.position.y < size);
            }
        }
    }

    #[test]
    fn prop_growth_never_decreases(seed in any::<u64>(), ticks in 1u64..60) {
        let catalog = Catalog::builtin();
        let config = ApertureConfig { event_chance: 0.0, ..ApertureConfig::default() };
        let mut aperture = ApertureState::new(&config);
        aperture.seed_starting_life(&catalog);
        let mut player = PlayerState::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut last: Vec<f32> = aperture.flora.iter().map(|p| p.growth_progress).collect();
        for tick in 0..ticks {
            advance_ecology(&mut aperture, &mut player, &catalog, &config, tick, &mut rng);
            let now: Vec<f32> = aperture.flora.iter().map(|p| p.growth_progress).collect();
            for (before, after) in last.iter().zip(&now) {
                prop_assert!(after >= before);
            }
            for plant in &aperture.flora {
                let species = catalog.flora_species(&plant.species).unwrap();
                prop_assert!(plant.growth_progress <= species.growth_time);
            }
            last = now;
        }
    }
}
