//! World generation integration tests

use apotheosis::core::config::SimulationConfig;
use apotheosis::core::types::GridPos;
use apotheosis::data::Catalog;
use apotheosis::simulation::Simulation;
use apotheosis::world::*;
use proptest::prelude::*;

#[test]
fn test_every_biome_appears_on_a_large_map() {
    let grid = generate_world(200, 200, 2024, None);
    for biome in Biome::ALL {
        assert!(
            grid.cells.iter().any(|c| c.biome == biome),
            "{:?} never generated",
            biome
        );
    }
}

#[test]
fn test_biomes_are_spatially_coherent() {
    // Neighbouring cells sample nearby noise, so most of them share a biome
    let grid = generate_world(60, 60, 77, None);
    let mut same = 0;
    let mut total = 0;
    for y in 0..60 {
        for x in 0..59 {
            let a = grid.get(GridPos::new(x, y)).unwrap().biome;
            let b = grid.get(GridPos::new(x + 1, y)).unwrap().biome;
            total += 1;
            if a == b {
                same += 1;
            }
        }
    }
    assert!(same as f64 / total as f64 > 0.6);
}

#[test]
fn test_new_game_world_matches_standalone_generation() {
    let config = SimulationConfig::default();
    let sim = Simulation::new_game(99, config.clone(), Catalog::builtin()).unwrap();
    let mut expected = generate_world(30, 20, 99, Some(config.world.player_start));
    place_factions(&mut expected, &sim.state.factions);
    assert_eq!(sim.state.world.grid, expected);
}

#[test]
fn test_fresh_cells_carry_no_marks_or_fissures() {
    let grid = generate_world(30, 20, 5, Some(GridPos::new(15, 10)));
    assert!(grid
        .cells
        .iter()
        .all(|c| !c.fissure && c.terraform_marks.is_empty()));
}

proptest! {
    #[test]
    fn prop_generation_is_deterministic(seed in any::<u32>(), w in 1u32..40, h in 1u32..40) {
        let a = generate_world(w, h, seed, None);
        let b = generate_world(w, h, seed, None);
        prop_assert_eq!(a.cells.len(), (w * h) as usize);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_start_cell_always_empty(seed in any::<u32>(), x in 0u32..30, y in 0u32..20) {
        let start = GridPos::new(x, y);
        let grid = generate_world(30, 20, seed, Some(start));
        prop_assert_eq!(grid.get(start).unwrap().content, CellContent::Empty);
    }

    #[test]
    fn prop_noise_in_range(seed in any::<u32>(), x in -500.0f64..500.0, y in -500.0f64..500.0) {
        let v = GradientNoise::new(seed).sample(x, y);
        prop_assert!((-1.0..=1.0).contains(&v));
    }

    #[test]
    fn prop_biome_partition_is_total(v in -1.0f64..=1.0) {
        let biome = Biome::from_noise(v);
        let expected = if v < -0.2 {
            Biome::Ocean
        } else if v < 0.0 {
            Biome::Desert
        } else if v < 0.2 {
            Biome::Forest
        } else if v < 0.5 {
            Biome::Mountain
        } else {
            Biome::Volcanic
        };
        prop_assert_eq!(biome, expected);
    }
}
