//! Stepping onto a world cell
//!
//! Consumable contents (resources, ruins, specials) empty the cell once
//! used. Enemies and factions are only reported; the caller decides what
//! the encounter leads to.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{GameError, Result};
use crate::core::types::{EnemyId, FactionId, FloraId, GridPos, InsightId};
use crate::data::Catalog;
use crate::player::PlayerState;
use crate::world::{CellContent, WorldState};

const MERCHANT_CHANCE: f64 = 0.4;
const SPRING_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Encounter {
    Nothing,
    RemnantRecovered { exp: u64 },
    /// Wild herbs absorbed on the spot
    Resource { flora: Option<FloraId>, qi: i32 },
    Ruin { insight: Option<InsightId> },
    /// A wandering merchant offering qi for experience
    Merchant { qi_offered: i32, exp_cost: u64, accepted: bool },
    Spring { qi: i32 },
    Cultivator { exp: u64 },
    Enemy(EnemyId),
    Faction(FactionId),
}

fn explore_ruin<R: Rng>(player: &mut PlayerState, catalog: &Catalog, rng: &mut R) -> Option<InsightId> {
    if !rng.gen_bool(0.5) {
        return None;
    }
    let unknown: Vec<&InsightId> = catalog
        .insights
        .iter()
        .map(|i| &i.id)
        .filter(|id| !player.knows_insight(id))
        .collect();
    let found = (*unknown.choose(rng)?).clone();
    player.discover_insight(&found, catalog);
    Some(found)
}

fn special_event<R: Rng>(player: &mut PlayerState, catalog: &Catalog, rng: &mut R) -> Encounter {
    let roll: f64 = rng.gen();
    if roll < MERCHANT_CHANCE {
        let qi_offered = rng.gen_range(100..200);
        let exp_cost = rng.gen_range(50..100);
        let accepted = player.spend_exp(exp_cost).is_ok();
        if accepted {
            player.add_qi(qi_offered, catalog);
        }
        Encounter::Merchant { qi_offered, exp_cost, accepted }
    } else if roll < MERCHANT_CHANCE + SPRING_CHANCE {
        let qi = rng.gen_range(75..150);
        player.add_qi(qi, catalog);
        Encounter::Spring { qi }
    } else {
        let exp = rng.gen_range(100..200);
        player.add_exp(exp);
        Encounter::Cultivator { exp }
    }
}

/// Move the player onto `pos` and resolve whatever is there
///
/// A soul remnant on the cell takes the whole visit; the cell's content
/// waits for the next one.
pub fn step_onto<R: Rng>(
    world: &mut WorldState,
    player: &mut PlayerState,
    catalog: &Catalog,
    pos: GridPos,
    rng: &mut R,
) -> Result<Encounter> {
    let content = world
        .grid
        .get(pos)
        .map(|cell| cell.content)
        .ok_or(GameError::InvalidPosition { x: pos.x, y: pos.y })?;
    player.position = pos;

    if let Some(remnant) = world.take_remnant(pos) {
        player.add_exp(remnant.exp);
        player.lost_exp = player.lost_exp.saturating_sub(remnant.exp);
        info!(%pos, exp = remnant.exp, "soul remnant recovered");
        return Ok(Encounter::RemnantRecovered { exp: remnant.exp });
    }

    let encounter = match content {
        CellContent::Empty => Encounter::Nothing,
        CellContent::Resource => {
            let flora = catalog.flora.choose(rng).map(|f| f.id.clone());
            let qi = rng.gen_range(50..100);
            player.add_qi(qi, catalog);
            world.clear_cell(pos);
            Encounter::Resource { flora, qi }
        }
        CellContent::Ruin => {
            let insight = explore_ruin(player, catalog, rng);
            world.clear_cell(pos);
            Encounter::Ruin { insight }
        }
        CellContent::Special => {
            let encounter = special_event(player, catalog, rng);
            world.clear_cell(pos);
            encounter
        }
        CellContent::Enemy => match catalog.enemies.choose(rng) {
            Some(enemy) => Encounter::Enemy(enemy.id.clone()),
            None => Encounter::Nothing,
        },
        CellContent::Faction(id) => Encounter::Faction(id),
    };
    Ok(encounter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::SoulRemnant;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_with(content: CellContent) -> WorldState {
        let mut world = WorldState::generate(5, 5, 1, GridPos::new(0, 0));
        world.grid.get_mut(GridPos::new(2, 2)).unwrap().content = content;
        world
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let catalog = Catalog::builtin();
        let mut world = world_with(CellContent::Empty);
        let mut player = PlayerState::new(GridPos::new(0, 0));
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(
            step_onto(&mut world, &mut player, &catalog, GridPos::new(5, 0), &mut rng),
            Err(GameError::InvalidPosition { x: 5, y: 0 })
        );
        assert_eq!(player.position, GridPos::new(0, 0));
    }

    #[test]
    fn test_resource_grants_qi_and_empties_cell() {
        let catalog = Catalog::builtin();
        let mut world = world_with(CellContent::Resource);
        let mut player = PlayerState::new(GridPos::new(0, 0));
        player.qi = 10;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let pos = GridPos::new(2, 2);
        match step_onto(&mut world, &mut player, &catalog, pos, &mut rng).unwrap() {
            Encounter::Resource { qi, .. } => {
                assert!((50..100).contains(&qi));
                assert_eq!(player.qi, 10 + qi);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(player.position, pos);
        assert_eq!(world.grid.get(pos).unwrap().content, CellContent::Empty);
    }

    #[test]
    fn test_remnant_recovered_before_content() {
        let catalog = Catalog::builtin();
        let mut world = world_with(CellContent::Resource);
        let pos = GridPos::new(2, 2);
        world.soul_remnants.push(SoulRemnant { position: pos, exp: 40 });
        let mut player = PlayerState::new(GridPos::new(0, 0));
        player.lost_exp = 40;
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let encounter = step_onto(&mut world, &mut player, &catalog, pos, &mut rng).unwrap();
        assert_eq!(encounter, Encounter::RemnantRecovered { exp: 40 });
        assert_eq!(player.exp, 40);
        assert_eq!(player.lost_exp, 0);
        assert!(world.soul_remnants.is_empty());
        assert_eq!(world.grid.get(pos).unwrap().content, CellContent::Resource);
    }

    #[test]
    fn test_enemy_reported_not_cleared() {
        let catalog = Catalog::builtin();
        let mut world = world_with(CellContent::Enemy);
        let mut player = PlayerState::new(GridPos::new(0, 0));
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let pos = GridPos::new(2, 2);
        let encounter = step_onto(&mut world, &mut player, &catalog, pos, &mut rng).unwrap();
        match encounter {
            Encounter::Enemy(id) => assert!(catalog.enemy(&id).is_some()),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(world.grid.get(pos).unwrap().content, CellContent::Enemy);
    }

    #[test]
    fn test_ruin_only_yields_unknown_insights() {
        let catalog = Catalog::builtin();
        let pos = GridPos::new(2, 2);
        for seed in 0..20 {
            let mut world = world_with(CellContent::Ruin);
            let mut player = PlayerState::new(GridPos::new(0, 0));
            let known = player.discovered_insights.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            if let Encounter::Ruin { insight: Some(id) } =
                step_onto(&mut world, &mut player, &catalog, pos, &mut rng).unwrap()
            {
                assert!(!known.contains(&id));
                assert!(player.knows_insight(&id));
            }
            assert_eq!(world.grid.get(pos).unwrap().content, CellContent::Empty);
        }
    }

    #[test]
    fn test_broke_merchant_trade_declined() {
        let catalog = Catalog::builtin();
        for seed in 0..30 {
            let mut player = PlayerState::default();
            player.qi = 10;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            if let Encounter::Merchant { accepted, .. } = special_event(&mut player, &catalog, &mut rng) {
                assert!(!accepted);
                assert_eq!(player.qi, 10);
            }
        }
    }
}
