//! Player-triggered aperture actions

use tracing::info;

use crate::aperture::state::ApertureState;
use crate::core::config::ApertureConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{GridPos, ResourceKind};
use crate::data::{Catalog, Yield};
use crate::player::PlayerState;

/// Harvest the mature plant at `pos`, granting its yield to the player
///
/// An immature plant is left untouched and reported as `NotMature`.
pub fn harvest(
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    pos: GridPos,
) -> Result<Yield> {
    let index = aperture
        .flora
        .iter()
        .position(|p| p.position == pos)
        .ok_or(GameError::NoPlant { x: pos.x, y: pos.y })?;

    let plant = &aperture.flora[index];
    let species = catalog
        .flora_species(&plant.species)
        .ok_or_else(|| GameError::UnknownFlora(plant.species.clone()))?;
    if plant.growth_progress < species.growth_time {
        return Err(GameError::NotMature { x: pos.x, y: pos.y });
    }

    let yielded = species.harvest_yield;
    aperture.flora.remove(index);
    match yielded {
        Yield::Qi { amount } => {
            player.add_qi(amount, catalog);
        }
        Yield::DaoMark { element, amount } => player.add_dao_marks(element, amount),
    }
    info!(species = %species.name, %pos, "harvested");
    Ok(yielded)
}

/// Take the creature at `pos` for its yield
pub fn cull_fauna(
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    pos: GridPos,
) -> Result<Yield> {
    let index = aperture
        .fauna
        .iter()
        .position(|f| f.position == pos)
        .ok_or(GameError::InvalidPosition { x: pos.x, y: pos.y })?;
    let yielded = catalog
        .fauna_species(&aperture.fauna[index].species)
        .map(|s| s.harvest_yield)
        .ok_or(GameError::InvalidPosition { x: pos.x, y: pos.y })?;

    aperture.fauna.remove(index);
    match yielded {
        Yield::Qi { amount } => {
            player.add_qi(amount, catalog);
        }
        Yield::DaoMark { element, amount } => player.add_dao_marks(element, amount),
    }
    Ok(yielded)
}

/// Spend soul foundation to close the fissure at `pos`
pub fn seal_fissure(aperture: &mut ApertureState, config: &ApertureConfig, pos: GridPos) -> Result<()> {
    if !aperture.fissures().contains(&pos) {
        return Err(GameError::NoFissure { x: pos.x, y: pos.y });
    }
    if aperture.soul_foundation < config.seal_cost {
        return Err(GameError::InsufficientResource {
            resource: ResourceKind::SoulFoundation,
            required: config.seal_cost as i64,
            available: aperture.soul_foundation as i64,
        });
    }

    aperture.soul_foundation -= config.seal_cost;
    aperture.close_fissure(pos);
    aperture.adjust_stability(config.seal_stability_gain);
    info!(%pos, stability = aperture.stability, "fissure sealed");
    Ok(())
}
