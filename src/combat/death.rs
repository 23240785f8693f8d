//! Death handling after a lost fight

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::aperture::ApertureState;
use crate::core::config::DeathConfig;
use crate::core::types::GridPos;
use crate::data::Catalog;
use crate::player::PlayerState;
use crate::world::SoulRemnant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathReport {
    pub restored_qi: i32,
    pub consecutive_deaths: u32,
    pub soul_wounded: bool,
    pub exp_lost: u64,
    pub remnant: Option<SoulRemnant>,
    /// Fissure torn open in the aperture by the trauma
    pub trauma_fissure: Option<GridPos>,
}

/// Restore the fallen player and apply the penalties of repeated deaths
///
/// From the `soul_wound_threshold`-th consecutive death onwards the player
/// is soul wounded and part of their experience is left behind as a
/// remnant at the spot where they fell. A locked aperture cannot suffer
/// trauma fissures.
pub fn handle_death<R: Rng>(
    player: &mut PlayerState,
    remnants: &mut Vec<SoulRemnant>,
    aperture: &mut ApertureState,
    catalog: &Catalog,
    config: &DeathConfig,
    rng: &mut R,
) -> DeathReport {
    player.consecutive_deaths += 1;
    player.total_deaths += 1;

    let restored_qi = (player.max_qi(catalog) as f32 * config.restore_fraction).floor() as i32;
    player.qi = restored_qi;

    let mut exp_lost = 0;
    let mut remnant = None;
    if player.consecutive_deaths >= config.soul_wound_threshold {
        player.soul_wounded = true;
        exp_lost = (player.exp as f64 * config.exp_loss_fraction).floor() as u64;
        if exp_lost > 0 {
            player.exp -= exp_lost;
            player.lost_exp += exp_lost;
            let dropped = SoulRemnant {
                position: player.position,
                exp: exp_lost,
            };
            remnants.push(dropped);
            remnant = Some(dropped);
        }
        warn!(deaths = player.consecutive_deaths, exp_lost, "soul wounded");
    }

    let mut trauma_fissure = None;
    if aperture.unlocked && rng.gen_bool(config.trauma_fissure_chance) {
        if let Some(&pos) = aperture.unfissured_cells().choose(rng) {
            if aperture.open_fissure(pos) {
                trauma_fissure = Some(pos);
            }
        }
    }

    info!(
        total_deaths = player.total_deaths,
        qi = player.qi,
        trauma = trauma_fissure.is_some(),
        "player fell"
    );

    DeathReport {
        restored_qi,
        consecutive_deaths: player.consecutive_deaths,
        soul_wounded: player.soul_wounded,
        exp_lost,
        remnant,
        trauma_fissure,
    }
}
