//! Cultivation realm advancement

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::data::{Catalog, RealmUnlock};
use crate::player::PlayerState;

/// A breakthrough into a new realm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmAdvance {
    pub realm_index: usize,
    pub realm_name: String,
    pub unlocks: Vec<RealmUnlock>,
}

/// Advance through every realm the player's experience now covers.
///
/// Each breakthrough consumes that realm's `exp_to_next` and refills qi to
/// the new realm's maximum. The final realm never advances.
pub fn check_realm_advance(player: &mut PlayerState, catalog: &Catalog) -> Vec<RealmAdvance> {
    let mut advances = Vec::new();

    while player.realm_index + 1 < catalog.realms.len() {
        let Some(threshold) = catalog.realm(player.realm_index).exp_to_next else {
            break;
        };
        if player.exp < threshold as u64 {
            break;
        }

        player.exp -= threshold as u64;
        player.realm_index += 1;

        let realm = catalog.realm(player.realm_index);
        player.qi = realm.max_qi;

        info!(realm = %realm.name, "realm breakthrough");
        advances.push(RealmAdvance {
            realm_index: player.realm_index,
            realm_name: realm.name.clone(),
            unlocks: realm.unlocks.clone(),
        });
    }

    advances
}
