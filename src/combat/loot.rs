//! Post-victory loot rolls

use rand::Rng;
use tracing::info;

use crate::data::{Catalog, EnemyKind, LootDrop};
use crate::player::PlayerState;

/// Roll every entry on the enemy's table independently and apply the hits
///
/// An insight fragment the player already knows is worth nothing and is
/// left out of the result.
pub fn roll_loot<R: Rng>(
    enemy: &EnemyKind,
    player: &mut PlayerState,
    catalog: &Catalog,
    rng: &mut R,
) -> Vec<LootDrop> {
    let mut gained = Vec::new();
    for entry in &enemy.loot {
        if !rng.gen_bool(entry.chance.clamp(0.0, 1.0)) {
            continue;
        }
        match &entry.drop {
            LootDrop::DaoMark { element, amount } => {
                player.add_dao_marks(*element, *amount);
            }
            LootDrop::InsightFragment { insight } => {
                if !player.discover_insight(insight, catalog) {
                    continue;
                }
                info!(%insight, "insight fragment found");
            }
        }
        gained.push(entry.drop.clone());
    }
    gained
}
