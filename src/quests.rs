//! Faction quests: hunt or gather a number of targets for a reward

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::types::{DaoElement, EnemyId, FactionId, FloraId};
use crate::data::Catalog;
use crate::factions::Faction;
use crate::player::PlayerState;

/// Relation gained with the issuing faction on completion
pub const QUEST_RELATION_GAIN: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestGoal {
    Hunt { enemy: EnemyId },
    Gather { flora: FloraId },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestReward {
    pub exp: u64,
    pub dao_marks: BTreeMap<DaoElement, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u32,
    pub title: String,
    pub goal: QuestGoal,
    pub amount: u32,
    #[serde(default)]
    pub completed: u32,
    pub reward: QuestReward,
    pub faction: FactionId,
}

impl Quest {
    pub fn is_complete(&self) -> bool {
        self.completed >= self.amount
    }
}

/// Something that can count toward a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestProgress<'a> {
    EnemyKilled(&'a EnemyId),
    ResourceGathered(&'a FloraId),
}

/// Draw a fresh hunt and gather quest from random factions
///
/// Ids are assigned from `next_id` upwards. Nothing is generated when the
/// catalog or faction list is too thin to fill a quest.
pub fn generate_quests<R: Rng>(
    day: u64,
    next_id: u32,
    catalog: &Catalog,
    factions: &[Faction],
    rng: &mut R,
) -> Vec<Quest> {
    let mut quests = Vec::new();

    if let (Some(enemy), Some(faction)) = (catalog.enemies.choose(rng), factions.choose(rng)) {
        quests.push(Quest {
            id: next_id,
            title: "Regional Hunt".to_string(),
            goal: QuestGoal::Hunt { enemy: enemy.id.clone() },
            amount: rng.gen_range(3..6),
            completed: 0,
            reward: QuestReward {
                exp: 200 + day * 10,
                dao_marks: BTreeMap::new(),
            },
            faction: faction.id,
        });
    }

    if let (Some(flora), Some(faction)) = (catalog.flora.choose(rng), factions.choose(rng)) {
        quests.push(Quest {
            id: next_id + quests.len() as u32,
            title: "Resource Gathering".to_string(),
            goal: QuestGoal::Gather { flora: flora.id.clone() },
            amount: rng.gen_range(2..6),
            completed: 0,
            reward: QuestReward {
                exp: 150,
                dao_marks: BTreeMap::from([(DaoElement::Life, 1)]),
            },
            faction: faction.id,
        });
    }

    quests
}

/// Count `progress` toward every matching open quest
pub fn record_progress(quests: &mut [Quest], progress: QuestProgress<'_>) {
    for quest in quests.iter_mut().filter(|q| !q.is_complete()) {
        let matches = match (&quest.goal, progress) {
            (QuestGoal::Hunt { enemy }, QuestProgress::EnemyKilled(killed)) => enemy == killed,
            (QuestGoal::Gather { flora }, QuestProgress::ResourceGathered(found)) => flora == found,
            _ => false,
        };
        if matches {
            quest.completed += 1;
        }
    }
}

/// Hand in a finished quest: pays the reward, improves relations with the
/// issuing faction and removes the quest. Returns the paid reward, or
/// `None` if the quest is unknown or unfinished.
pub fn turn_in_quest(
    quests: &mut Vec<Quest>,
    id: u32,
    player: &mut PlayerState,
    factions: &mut [Faction],
) -> Option<QuestReward> {
    let index = quests.iter().position(|q| q.id == id && q.is_complete())?;
    let quest = quests.remove(index);

    player.add_exp(quest.reward.exp);
    for (&element, &amount) in &quest.reward.dao_marks {
        player.add_dao_marks(element, amount);
    }
    if let Some(faction) = factions.iter_mut().find(|f| f.id == quest.faction) {
        faction.relation += QUEST_RELATION_GAIN;
    }
    info!(quest = %quest.title, exp = quest.reward.exp, "quest completed");
    Some(quest.reward)
}
