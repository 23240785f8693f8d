//! Player vitals, inventory and progression

pub mod realm;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{GameError, Result};
use crate::core::types::{AbilityId, DaoElement, GridPos, InsightId, ResourceKind, RuneId};
use crate::crafting::Ability;
use crate::data::Catalog;

pub use realm::{check_realm_advance, RealmAdvance};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub realm_index: usize,
    pub exp: u64,
    /// Qi doubles as combat vitality
    pub qi: i32,
    pub position: GridPos,
    pub dao_marks: BTreeMap<DaoElement, u32>,
    pub unlocked_runes: Vec<RuneId>,
    pub discovered_insights: Vec<InsightId>,
    pub abilities: Vec<Ability>,
    next_ability_id: u32,
    /// Deaths since the last victory
    pub consecutive_deaths: u32,
    pub total_deaths: u32,
    pub soul_wounded: bool,
    /// Experience lost to deaths and not yet recovered from soul remnants
    pub lost_exp: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            realm_index: 0,
            exp: 0,
            qi: 100,
            position: GridPos::new(15, 10),
            dao_marks: BTreeMap::from([
                (DaoElement::Fire, 5),
                (DaoElement::Ice, 3),
                (DaoElement::Life, 8),
            ]),
            unlocked_runes: ["b1", "b4", "m1", "v1"].into_iter().map(RuneId::new).collect(),
            discovered_insights: vec![InsightId::new("i1"), InsightId::new("i4")],
            abilities: Vec::new(),
            next_ability_id: 1,
            consecutive_deaths: 0,
            total_deaths: 0,
            soul_wounded: false,
            lost_exp: 0,
        }
    }
}

impl PlayerState {
    pub fn new(position: GridPos) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn max_qi(&self, catalog: &Catalog) -> i32 {
        catalog.realm(self.realm_index).max_qi
    }

    /// Add (or with a negative amount, drain) qi; never exceeds the realm's max
    pub fn add_qi(&mut self, amount: i32, catalog: &Catalog) -> i32 {
        let before = self.qi;
        self.qi = self.qi.saturating_add(amount).min(self.max_qi(catalog));
        self.qi - before
    }

    /// Deduct qi, or report that there is not enough
    pub fn spend_qi(&mut self, amount: i32) -> Result<()> {
        if self.qi < amount {
            return Err(GameError::InsufficientResource {
                resource: ResourceKind::Qi,
                required: amount as i64,
                available: self.qi as i64,
            });
        }
        self.qi -= amount;
        Ok(())
    }

    pub fn add_exp(&mut self, amount: u64) {
        self.exp = self.exp.saturating_add(amount);
    }

    pub fn spend_exp(&mut self, amount: u64) -> Result<()> {
        if self.exp < amount {
            return Err(GameError::InsufficientResource {
                resource: ResourceKind::Experience,
                required: amount as i64,
                available: self.exp as i64,
            });
        }
        self.exp -= amount;
        Ok(())
    }

    pub fn dao_marks(&self, element: DaoElement) -> u32 {
        self.dao_marks.get(&element).copied().unwrap_or(0)
    }

    pub fn add_dao_marks(&mut self, element: DaoElement, amount: u32) {
        *self.dao_marks.entry(element).or_insert(0) += amount;
    }

    pub fn spend_dao_marks(&mut self, element: DaoElement, amount: u32) -> Result<()> {
        let available = self.dao_marks(element);
        if available < amount {
            return Err(GameError::InsufficientResource {
                resource: ResourceKind::DaoMark(element),
                required: amount as i64,
                available: available as i64,
            });
        }
        self.dao_marks.insert(element, available - amount);
        Ok(())
    }

    pub fn has_rune(&self, id: &RuneId) -> bool {
        self.unlocked_runes.contains(id)
    }

    pub fn unlock_rune(&mut self, id: RuneId) {
        if !self.has_rune(&id) {
            self.unlocked_runes.push(id);
        }
    }

    pub fn knows_insight(&self, id: &InsightId) -> bool {
        self.discovered_insights.contains(id)
    }

    /// Learn an insight and the rune it teaches. Returns false if already known
    /// or not in the catalog.
    pub fn discover_insight(&mut self, id: &InsightId, catalog: &Catalog) -> bool {
        if self.knows_insight(id) {
            return false;
        }
        let Some(insight) = catalog.insight(id) else {
            return false;
        };
        self.discovered_insights.push(id.clone());
        self.unlock_rune(insight.unlocks.clone());
        true
    }

    /// Store a crafted ability, assigning it the next id
    pub fn add_ability(&mut self, mut ability: Ability) -> AbilityId {
        let id = AbilityId(self.next_ability_id.max(1));
        self.next_ability_id = id.0 + 1;
        ability.id = id;
        self.abilities.push(ability);
        id
    }

    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id == id)
    }
}
