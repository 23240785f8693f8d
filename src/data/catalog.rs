//! Static game data: runes, species, enemies, realms and event templates
//!
//! The built-in catalog is compiled in; an alternative catalog can be
//! loaded from TOML. Catalog data is never mutated at runtime. A malformed
//! catalog is a programmer error and is rejected by `validate`.

use ahash::AHashSet;

use serde::{Deserialize, Serialize};

use crate::aperture::events::{EventChoice, EventCost, EventEffect, EventTemplate};
use crate::core::error::LoadError;
use crate::core::types::{DaoElement, EnemyId, FaunaId, FloraId, InsightId, ResourceKind, RuneId};
use crate::crafting::rune::{BaseRune, ModifierRune, RuneTag, VectorRune};

/// What a harvested plant or animal yields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum Yield {
    Qi { amount: i32 },
    DaoMark { element: DaoElement, amount: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloraSpecies {
    pub id: FloraId,
    pub name: String,
    /// Progress needed before the plant can be harvested
    pub growth_time: f32,
    #[serde(rename = "yield")]
    pub harvest_yield: Yield,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaunaSpecies {
    pub id: FaunaId,
    pub name: String,
    /// Reproduction progress needed before an offspring is spawned
    pub reproduces_in: f32,
    /// Health of every newly spawned creature
    pub base_health: u32,
    #[serde(rename = "yield")]
    pub harvest_yield: Yield,
}

/// A single loot roll on an enemy's table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub chance: f64,
    pub drop: LootDrop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum LootDrop {
    DaoMark { element: DaoElement, amount: u32 },
    InsightFragment { insight: InsightId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyKind {
    pub id: EnemyId,
    pub name: String,
    pub hp: i32,
    pub power: i32,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

/// Feature unlocked on reaching a realm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RealmUnlock {
    Aperture,
    AdvancedAperture,
    Subordinates,
    GrottoHeaven,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Realm {
    pub name: String,
    /// Experience needed to break through; `None` for the final realm
    pub exp_to_next: Option<u32>,
    pub max_qi: i32,
    #[serde(default)]
    pub unlocks: Vec<RealmUnlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub id: InsightId,
    pub name: String,
    /// Rune learned together with the insight
    pub unlocks: RuneId,
}

/// All static game data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub base_runes: Vec<BaseRune>,
    pub modifier_runes: Vec<ModifierRune>,
    pub vector_runes: Vec<VectorRune>,
    pub insights: Vec<Insight>,
    pub enemies: Vec<EnemyKind>,
    pub flora: Vec<FloraSpecies>,
    pub fauna: Vec<FaunaSpecies>,
    pub realms: Vec<Realm>,
    pub events: Vec<EventTemplate>,
}

impl Catalog {
    pub fn base_rune(&self, id: &RuneId) -> Option<&BaseRune> {
        self.base_runes.iter().find(|r| &r.id == id)
    }

    pub fn modifier_rune(&self, id: &RuneId) -> Option<&ModifierRune> {
        self.modifier_runes.iter().find(|r| &r.id == id)
    }

    pub fn vector_rune(&self, id: &RuneId) -> Option<&VectorRune> {
        self.vector_runes.iter().find(|r| &r.id == id)
    }

    pub fn insight(&self, id: &InsightId) -> Option<&Insight> {
        self.insights.iter().find(|i| &i.id == id)
    }

    pub fn enemy(&self, id: &EnemyId) -> Option<&EnemyKind> {
        self.enemies.iter().find(|e| &e.id == id)
    }

    pub fn flora_species(&self, id: &FloraId) -> Option<&FloraSpecies> {
        self.flora.iter().find(|f| &f.id == id)
    }

    pub fn fauna_species(&self, id: &FaunaId) -> Option<&FaunaSpecies> {
        self.fauna.iter().find(|f| &f.id == id)
    }

    /// Realm by index, saturating at the final realm
    pub fn realm(&self, index: usize) -> &Realm {
        let last = self.realms.len().saturating_sub(1);
        &self.realms[index.min(last)]
    }

    /// Parse a catalog from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, LoadError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate().map_err(LoadError::InvalidCatalog)?;
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check internal consistency of the catalog
    pub fn validate(&self) -> Result<(), String> {
        if self.realms.is_empty() {
            return Err("catalog needs at least one realm".into());
        }

        let mut rune_ids = AHashSet::new();
        let all_rune_ids = self
            .base_runes
            .iter()
            .map(|r| &r.id)
            .chain(self.modifier_runes.iter().map(|r| &r.id))
            .chain(self.vector_runes.iter().map(|r| &r.id));
        for id in all_rune_ids {
            if !rune_ids.insert(id) {
                return Err(format!("duplicate rune id {}", id));
            }
        }

        for insight in &self.insights {
            if !rune_ids.contains(&insight.unlocks) {
                return Err(format!(
                    "insight {} unlocks unknown rune {}",
                    insight.id, insight.unlocks
                ));
            }
        }

        let mut flora_ids = AHashSet::new();
        for species in &self.flora {
            if !flora_ids.insert(&species.id) {
                return Err(format!("duplicate flora id {}", species.id));
            }
            if species.growth_time <= 0.0 {
                return Err(format!("flora {} has non-positive growth time", species.id));
            }
        }

        let mut fauna_ids = AHashSet::new();
        for species in &self.fauna {
            if !fauna_ids.insert(&species.id) {
                return Err(format!("duplicate fauna id {}", species.id));
            }
            if species.reproduces_in <= 0.0 {
                return Err(format!("fauna {} has non-positive reproduction time", species.id));
            }
        }

        for enemy in &self.enemies {
            if enemy.hp <= 0 {
                return Err(format!("enemy {} has non-positive hp", enemy.id));
            }
            if enemy.loot.iter().any(|l| !(0.0..=1.0).contains(&l.chance)) {
                return Err(format!("enemy {} has a loot chance outside [0, 1]", enemy.id));
            }
        }

        for event in &self.events {
            if event.choices.len() < 2 {
                return Err(format!("event {} needs at least two choices", event.id));
            }
            if event.choices.iter().any(|c| c.weight == 0) {
                return Err(format!("event {} has a zero-weight choice", event.id));
            }
        }

        Ok(())
    }

    /// The catalog the game ships with
    pub fn builtin() -> Self {
        let catalog = Self {
            base_runes: vec![
                base_rune("b1", "Force Pulse", 10, 5, &[RuneTag::Force]),
                base_rune("b2", "Fireball", 15, 8, &[RuneTag::Fire, RuneTag::Projectile]),
                base_rune("b3", "Ice Lance", 15, 8, &[RuneTag::Water, RuneTag::Cold, RuneTag::Projectile]),
                base_rune("b4", "Healing Touch", -20, 12, &[RuneTag::Life, RuneTag::Light]),
            ],
            modifier_runes: vec![
                ModifierRune {
                    id: RuneId::new("m1"),
                    name: "Explosive".into(),
                    power_multiplier: 1.5,
                    cost_multiplier: 1.8,
                    tags: vec![RuneTag::Aoe],
                },
                ModifierRune {
                    id: RuneId::new("m2"),
                    name: "Chain".into(),
                    power_multiplier: 0.7,
                    cost_multiplier: 2.0,
                    tags: vec![RuneTag::MultiTarget],
                },
                ModifierRune {
                    id: RuneId::new("m3"),
                    name: "Life Drain".into(),
                    power_multiplier: 0.8,
                    cost_multiplier: 1.5,
                    tags: vec![RuneTag::Blood],
                },
            ],
            vector_runes: vec![
                vector_rune("v1", "Projectile", 1.0, &[RuneTag::Distance]),
                vector_rune("v2", "Aura", 2.5, &[RuneTag::Personal, RuneTag::Aoe]),
                vector_rune("v3", "Beam", 1.8, &[RuneTag::Channeled]),
            ],
            insights: vec![
                insight("i1", "Principle of Heat", "b2"),
                insight("i2", "Principle of Frost", "b3"),
                insight("i3", "Vital Essence", "b4"),
                insight("i4", "Force Vortex", "b1"),
            ],
            enemies: vec![
                EnemyKind {
                    id: EnemyId::new("e1"),
                    name: "Spirit Wolf".into(),
                    hp: 50,
                    power: 10,
                    loot: vec![LootEntry {
                        chance: 0.1,
                        drop: LootDrop::InsightFragment { insight: InsightId::new("i4") },
                    }],
                },
                EnemyKind {
                    id: EnemyId::new("e2"),
                    name: "Fire Salamander".into(),
                    hp: 80,
                    power: 20,
                    loot: vec![
                        LootEntry {
                            chance: 0.5,
                            drop: LootDrop::DaoMark { element: DaoElement::Fire, amount: 1 },
                        },
                        LootEntry {
                            chance: 0.2,
                            drop: LootDrop::InsightFragment { insight: InsightId::new("i1") },
                        },
                    ],
                },
                EnemyKind {
                    id: EnemyId::new("e3"),
                    name: "Frost Guardian".into(),
                    hp: 120,
                    power: 30,
                    loot: vec![
                        LootEntry {
                            chance: 0.5,
                            drop: LootDrop::DaoMark { element: DaoElement::Ice, amount: 1 },
                        },
                        LootEntry {
                            chance: 0.3,
                            drop: LootDrop::InsightFragment { insight: InsightId::new("i2") },
                        },
                    ],
                },
            ],
            flora: vec![
                FloraSpecies {
                    id: FloraId::new("f1"),
                    name: "Common Spirit Herb".into(),
                    growth_time: 10.0,
                    harvest_yield: Yield::Qi { amount: 5 },
                },
                FloraSpecies {
                    id: FloraId::new("f2"),
                    name: "Dancing Flame Flower".into(),
                    growth_time: 20.0,
                    harvest_yield: Yield::DaoMark { element: DaoElement::Fire, amount: 1 },
                },
                FloraSpecies {
                    id: FloraId::new("f3"),
                    name: "Frost Lotus".into(),
                    growth_time: 25.0,
                    harvest_yield: Yield::DaoMark { element: DaoElement::Ice, amount: 1 },
                },
            ],
            fauna: vec![
                FaunaSpecies {
                    id: FaunaId::new("fa1"),
                    name: "Jade Rabbit".into(),
                    reproduces_in: 20.0,
                    base_health: 100,
                    harvest_yield: Yield::Qi { amount: 10 },
                },
                FaunaSpecies {
                    id: FaunaId::new("fa2"),
                    name: "Fire Lion".into(),
                    reproduces_in: 50.0,
                    base_health: 100,
                    harvest_yield: Yield::DaoMark { element: DaoElement::Fire, amount: 5 },
                },
                FaunaSpecies {
                    id: FaunaId::new("fa3"),
                    name: "Ice Phoenix".into(),
                    reproduces_in: 60.0,
                    base_health: 100,
                    harvest_yield: Yield::DaoMark { element: DaoElement::Ice, amount: 5 },
                },
            ],
            realms: vec![
                Realm {
                    name: "Qi Refinement".into(),
                    exp_to_next: Some(800),
                    max_qi: 100,
                    unlocks: vec![],
                },
                Realm {
                    name: "Foundation Establishment".into(),
                    exp_to_next: Some(2000),
                    max_qi: 250,
                    unlocks: vec![RealmUnlock::Aperture],
                },
                Realm {
                    name: "Golden Core".into(),
                    exp_to_next: Some(5000),
                    max_qi: 600,
                    unlocks: vec![RealmUnlock::AdvancedAperture],
                },
                Realm {
                    name: "Nascent Soul".into(),
                    exp_to_next: Some(12000),
                    max_qi: 1500,
                    unlocks: vec![RealmUnlock::Subordinates],
                },
                Realm {
                    name: "Ascendant Immortal".into(),
                    exp_to_next: None,
                    max_qi: 4000,
                    unlocks: vec![RealmUnlock::GrottoHeaven],
                },
            ],
            events: builtin_events(),
        };

        if let Err(e) = catalog.validate() {
            panic!("built-in catalog is malformed: {}", e);
        }
        catalog
    }
}

fn base_rune(id: &str, name: &str, power: i32, cost: u32, tags: &[RuneTag]) -> BaseRune {
    BaseRune {
        id: RuneId::new(id),
        name: name.into(),
        power,
        cost,
        tags: tags.to_vec(),
    }
}

fn vector_rune(id: &str, name: &str, cost_multiplier: f64, tags: &[RuneTag]) -> VectorRune {
    VectorRune {
        id: RuneId::new(id),
        name: name.into(),
        cost_multiplier,
        tags: tags.to_vec(),
    }
}

fn insight(id: &str, name: &str, unlocks: &str) -> Insight {
    Insight {
        id: InsightId::new(id),
        name: name.into(),
        unlocks: RuneId::new(unlocks),
    }
}

fn builtin_events() -> Vec<EventTemplate> {
    vec![
        EventTemplate {
            id: "pest_invasion".into(),
            name: "Pest Invasion".into(),
            choices: vec![
                EventChoice {
                    label: "Purge the pests with qi".into(),
                    weight: 2,
                    cost: Some(EventCost { resource: ResourceKind::Qi, amount: 20 }),
                    effect: EventEffect::Stability { delta: 2.0 },
                },
                EventChoice {
                    label: "Let nature run its course".into(),
                    weight: 1,
                    cost: None,
                    effect: EventEffect::FloraLoss { count: 1 },
                },
            ],
        },
        EventTemplate {
            id: "spiritual_spring".into(),
            name: "Spiritual Spring Discovery".into(),
            choices: vec![
                EventChoice {
                    label: "Channel the spring into the aperture".into(),
                    weight: 1,
                    cost: Some(EventCost { resource: ResourceKind::SoulFoundation, amount: 30 }),
                    effect: EventEffect::TimeRate { delta: 0.1 },
                },
                EventChoice {
                    label: "Absorb the spring personally".into(),
                    weight: 2,
                    cost: None,
                    effect: EventEffect::Qi { delta: 25 },
                },
            ],
        },
        EventTemplate {
            id: "qi_storm".into(),
            name: "Qi Storm".into(),
            choices: vec![
                EventChoice {
                    label: "Anchor the storm".into(),
                    weight: 1,
                    cost: Some(EventCost { resource: ResourceKind::Qi, amount: 40 }),
                    effect: EventEffect::Stability { delta: 5.0 },
                },
                EventChoice {
                    label: "Endure the storm".into(),
                    weight: 1,
                    cost: None,
                    effect: EventEffect::Stability { delta: -8.0 },
                },
            ],
        },
    ]
}
