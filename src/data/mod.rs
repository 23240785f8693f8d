//! Game data catalogs

pub mod catalog;

pub use catalog::{
    Catalog, EnemyKind, FaunaSpecies, FloraSpecies, Insight, LootDrop, LootEntry, Realm,
    RealmUnlock, Yield,
};
