//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Position on a 2D grid (world or aperture)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Offset by (dx, dy); `None` if either coordinate would go negative
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Elemental affinity carried by dao marks and terraform marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaoElement {
    Fire,
    Ice,
    Life,
    Earth,
    Water,
}

impl DaoElement {
    pub const ALL: [DaoElement; 5] = [
        DaoElement::Fire,
        DaoElement::Ice,
        DaoElement::Life,
        DaoElement::Earth,
        DaoElement::Water,
    ];
}

/// Spendable resources checked by costed actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Qi,
    SoulFoundation,
    Experience,
    DaoMark(DaoElement),
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Qi => write!(f, "qi"),
            ResourceKind::SoulFoundation => write!(f, "soul foundation"),
            ResourceKind::Experience => write!(f, "experience"),
            ResourceKind::DaoMark(element) => write!(f, "{:?} dao marks", element),
        }
    }
}

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

catalog_id!(
    /// Catalog identifier for runes (e.g. "b1", "m2")
    RuneId
);
catalog_id!(
    /// Catalog identifier for flora species
    FloraId
);
catalog_id!(
    /// Catalog identifier for fauna species
    FaunaId
);
catalog_id!(
    /// Catalog identifier for enemy kinds
    EnemyId
);
catalog_id!(
    /// Catalog identifier for insights
    InsightId
);

/// Unique identifier for crafted abilities (sequential per player)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

/// Unique identifier for factions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactionId(pub u32);
