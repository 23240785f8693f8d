//! The aperture: the player's personal micro-world with its own ecology

pub mod actions;
pub mod ecology;
pub mod events;
pub mod state;

pub use actions::{cull_fauna, harvest, seal_fissure};
pub use ecology::{advance_ecology, advance_ecology_ticks, EcologyEvent, EcologyReport};
pub use events::{
    resolve_event, trigger_random_event, EventChoice, EventCost, EventEffect, EventOutcome,
    EventResolution, EventTemplate,
};
pub use state::{init_grid, ApertureState, FaunaInstance, FloraInstance, MAX_STABILITY};
