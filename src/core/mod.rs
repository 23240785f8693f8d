pub mod config;
pub mod error;
pub mod rng;
pub mod types;

pub use config::{EventChoicePolicy, SimulationConfig};
pub use error::{GameError, LoadError, Result};
pub use rng::Mulberry32;
pub use types::{DaoElement, GridPos, ResourceKind, Tick};
