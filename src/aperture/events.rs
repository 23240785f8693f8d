//! Random aperture events
//!
//! Each template offers weighted choices. A choice's cost is checked before
//! anything is touched, so an event either applies its cost and effect
//! together or is skipped with no change at all.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aperture::state::ApertureState;
use crate::core::config::EventChoicePolicy;
use crate::core::types::ResourceKind;
use crate::data::Catalog;
use crate::player::PlayerState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub id: String,
    pub name: String,
    pub choices: Vec<EventChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub label: String,
    pub weight: u32,
    #[serde(default)]
    pub cost: Option<EventCost>,
    pub effect: EventEffect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventCost {
    pub resource: ResourceKind,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventEffect {
    Stability { delta: f32 },
    Qi { delta: i32 },
    /// Random plants wither
    FloraLoss { count: u32 },
    /// Permanent change to the aperture's time rate
    TimeRate { delta: f32 },
}

/// How an event played out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub event: String,
    pub resolution: EventResolution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventResolution {
    Applied {
        choice: String,
        effect: EventEffect,
        cost: Option<EventCost>,
    },
    /// Nothing was paid and nothing changed
    Skipped { choice: Option<String> },
}

fn available(resource: ResourceKind, aperture: &ApertureState, player: &PlayerState) -> i64 {
    match resource {
        ResourceKind::Qi => player.qi as i64,
        ResourceKind::SoulFoundation => aperture.soul_foundation as i64,
        ResourceKind::Experience => player.exp as i64,
        ResourceKind::DaoMark(element) => player.dao_marks(element) as i64,
    }
}

/// Whether the cost of a choice can be paid right now
pub fn can_afford(choice: &EventChoice, aperture: &ApertureState, player: &PlayerState) -> bool {
    match choice.cost {
        None => true,
        Some(cost) => available(cost.resource, aperture, player) >= cost.amount as i64,
    }
}

fn pay(cost: EventCost, aperture: &mut ApertureState, player: &mut PlayerState) {
    let amount = cost.amount;
    match cost.resource {
        ResourceKind::Qi => player.qi -= amount as i32,
        ResourceKind::SoulFoundation => aperture.soul_foundation -= amount,
        ResourceKind::Experience => player.exp -= amount as u64,
        ResourceKind::DaoMark(element) => {
            let remaining = player.dao_marks(element) - amount;
            player.dao_marks.insert(element, remaining);
        }
    }
}

fn apply_effect<R: Rng>(
    effect: EventEffect,
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    rng: &mut R,
) {
    match effect {
        EventEffect::Stability { delta } => aperture.adjust_stability(delta),
        EventEffect::Qi { delta } => {
            player.add_qi(delta, catalog);
        }
        EventEffect::FloraLoss { count } => {
            for _ in 0..count {
                if aperture.flora.is_empty() {
                    break;
                }
                let index = rng.gen_range(0..aperture.flora.len());
                let lost = aperture.flora.swap_remove(index);
                debug!(species = %lost.species, pos = %lost.position, "plant lost to event");
            }
        }
        EventEffect::TimeRate { delta } => {
            aperture.time_rate = (aperture.time_rate + delta).max(0.0);
        }
    }
}

fn pick_weighted<'a, R: Rng>(choices: &[&'a EventChoice], rng: &mut R) -> Option<&'a EventChoice> {
    let dist = WeightedIndex::new(choices.iter().map(|c| c.weight)).ok()?;
    Some(choices[dist.sample(rng)])
}

/// Resolve one template against the current state
pub fn resolve_event<R: Rng>(
    template: &EventTemplate,
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    policy: EventChoicePolicy,
    rng: &mut R,
) -> EventOutcome {
    let candidates: Vec<&EventChoice> = match policy {
        EventChoicePolicy::Weighted => template.choices.iter().collect(),
        EventChoicePolicy::Affordable => template
            .choices
            .iter()
            .filter(|c| can_afford(c, aperture, player))
            .collect(),
    };

    let resolution = match pick_weighted(&candidates, rng) {
        None => EventResolution::Skipped { choice: None },
        Some(choice) if !can_afford(choice, aperture, player) => {
            warn!(event = %template.name, choice = %choice.label, "event choice unaffordable, skipped");
            EventResolution::Skipped { choice: Some(choice.label.clone()) }
        }
        Some(choice) => {
            if let Some(cost) = choice.cost {
                pay(cost, aperture, player);
            }
            apply_effect(choice.effect, aperture, player, catalog, rng);
            EventResolution::Applied {
                choice: choice.label.clone(),
                effect: choice.effect,
                cost: choice.cost,
            }
        }
    };

    EventOutcome {
        event: template.name.clone(),
        resolution,
    }
}

/// Pick a template uniformly and resolve it. `None` if the catalog has no events.
pub fn trigger_random_event<R: Rng>(
    aperture: &mut ApertureState,
    player: &mut PlayerState,
    catalog: &Catalog,
    policy: EventChoicePolicy,
    rng: &mut R,
) -> Option<EventOutcome> {
    let template = catalog.events.choose(rng)?;
    Some(resolve_event(template, aperture, player, catalog, policy, rng))
}
