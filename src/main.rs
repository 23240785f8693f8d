//! Apotheosis - headless runner
//!
//! Generates a world, opens the aperture, lets it run for a while and then
//! sends the player against every enemy kind once. Prints a summary.

use std::path::PathBuf;

use apotheosis::advisor::Tactic;
use apotheosis::aperture::EcologyEvent;
use apotheosis::combat::CombatOutcome;
use apotheosis::core::config::SimulationConfig;
use apotheosis::core::error::LoadError;
use apotheosis::crafting::RuneSelection;
use apotheosis::data::Catalog;
use apotheosis::simulation::{GameEvent, Simulation};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Apotheosis runner
#[derive(Parser, Debug)]
#[command(name = "apotheosis")]
#[command(about = "Run the cultivation world simulation without a UI")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Game ticks to simulate before the fights
    #[arg(long, default_value_t = 240)]
    ticks: u64,

    /// Simulation config (TOML); defaults apply to missing keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Catalog override (TOML)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Write the final snapshot here
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FightSummary {
    enemy: String,
    advised: Tactic,
    outcome: CombatOutcome,
    turns: u32,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    day: u64,
    realm: String,
    qi: i32,
    exp: u64,
    flora: usize,
    fauna: usize,
    births: usize,
    stability: f32,
    fissures: usize,
    fights: Vec<FightSummary>,
}

fn main() -> Result<(), LoadError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("apotheosis=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => Catalog::load_from_toml(path)?,
        None => Catalog::builtin(),
    };

    let mut sim = Simulation::new_game(seed, config, catalog)?;

    // Enough to break through into the realm that opens the aperture
    let first_breakthrough = sim.catalog().realm(0).exp_to_next.unwrap_or(0);
    sim.state.player.add_exp(u64::from(first_breakthrough));
    sim.check_realm_advance();

    let ability = match sim.craft(&RuneSelection::new("b1", "m1", "v1")) {
        Ok(GameEvent::AbilityCrafted { id, .. }) => Some(id),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(%err, "could not craft the starting ability");
            None
        }
    };

    let mut births = 0;
    for _ in 0..args.ticks {
        for event in sim.run_game_tick() {
            if let GameEvent::Ecology(EcologyEvent::FaunaBorn { .. }) = event {
                births += 1;
            }
        }
    }

    let enemies: Vec<_> = sim.catalog().enemies.iter().map(|e| e.id.clone()).collect();
    let mut fights = Vec::new();
    for enemy in &enemies {
        let Some(advice) = sim.advise(enemy) else {
            continue;
        };
        for event in sim.engage_enemy(enemy, ability) {
            if let GameEvent::Combat(report) = event {
                fights.push(FightSummary {
                    enemy: enemy.to_string(),
                    advised: advice.tactic,
                    outcome: report.outcome,
                    turns: report.turns,
                });
            }
        }
    }

    if let Some(path) = &args.save {
        sim.state.save(path)?;
    }

    let state = &sim.state;
    let summary = RunSummary {
        seed,
        ticks: state.time.tick,
        day: state.time.day,
        realm: sim.catalog().realm(state.player.realm_index).name.clone(),
        qi: state.player.qi,
        exp: state.player.exp,
        flora: state.aperture.flora.len(),
        fauna: state.aperture.fauna.len(),
        births,
        stability: state.aperture.stability,
        fissures: state.aperture.fissures().len(),
        fights,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("=== APOTHEOSIS ===");
        println!("Seed {} | day {} | tick {}", summary.seed, summary.day, summary.ticks);
        println!(
            "Realm: {} | Qi: {} | Exp: {}",
            summary.realm, summary.qi, summary.exp
        );
        println!(
            "Aperture: {} flora, {} fauna ({} born), stability {:.1}, {} fissures",
            summary.flora, summary.fauna, summary.births, summary.stability, summary.fissures
        );
        for fight in &summary.fights {
            println!(
                "  vs {:<6} advised {:?}: {:?} after {} turns",
                fight.enemy, fight.advised, fight.outcome, fight.turns
            );
        }
    }

    Ok(())
}
