//! Warden - NPC patrol, dialogue, and combat simulation
//!
//! Runs a headless session: load settings and a scene, build a rapier world,
//! and let a scripted pilot walk up to the NPCs, talk, and fight.

mod pilot;
mod presenter;
mod scene;
mod settings;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use warden_core::GameTime;
use warden_game::{BehaviorState, Simulation};
use warden_physics::CharacterSpace;

use pilot::DemoPilot;
use presenter::{Presenter, PresenterMode};
use scene::Scene;
use settings::WardenSettings;

/// Lift bodies off the ground plane so capsules do not start embedded in it
const SPAWN_CLEARANCE: f32 = 0.05;

/// Headless NPC patrol, dialogue, and combat run
#[derive(Debug, Parser)]
#[command(name = "warden", version)]
struct Args {
    /// Print events as JSON lines instead of log lines
    #[arg(long)]
    json: bool,

    /// Scene file to load instead of the built-in outpost
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Number of ticks to run (overrides the settings file)
    #[arg(long)]
    ticks: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = WardenSettings::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    info!("Starting Warden...");
    if let Some(path) = WardenSettings::settings_path() {
        info!("Settings file: {:?}", path);
    }

    let scene = match args.scene.as_ref().or(settings.demo.scene.as_ref()) {
        Some(path) => Scene::load(path)?,
        None => Scene::builtin()?,
    };
    info!(
        "Scene '{}': {} NPCs, {} walls",
        scene.name,
        scene.npcs.len(),
        scene.walls.len()
    );

    let mut space = CharacterSpace::with_ground(scene.ground_height);
    for wall in &scene.walls {
        space.level.add_wall(wall.half_extents, wall.position);
    }
    space.sync();

    let lift = |p: Vec3| Vec3::new(p.x, p.y.max(scene.ground_height) + SPAWN_CLEARANCE, p.z);

    let mut sim = Simulation::new(settings.simulation.clone());
    let player_body = space.spawn_character(lift(scene.player.position));
    sim.spawn_player(player_body);
    for data in scene.npcs.iter().cloned() {
        let body = space.spawn_character(lift(data.position));
        sim.spawn_npc(data, body);
    }

    let mode = if args.json {
        PresenterMode::Json
    } else {
        PresenterMode::Log
    };
    let mut presenter = Presenter::new(mode, io::stdout().lock());
    let mut pilot = DemoPilot::new(settings.demo.choice, settings.demo.read_ticks);
    let mut time = GameTime::new(settings.simulation.time.clone());

    let total_ticks = args.ticks.unwrap_or(settings.demo.ticks);
    let frame = time.tick_delta();
    if frame <= 0.0 || time.config.time_scale <= 0.0 {
        anyhow::bail!("fixed_timestep and time_scale must be positive");
    }

    presenter.present(0, &sim.drain_events())?;
    while sim.tick_count() < u64::from(total_ticks) {
        // Headless: every frame is exactly one tick long
        time.update(frame);
        for _ in 0..time.fixed_steps() {
            let input = pilot.next_input(&mut sim, &space);
            sim.fixed_update(&input, &mut space, frame);
            space.sync();
            presenter.present(sim.tick_count(), &sim.drain_events())?;
        }
    }

    sim.teardown();
    presenter.present(sim.tick_count(), &sim.drain_events())?;

    let in_combat = sim.npcs().count_in_state(BehaviorState::InCombat);
    match sim.player() {
        Some(player) => info!(
            "Finished {} ticks: player health {}, {} of {} NPCs in combat",
            sim.tick_count(),
            player.health,
            in_combat,
            sim.npcs().count()
        ),
        None => warn!("Finished {} ticks without a player", sim.tick_count()),
    }
    Ok(())
}
