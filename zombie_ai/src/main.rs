// zombie_ai/src/main.rs
//
// Headless horde simulation: a few survivors, a mixed horde and some walls,
// stepped at the fixed tick rate with a periodic summary in the log.

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use zombie_ai::core::constants::{DEFAULT_WORLD_SEED, SIMULATION_TICK_RATE, TICK_DURATION};
use zombie_ai::core::types::{Aabb, Vec2, ZombieState};
use zombie_ai::entities::zombie::ZombieProfile;
use zombie_ai::operational::monitoring::metrics::{init_logging, MetricsSystem};
use zombie_ai::{AiConfig, HordeWorld};

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

const SIMULATED_SECONDS: u64 = 60;
const HORDE_SIZE: usize = 200;

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("ZOMBIE_AI_CONFIG").map(PathBuf::from))
}

fn load_config() -> anyhow::Result<AiConfig> {
    match config_path() {
        Some(path) => AiConfig::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            info!("No configuration file given, using defaults");
            Ok(AiConfig::default())
        }
    }
}

fn metrics_addr() -> anyhow::Result<Option<SocketAddr>> {
    match std::env::var("ZOMBIE_AI_METRICS_ADDR") {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid ZOMBIE_AI_METRICS_ADDR '{}'", raw)),
        Err(_) => Ok(None),
    }
}

fn populate(world: &mut HordeWorld) -> anyhow::Result<()> {
    let survivors = [Vec2::new(0.0, 0.0), Vec2::new(30.0, -20.0), Vec2::new(-60.0, 45.0)];
    for position in survivors {
        world.spawn_player(position)?;
    }

    world.add_obstacle(Aabb::new(Vec2::new(10.0, -15.0), Vec2::new(12.0, 15.0)), true);
    world.add_obstacle(Aabb::new(Vec2::new(-40.0, 20.0), Vec2::new(-10.0, 22.0)), true);
    world.add_obstacle(Aabb::new(Vec2::new(50.0, 50.0), Vec2::new(70.0, 70.0)), false);

    let profiles = ZombieProfile::builtin();
    // Golden-angle spiral: deterministic, evenly spread spawn ring.
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    for i in 0..HORDE_SIZE {
        let radius = 20.0 + 150.0 * (i as f32 / HORDE_SIZE as f32).sqrt();
        let position = Vec2::from_polar(radius, golden * i as f32);
        let profile = profiles[i % profiles.len()].clone();
        world.spawn_zombie(profile, position)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {:?}", e);
        return Err(e);
    }

    info!(
        "{} {} starting up ({}, rustc {})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::PROFILE,
        built_info::RUSTC_VERSION
    );

    let metrics = MetricsSystem::new(metrics_addr()?)?;
    let config = load_config()?;
    let mut world = HordeWorld::new(config, DEFAULT_WORLD_SEED).context("Failed to build horde world")?;
    populate(&mut world)?;
    info!("Spawned {} zombies; simulating {}s at {} Hz", world.zombie_count(), SIMULATED_SECONDS, SIMULATION_TICK_RATE);

    let total_ticks = SIMULATED_SECONDS * SIMULATION_TICK_RATE;
    let started = Instant::now();
    let mut slowest = Duration::ZERO;

    for _ in 0..total_ticks {
        let tick_start = Instant::now();
        let report = world.tick(TICK_DURATION);
        let elapsed = tick_start.elapsed();
        slowest = slowest.max(elapsed);

        if elapsed > TICK_DURATION {
            warn!("[Frame {}] tick took {:?} (budget {:?})", report.frame, elapsed, TICK_DURATION);
        }
        if report.ai.failed > 0 {
            error!("[Frame {}] {} agent updates failed", report.frame, report.ai.failed);
        }
        if report.frame % SIMULATION_TICK_RATE == 0 {
            metrics.record_uptime();
            info!(
                "[Frame {}] t={:.0}s zombies={} idle={} wander={} hunt={} attack={} flee={} group={} lod={:?}",
                report.frame,
                report.now.as_secs_f32(),
                report.zombies,
                report.count(ZombieState::Idle),
                report.count(ZombieState::Wandering),
                report.count(ZombieState::Hunting),
                report.count(ZombieState::Attacking),
                report.count(ZombieState::Fleeing),
                report.count(ZombieState::Grouping),
                report.ai.lod_counts,
            );
        }
    }

    info!(
        "Simulation finished: {} ticks in {:?} (slowest tick {:?})",
        total_ticks,
        started.elapsed(),
        slowest
    );
    Ok(())
}
