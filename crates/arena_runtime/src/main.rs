//! Headless arena runner
//!
//! Loads `arena.toml` (or `$ARENA_CONFIG`), runs the simulation at a fixed
//! tick rate and reports how the run ended.
//!
//! Run with: cargo run -p arena_runtime
//!       or: ARENA_DIFFICULTY=hard ARENA_SEED=7 cargo run --bin arena

use arena_runtime::{ArenaSimulation, Collaborators, LogHud, SessionState, SimConfig};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let config = match SimConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    config.log_summary();

    let tick_rate = config.run.tick_rate;
    let max_seconds = config.run.max_seconds;

    let collaborators = Collaborators::headless().with_hud(Box::new(LogHud));
    let mut sim = match ArenaSimulation::new(config, collaborators) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to build simulation: {}", e);
            std::process::exit(1);
        }
    };

    let dt = 1.0 / tick_rate;
    sim.start();
    while sim.state() == SessionState::Playing && sim.game_time() < max_seconds {
        sim.tick(dt);
    }

    let stats = sim.stats();
    log::info!("=== Run Summary ===");
    log::info!("  Outcome: {:?}", sim.state());
    log::info!("  Wave reached: {}/{}", sim.director().wave(), sim.director().total_waves());
    log::info!("  Simulated time: {:.1}s", sim.game_time());
    log::info!(
        "  Enemies: {} spawned, {} killed, {} removed as corrupted",
        stats.enemies_spawned,
        stats.enemies_killed,
        stats.corrupted_removed
    );
    log::info!("  Recoveries: {}", stats.recoveries);
    log::info!("  Power-ups collected: {}", stats.power_ups_collected);
    log::info!("  Damage taken: {:.1}", stats.damage_taken);
    log::info!("===================");
}
