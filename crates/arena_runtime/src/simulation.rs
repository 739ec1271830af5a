//! Arena simulation context
//!
//! [`ArenaSimulation`] owns everything that changes during a run: the physics
//! world, the obstacle cache, the enemy roster, the wave director, the player
//! and the RNG. [`ArenaSimulation::tick`] runs one frame in a fixed order:
//!
//! 1. clocks and the player damage cooldown
//! 2. physics step
//! 3. player update and fall check
//! 4. wave director, with spawn orders resolved through the spawn solver
//! 5. power-up spawning, collection and buff timers
//! 6. enemy locomotion, contact damage and the enemy kill plane
//! 7. boss attacks
//! 8. cleanup of dead and corrupted enemies
//!
//! Enemies are advanced in one pass and compacted in a second, so nothing is
//! removed while the roster is being walked.

use arena_ai::{solve_spawn, Agent, LocomotionContext, SpawnQuery};
use arena_combat::{
    profile_for_wave, BossAttackState, BossPose, DamageInfo, DamageSource, Health,
    KamikazeBlast, PlayerDamageGate, ENEMY_KILL_HEIGHT, LETHAL_DAMAGE, PLAYER_FALL_HEIGHT,
};
use arena_core::{Archetype, ArenaRng, EnemyId};
use arena_physics::{
    ColliderDesc, ColliderShape, CollisionGroups, ObstacleIndexState, PhysicsMaterial,
    PhysicsWorld, RigidBodyDesc,
};
use arena_waves::{DirectorEvent, RemovalCause, SpawnOrder, WaveDirector, WavePhase};
use glam::Vec3;
use rand::SeedableRng;

use crate::collaborators::{AudioCues, Collaborators, EndScreen, Hud, SoundCue, VisualLayer};
use crate::config::SimConfig;
use crate::enemy::{BossEncounter, Enemy, EnemyKind, EnemyRoster};
use crate::error::Result;
use crate::level::{build_arena, ArenaLayout};
use crate::player::{HeadlessPlayer, PlayerAgent};
use crate::powerup::{
    place_power_up, PlayerBuffs, PowerUp, PowerUpKind, PowerUpTimer, HEALTH_RESTORE,
};

/// Longest frame the simulation will integrate in one tick
pub const MAX_TICK_DT: f32 = 0.1;
/// Minimum spacing between two accepted restarts
pub const RESTART_DEBOUNCE_MS: f64 = 350.0;
/// Linear damping on enemy bodies
const ENEMY_LINEAR_DAMPING: f32 = 0.3;

/// Where the run stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Playing,
    GameOver,
    Victory,
}

/// Running totals for one session, cleared on restart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    pub corrupted_removed: u32,
    pub recoveries: u32,
    pub damage_taken: f32,
    pub power_ups_collected: u32,
}

/// The whole combat simulation
pub struct ArenaSimulation {
    config: SimConfig,
    physics: PhysicsWorld,
    obstacles: ObstacleIndexState,
    layout: ArenaLayout,
    roster: EnemyRoster,
    director: WaveDirector,
    player: Box<dyn PlayerAgent>,
    damage_gate: PlayerDamageGate,
    blast: KamikazeBlast,
    power_ups: Vec<PowerUp>,
    power_up_timer: PowerUpTimer,
    buffs: PlayerBuffs,
    /// The boss whose health the HUD bar shows
    boss_bar: Option<EnemyId>,
    visuals: Box<dyn VisualLayer>,
    audio: Box<dyn AudioCues>,
    hud: Box<dyn Hud>,
    rng: ArenaRng,
    state: SessionState,
    /// Wall time, runs in every state
    session_time: f32,
    /// Simulated play time, frozen outside [`SessionState::Playing`]
    game_time: f32,
    restart_in_progress: bool,
    last_restart_at: Option<f64>,
    stats: SessionStats,
}

impl ArenaSimulation {
    /// Build the arena and the player; call [`ArenaSimulation::start`] to begin wave 1
    pub fn new(config: SimConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => arena_core::seeded_rng(seed),
            None => ArenaRng::from_entropy(),
        };

        let mut physics = PhysicsWorld::new(config.physics.clone())?;
        let layout = build_arena(&mut physics, &mut rng);
        let mut player = HeadlessPlayer::spawn(&config.player, &mut physics);

        let tuning = config.tuning();
        let damage_gate = PlayerDamageGate::new(tuning.player_damage_taken_scale)?;
        let buffs = PlayerBuffs::new(tuning.player_speed_scale);
        player.set_speed_multiplier(buffs.speed_multiplier());
        let power_up_timer = PowerUpTimer::new(tuning.power_up_interval_scale, &mut rng);
        let Collaborators { visuals, audio, hud } = collaborators;

        log::info!(
            "Simulation ready: {} difficulty, {} static boxes",
            config.difficulty,
            layout.static_boxes
        );

        Ok(Self {
            director: WaveDirector::new(tuning),
            config,
            physics,
            obstacles: ObstacleIndexState::new(),
            layout,
            roster: EnemyRoster::new(),
            player: Box::new(player),
            damage_gate,
            blast: KamikazeBlast::default(),
            power_ups: Vec::new(),
            power_up_timer,
            buffs,
            boss_bar: None,
            visuals,
            audio,
            hud,
            rng,
            state: SessionState::Playing,
            session_time: 0.0,
            game_time: 0.0,
            restart_in_progress: false,
            last_restart_at: None,
            stats: SessionStats::default(),
        })
    }

    /// Replace the built-in headless player
    ///
    /// The previous player's physics body stays in the world.
    pub fn with_player(mut self, mut player: Box<dyn PlayerAgent>) -> Self {
        player.set_speed_multiplier(self.buffs.speed_multiplier());
        self.player = player;
        self
    }

    /// Begin wave 1
    pub fn start(&mut self) {
        self.state = SessionState::Playing;
        self.director.start_wave(arena_waves::START_WAVE, &mut self.rng);
        self.dispatch_director_events();
        self.publish_hud();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn director(&self) -> &WaveDirector {
        &self.director
    }

    pub fn roster(&self) -> &EnemyRoster {
        &self.roster
    }

    pub fn player(&self) -> &dyn PlayerAgent {
        self.player.as_ref()
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn layout(&self) -> &ArenaLayout {
        &self.layout
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Pickups waiting to be collected
    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn buffs(&self) -> &PlayerBuffs {
        &self.buffs
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn session_time(&self) -> f32 {
        self.session_time
    }

    /// Advance the simulation by one frame
    pub fn tick(&mut self, raw_dt: f32) {
        let dt = raw_dt.clamp(0.0, MAX_TICK_DT);
        self.session_time += dt;
        if self.state != SessionState::Playing {
            return;
        }
        self.game_time += dt;
        self.damage_gate.tick(dt);

        self.physics.step(dt);

        self.player.update(dt, &mut self.physics);
        if self.player.position().y < PLAYER_FALL_HEIGHT && self.player.is_alive() {
            log::info!("Player fell out of the arena");
            self.hurt_player(DamageInfo::new(LETHAL_DAMAGE, DamageSource::Fall));
        }

        self.director.tick(dt, self.roster.len(), &mut self.rng);
        self.dispatch_director_events();
        self.update_power_ups(dt);

        self.advance_enemies(dt);
        self.player_fire(dt);
        self.advance_bosses(dt);
        self.cleanup_enemies();

        // Removals can complete the wave or raise victory on the next director tick
        self.dispatch_director_events();
        self.publish_hud();

        if self.state == SessionState::Playing && !self.player.is_alive() {
            self.finish(SessionState::GameOver);
        }
    }

    /// Damage an enemy from outside the simulation, e.g. a weapon hit
    ///
    /// Returns false when the id no longer names a live enemy.
    pub fn damage_enemy(&mut self, id: EnemyId, amount: f32) -> bool {
        match self.roster.get_mut(id) {
            Some(enemy) if !enemy.is_dead() => {
                let (_, died) = enemy.health.apply_damage(amount);
                if died {
                    log::debug!("Enemy {} ({}) killed", id, enemy.archetype());
                }
                true
            }
            _ => false,
        }
    }

    /// Reset the run and start wave 1 again
    ///
    /// `now_ms` is the caller's clock. Requests made while a restart is
    /// running, or within [`RESTART_DEBOUNCE_MS`] of the last accepted one,
    /// are ignored and return false.
    pub fn request_restart(&mut self, now_ms: f64) -> bool {
        if self.restart_in_progress {
            return false;
        }
        if let Some(last) = self.last_restart_at {
            if now_ms - last < RESTART_DEBOUNCE_MS {
                log::debug!("Restart ignored, {:.0} ms since the last one", now_ms - last);
                return false;
            }
        }

        self.restart_in_progress = true;
        self.last_restart_at = Some(now_ms);
        self.restart();
        self.restart_in_progress = false;
        true
    }

    fn restart(&mut self) {
        log::info!("Restarting run");

        for enemy in self.roster.clear() {
            self.release_enemy_resources(&enemy);
        }
        self.boss_bar = None;
        self.hud.hide_boss_bar();

        for pickup in std::mem::take(&mut self.power_ups) {
            if let Some(visual) = pickup.visual {
                self.visuals.remove_model(visual);
            }
        }
        self.power_up_timer.reset(&mut self.rng);
        self.buffs.reset();
        self.player.set_speed_multiplier(self.buffs.speed_multiplier());

        let spawn = self.config.player.spawn_position();
        if let Err(e) = self.player.reset(spawn, &mut self.physics) {
            log::warn!("Player reset failed: {}", e);
        }

        self.damage_gate.reset();
        self.director.reset();
        self.game_time = 0.0;
        self.stats = SessionStats::default();
        self.start();
    }

    fn finish(&mut self, state: SessionState) {
        if self.state != SessionState::Playing {
            return;
        }
        self.state = state;
        let screen = match state {
            SessionState::Victory => EndScreen::Victory,
            _ => EndScreen::GameOver,
        };
        self.hud.show_end_screen(screen);
        log::info!(
            "Run ended: {:?} on wave {} after {:.1}s",
            state,
            self.director.wave(),
            self.game_time
        );
    }

    fn dispatch_director_events(&mut self) {
        for event in self.director.drain_events() {
            match event {
                DirectorEvent::ShowOverlay { title, subtitle } => {
                    self.hud.show_overlay(&title, &subtitle);
                }
                DirectorEvent::HideOverlay => self.hud.hide_overlay(),
                DirectorEvent::WaveCounter { wave, total } => {
                    self.hud.set_wave_counter(wave, total);
                }
                DirectorEvent::PhaseChanged { from, to } => {
                    log::debug!("Wave phase {:?} -> {:?}", from, to);
                }
                DirectorEvent::ArenaPhase(phase) => self.visuals.set_arena_phase(phase),
                // A boss already on the bar keeps it until it is removed
                DirectorEvent::ShowBossBar { name } => {
                    if self.boss_bar.is_none() {
                        self.hud.show_boss_bar(name);
                    }
                }
                DirectorEvent::Cue(cue) => self.audio.play(cue.into()),
                DirectorEvent::Spawn(order) => {
                    if let Err(e) = self.spawn_enemy(&order) {
                        log::warn!("Failed to spawn {}: {}", order.archetype, e);
                    }
                }
                DirectorEvent::Victory => self.finish(SessionState::Victory),
            }
        }
    }

    /// Place and register one enemy, then confirm it with the director
    fn spawn_enemy(&mut self, order: &SpawnOrder) -> Result<EnemyId> {
        let player = self.player.position();
        let live = self.roster.positions();
        let obstacles = self.obstacles.obstacles(&self.physics);
        let placement = solve_spawn(
            &SpawnQuery {
                archetype: order.archetype,
                is_boss: order.is_boss,
                player,
                live_enemies: &live,
                obstacles,
            },
            &mut self.rng,
        );

        let kind = if order.is_boss {
            let profile = order
                .profile
                .unwrap_or_else(|| profile_for_wave(self.director.wave()));
            let attack = BossAttackState::from_overrides(&profile.laser, &mut self.rng)?;
            EnemyKind::Boss(BossEncounter { profile, attack })
        } else {
            EnemyKind::Regular
        };

        let id = self.roster.allocate()?;
        let position = placement.position;

        let body = self.physics.create_rigid_body(
            RigidBodyDesc::dynamic()
                .with_position(position)
                .with_mass(order.archetype.body_mass(order.is_boss))
                .with_linear_damping(ENEMY_LINEAR_DAMPING)
                .with_locked_rotations()
                .with_can_sleep(false),
        );
        self.physics.create_collider(
            ColliderDesc::new(ColliderShape::sphere(order.radius))
                .with_material(PhysicsMaterial::frictionless())
                .with_collision_groups(CollisionGroups::enemy())
                .with_user_data(u128::from(id.to_bits())),
            Some(body),
        );

        let profile = match &kind {
            EnemyKind::Boss(encounter) => Some(encounter.profile),
            EnemyKind::Regular => None,
        };
        let visual = self.visuals.spawn_model(id, order.archetype, profile);
        if visual.is_none() {
            log::warn!("No model for enemy {} ({})", id, order.archetype);
        }

        let agent = Agent::new(order.archetype, order.is_boss, order.radius, position, &mut self.rng)
            .with_speed_multiplier(order.speed_multiplier);

        self.roster.insert(Enemy {
            id,
            agent,
            health: Health::new(order.health),
            contact_damage: order.damage,
            kind,
            body: Some(body),
            visual,
        });
        self.director.confirm_spawn(order, id);
        self.stats.enemies_spawned += 1;
        if order.is_boss && self.boss_bar.is_none() {
            self.boss_bar = Some(id);
        }

        log::debug!(
            "Spawned {}{} {} at ({:.1}, {:.1}, {:.1}) via {:?}",
            if order.is_boss { "boss " } else { "" },
            order.archetype,
            id,
            position.x,
            position.y,
            position.z,
            placement.stage
        );
        Ok(id)
    }

    /// Locomotion, contact damage and the kill plane for every enemy
    fn advance_enemies(&mut self, dt: f32) {
        // Pull physics state first so every agent sees this frame's neighbors
        for enemy in self.roster.iter_mut() {
            if enemy.is_dead() || enemy.is_corrupted() {
                continue;
            }
            let Some(body) = enemy.body else {
                continue;
            };
            let synced = self.physics.body_position(body).and_then(|position| {
                self.physics
                    .body_linear_velocity(body)
                    .map(|velocity| (position, velocity))
            });
            match synced {
                Ok((position, velocity)) => {
                    enemy.agent.body.position = position;
                    enemy.agent.body.velocity = velocity;
                }
                Err(e) => {
                    log::warn!("Enemy {} lost its body: {}", enemy.id, e);
                    enemy.body = None;
                }
            }
        }

        let neighbors = self.roster.positions();
        let player = self.player.position();
        self.obstacles.obstacles(&self.physics);
        let ctx = LocomotionContext {
            dt,
            player: Some(player),
            neighbors: &neighbors,
            obstacles: self.obstacles.cached(),
            tuning: &self.config.locomotion,
        };

        let mut hits = Vec::new();
        for enemy in self.roster.iter_mut() {
            if enemy.is_dead() || enemy.is_corrupted() {
                continue;
            }
            let Some(body) = enemy.body else {
                continue;
            };

            let before = enemy.agent.body.position;
            let outcome = arena_ai::tick(&mut enemy.agent, &ctx, &mut self.rng);
            if let Some(recovery) = outcome.recovery {
                self.stats.recoveries += 1;
                log::debug!("Enemy {} recovery: {:?}", enemy.id, recovery);
            }

            // Only recoveries move the body directly; normal motion goes through velocity
            let after = enemy.agent.body.position;
            let mut written = Ok(());
            if after != before {
                written = self.physics.set_body_position(body, after);
            }
            if written.is_ok() {
                written = self.physics.set_body_linear_velocity(body, enemy.agent.body.velocity);
            }
            if let Err(e) = written {
                log::warn!("Enemy {} lost its body: {}", enemy.id, e);
                enemy.body = None;
                continue;
            }

            if let Some(visual) = enemy.visual {
                self.visuals
                    .set_transform(visual, enemy.visual_position(), enemy.agent.state.yaw);
            }

            let dist = enemy.visual_position().distance(player);
            let contact = arena_combat::contact_hit(enemy.contact_damage, enemy.agent.size(), dist);
            if let Some(hit) = contact {
                hits.push(hit.with_enemy(enemy.id));
            }

            if enemy.position().y < ENEMY_KILL_HEIGHT {
                log::debug!("Enemy {} fell out of the arena", enemy.id);
                enemy.health.apply_damage(LETHAL_DAMAGE);
            }
        }

        for hit in hits {
            self.hurt_player(hit);
        }
    }

    fn advance_bosses(&mut self, dt: f32) {
        let target = self.player.position();
        let mut hits = Vec::new();

        for enemy in self.roster.iter_mut() {
            if enemy.is_dead() || enemy.is_corrupted() {
                continue;
            }
            let pose = BossPose {
                center: enemy.visual_position(),
                yaw: enemy.agent.state.yaw,
                radius: enemy.agent.radius,
            };
            let (id, visual) = (enemy.id, enemy.visual);
            let (current, max) = (enemy.health.current, enemy.health.max);
            let Some(boss) = enemy.boss_mut() else {
                continue;
            };

            if self.boss_bar == Some(id) {
                self.hud.update_boss_bar(current, max);
            }
            let frame = boss.attack.tick(dt, &pose, target, &mut self.rng);

            if let Some(visual) = visual {
                self.visuals.set_eye_glow(visual, frame.glow);
                match &frame.beams {
                    Some(beams) => self.visuals.show_beams(visual, beams, frame.power),
                    None => self.visuals.hide_beams(visual),
                }
            }
            if frame.damage > 0.0 {
                hits.push(DamageInfo::new(frame.damage, DamageSource::Laser).with_enemy(id));
            }
        }

        for hit in hits {
            self.hurt_player(hit);
        }
    }

    /// Remove dead and corrupted enemies and credit them to the wave
    fn cleanup_enemies(&mut self) {
        let removed = self
            .roster
            .drain_where(|e| e.is_dead() || e.is_corrupted());

        for enemy in removed {
            let cause = if enemy.is_dead() {
                RemovalCause::Killed
            } else {
                RemovalCause::Corrupted
            };

            if self.boss_bar == Some(enemy.id) {
                self.hand_off_boss_bar();
            }

            if cause == RemovalCause::Killed
                && !enemy.is_corrupted()
                && enemy.archetype() == Archetype::Kamikaze
            {
                let center = enemy.visual_position();
                self.visuals.explosion(center);
                self.audio.play(SoundCue::Explosion);
                if let Some(hit) = self.blast.hit(center, self.player.position()) {
                    self.hurt_player(hit.with_enemy(enemy.id));
                }
            }

            self.release_enemy_resources(&enemy);
            self.director.record_enemy_removed(enemy.id, cause);
            match cause {
                RemovalCause::Killed => self.stats.enemies_killed += 1,
                RemovalCause::Corrupted => self.stats.corrupted_removed += 1,
            }
        }
    }

    /// Give the boss bar to the next live boss, or hide it
    fn hand_off_boss_bar(&mut self) {
        let next = self.roster.iter().find_map(|e| {
            e.boss()
                .map(|boss| (e.id, boss.profile.name, e.health.current, e.health.max))
        });
        match next {
            Some((id, name, current, max)) => {
                log::debug!("Boss bar passes to {}", id);
                self.boss_bar = Some(id);
                self.hud.show_boss_bar(name);
                self.hud.update_boss_bar(current, max);
            }
            None => {
                self.boss_bar = None;
                self.hud.hide_boss_bar();
            }
        }
    }

    /// Spawn, collect and expire pickups and buffs
    ///
    /// The spawn timer only runs while a wave is active.
    fn update_power_ups(&mut self, dt: f32) {
        let active = self.director.phase() == WavePhase::Active;
        if active && self.power_up_timer.tick(dt, &mut self.rng) {
            self.spawn_power_up();
        }

        let player = self.player.position();
        let (collected, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.power_ups)
            .into_iter()
            .partition(|pickup| pickup.in_reach(player));
        self.power_ups = waiting;
        for pickup in collected {
            self.collect_power_up(pickup);
        }

        if self.buffs.tick(dt) {
            log::debug!("Speed buff expired");
            self.player.set_speed_multiplier(self.buffs.speed_multiplier());
        }
    }

    fn spawn_power_up(&mut self) {
        let player = self.player.position();
        let existing: Vec<Vec3> = self.power_ups.iter().map(|p| p.position).collect();
        let obstacles = self.obstacles.obstacles(&self.physics);
        let position = place_power_up(player, obstacles, &existing, &mut self.rng);

        let health = self.player.health().health_percent();
        let kind = PowerUpKind::roll(health, self.player.ammo_ratio(), &mut self.rng);
        let visual = self.visuals.spawn_pickup(kind, position);
        log::debug!(
            "Spawned {} power-up at ({:.1}, {:.1})",
            kind,
            position.x,
            position.z
        );
        self.power_ups.push(PowerUp {
            kind,
            position,
            visual,
        });
    }

    fn collect_power_up(&mut self, pickup: PowerUp) {
        if let Some(visual) = pickup.visual {
            self.visuals.remove_model(visual);
        }
        match pickup.kind {
            PowerUpKind::Health => self.player.heal(HEALTH_RESTORE),
            PowerUpKind::Ammo => self.player.refill_ammo(),
            PowerUpKind::Speed => {
                self.buffs.grant_speed();
                self.player.set_speed_multiplier(self.buffs.speed_multiplier());
            }
            PowerUpKind::Damage => self.buffs.grant_damage(),
        }
        self.audio.play(SoundCue::Pickup);
        self.stats.power_ups_collected += 1;
        log::info!("Collected {} power-up", pickup.kind);
    }

    /// Drop an enemy's body, beams and model
    fn release_enemy_resources(&mut self, enemy: &Enemy) {
        if let Some(body) = enemy.body {
            if let Err(e) = self.physics.remove_rigid_body(body) {
                log::warn!("Enemy {} body already gone: {}", enemy.id, e);
            }
        }
        if let Some(visual) = enemy.visual {
            if enemy.is_boss() {
                self.visuals.hide_beams(visual);
            }
            self.visuals.remove_model(visual);
        }
    }

    /// Gate, scale and apply damage to the player
    fn hurt_player(&mut self, hit: DamageInfo) {
        if !self.player.is_alive() {
            return;
        }
        let Some(amount) = self.damage_gate.filter(hit.amount) else {
            return;
        };
        log::trace!("Player hit by {:?} for {:.1}", hit.source, amount);
        self.stats.damage_taken += amount;
        self.player.take_damage(amount);
    }

    fn publish_hud(&mut self) {
        self.hud
            .set_remaining_enemies(self.director.remaining_enemies(self.roster.len()));
        let health = self.player.health();
        self.hud.set_player_health(health.current, health.max);
    }

    /// Let the player fire at the nearest enemy in range
    ///
    /// Runs after locomotion so targets are picked from this frame's positions.
    fn player_fire(&mut self, dt: f32) {
        let Some(amount) = self.player.fire(dt) else {
            return;
        };
        let amount = amount * self.buffs.damage_multiplier();
        let range = self.player.fire_range();
        if let Some(id) = self.roster.nearest_alive(self.player.position(), range) {
            self.damage_enemy(id, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::recording::{Call, Recorder};
    use crate::config::AutopilotConfig;
    use crate::collaborators::VisualHandle;
    use crate::powerup::{DAMAGE_BUFF, SPEED_BUFF};
    use approx::assert_relative_eq;
    use arena_waves::Difficulty;

    const DT: f32 = 1.0 / 60.0;

    fn config() -> SimConfig {
        SimConfig::default().with_seed(11)
    }

    fn run(sim: &mut ArenaSimulation, seconds: f32) {
        let ticks = (seconds / DT).round() as usize;
        for _ in 0..ticks {
            sim.tick(DT);
        }
    }

    fn started(config: SimConfig, recorder: &Recorder) -> ArenaSimulation {
        let mut sim = ArenaSimulation::new(config, recorder.collaborators()).unwrap();
        sim.start();
        sim
    }

    fn kamikaze_order() -> SpawnOrder {
        SpawnOrder {
            archetype: Archetype::Kamikaze,
            is_boss: false,
            profile: None,
            health: 55.0,
            damage: 110.0,
            radius: 0.34,
            speed_multiplier: 1.0,
        }
    }

    fn titan_boss_order() -> SpawnOrder {
        let profile = profile_for_wave(1);
        SpawnOrder {
            archetype: profile.archetype,
            is_boss: true,
            profile: Some(profile),
            health: 900.0,
            damage: 20.0,
            radius: 1.2,
            speed_multiplier: 1.0,
        }
    }

    #[test]
    fn test_start_shows_wave_overlay() {
        let recorder = Recorder::default();
        let sim = started(config(), &recorder);

        assert_eq!(sim.state(), SessionState::Playing);
        assert_eq!(sim.director().wave(), 1);
        let calls = recorder.calls();
        assert!(calls.contains(&Call::Overlay(
            "WAVE 1 / 6".to_string(),
            "BOSS: Obsidian Titan".to_string()
        )));
        assert!(calls.contains(&Call::WaveCounter(1, 6)));
        assert!(calls.contains(&Call::ArenaPhase(0)));
    }

    #[test]
    fn test_overlay_hides_when_wave_goes_active() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);

        run(&mut sim, 1.0);
        assert_eq!(recorder.count(|c| *c == Call::HideOverlay), 0);
        run(&mut sim, 0.5);
        assert_eq!(recorder.count(|c| *c == Call::HideOverlay), 1);
        assert_eq!(recorder.count(|c| *c == Call::Sound(SoundCue::WaveStart)), 1);
    }

    #[test]
    fn test_boss_spawns_first() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        run(&mut sim, 2.0);

        let spawns: Vec<_> = recorder
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Spawn(id, archetype, boss) => Some((id, archetype, boss)),
                _ => None,
            })
            .collect();
        assert!(!spawns.is_empty());

        let (id, archetype, boss) = spawns[0];
        assert!(boss);
        assert_eq!(archetype, Archetype::Titan);
        assert_eq!(sim.director().current_boss(), Some(id));

        let enemy = sim.roster().get(id).unwrap();
        assert!(enemy.is_boss());
        assert_eq!(enemy.boss().unwrap().profile.name, "Obsidian Titan");
        assert!(sim.physics().contains_body(enemy.body.unwrap()));
        assert!(recorder.calls().contains(&Call::ShowBossBar("Obsidian Titan".to_string())));
        assert!(recorder.calls().contains(&Call::Sound(SoundCue::BossRoar)));
    }

    #[test]
    fn test_corrupted_enemies_credited_once() {
        let recorder = Recorder::default();
        *recorder.drop_visuals.borrow_mut() = true;
        let mut sim = started(config(), &recorder);

        let mut saw_second_wave = false;
        for _ in 0..(30.0 / DT) as usize {
            sim.tick(DT);
            let director = sim.director();
            assert!(director.killed() <= director.enemies_per_wave());
            assert!(sim.roster().is_empty());
            if director.wave() >= 2 {
                saw_second_wave = true;
                break;
            }
        }

        assert!(saw_second_wave);
        assert_eq!(sim.stats().enemies_killed, 0);
        assert_eq!(sim.stats().corrupted_removed, sim.stats().enemies_spawned);
        assert_eq!(recorder.count(|c| matches!(c, Call::RemoveModel(_))), 0);
        // Static geometry plus the player
        assert_eq!(sim.physics().body_count(), sim.layout().static_boxes + 1);
    }

    #[test]
    fn test_kamikaze_death_blast() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        run(&mut sim, 0.5);

        let id = sim.spawn_enemy(&kamikaze_order()).unwrap();
        let near = sim.player().position() + Vec3::new(2.0, 0.0, 0.0);
        let enemy = sim.roster.get_mut(id).unwrap();
        enemy.agent.teleport(near);
        let body = enemy.body.unwrap();
        sim.physics.set_body_position(body, near).unwrap();

        assert!(sim.damage_enemy(id, 1000.0));
        sim.tick(DT);

        assert!(!sim.roster().contains(id));
        assert!(!sim.physics().contains_body(body));
        assert_eq!(recorder.count(|c| *c == Call::Explosion), 1);
        assert_eq!(recorder.count(|c| *c == Call::Sound(SoundCue::Explosion)), 1);
        assert_relative_eq!(sim.player().health().current, 60.0, epsilon = 1e-3);
        assert_eq!(sim.director().killed(), 1);
        assert!(!sim.damage_enemy(id, 10.0));
    }

    #[test]
    fn test_player_fall_ends_run() {
        let recorder = Recorder::default();
        let mut config = config();
        config.player.spawn = [0.0, 2.0, 0.0];
        let mut sim = started(config, &recorder);

        run(&mut sim, 3.0);
        assert_eq!(sim.state(), SessionState::GameOver);
        assert!(!sim.player().is_alive());
        assert_eq!(recorder.count(|c| *c == Call::EndScreen(EndScreen::GameOver)), 1);

        let frozen = sim.game_time();
        run(&mut sim, 1.0);
        assert_eq!(sim.game_time(), frozen);
        assert!(sim.session_time() > frozen);
    }

    #[test]
    fn test_restart_debounce() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        run(&mut sim, 3.0);
        assert!(sim.director().spawned() > 0);

        assert!(sim.request_restart(1000.0));
        assert!(!sim.request_restart(1200.0));
        assert!(sim.request_restart(1400.0));

        assert_eq!(sim.state(), SessionState::Playing);
        assert_eq!(sim.director().wave(), 1);
        assert_eq!(sim.director().spawned(), 0);
        assert!(sim.roster().is_empty());
        assert_eq!(sim.physics().body_count(), sim.layout().static_boxes + 1);
        assert_eq!(sim.player().position(), Vec3::new(0.0, 2.0, 30.0));
        assert_eq!(sim.player().health().current, 100.0);
        assert_eq!(sim.stats(), &SessionStats::default());
    }

    #[test]
    fn test_restart_after_game_over() {
        let recorder = Recorder::default();
        let mut config = config();
        config.player.spawn = [0.0, 2.0, 0.0];
        let mut sim = started(config, &recorder);
        run(&mut sim, 3.0);
        assert_eq!(sim.state(), SessionState::GameOver);

        assert!(sim.request_restart(0.0));
        assert_eq!(sim.state(), SessionState::Playing);
        assert!(sim.player().is_alive());
        assert_eq!(sim.game_time(), 0.0);
    }

    #[test]
    fn test_enemies_stay_in_arena() {
        let recorder = Recorder::default();
        let mut config = config();
        config.player.max_health = 1.0e6;
        let clamp = config.locomotion.arena_clamp;
        let mut sim = started(config, &recorder);

        for _ in 0..(20.0 / DT) as usize {
            sim.tick(DT);
            for enemy in sim.roster().iter() {
                let p = enemy.position();
                assert!(p.x.abs() <= clamp, "x out of arena: {:?}", p);
                assert!(p.z.abs() <= clamp, "z out of arena: {:?}", p);
            }
        }
        assert!(sim.stats().enemies_spawned > 1);
    }

    #[test]
    fn test_autopilot_kills_enemies() {
        let recorder = Recorder::default();
        let mut config = config().with_autopilot(AutopilotConfig::default());
        config.player.max_health = 1.0e6;
        let mut sim = started(config, &recorder);

        run(&mut sim, 60.0);
        assert_eq!(sim.state(), SessionState::Playing);
        assert!(sim.stats().enemies_killed > 0);
        assert!(sim.director().killed() > 0);
        assert!(recorder.count(|c| matches!(c, Call::RemoveModel(_))) > 0);
    }
    #[test]
    fn test_boss_bar_follows_one_boss() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        let first = sim.spawn_enemy(&titan_boss_order()).unwrap();
        let second = sim.spawn_enemy(&titan_boss_order()).unwrap();

        sim.tick(DT);
        assert_eq!(recorder.count(|c| matches!(c, Call::UpdateBossBar(..))), 1);

        // Losing the second boss leaves the bar alone
        assert!(sim.damage_enemy(second, 1.0e6));
        sim.tick(DT);
        assert!(!sim.roster().contains(second));
        assert_eq!(recorder.count(|c| *c == Call::HideBossBar), 0);
        assert_eq!(recorder.count(|c| matches!(c, Call::UpdateBossBar(..))), 2);

        assert!(sim.damage_enemy(first, 1.0e6));
        sim.tick(DT);
        assert_eq!(recorder.count(|c| *c == Call::HideBossBar), 1);
    }

    #[test]
    fn test_boss_bar_passes_to_surviving_boss() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        let first = sim.spawn_enemy(&titan_boss_order()).unwrap();
        let second = sim.spawn_enemy(&titan_boss_order()).unwrap();
        sim.tick(DT);
        let shown = recorder.count(|c| matches!(c, Call::ShowBossBar(_)));

        assert!(sim.damage_enemy(first, 1.0e6));
        sim.tick(DT);
        assert_eq!(recorder.count(|c| *c == Call::HideBossBar), 0);
        assert_eq!(recorder.count(|c| matches!(c, Call::ShowBossBar(_))), shown + 1);
        assert_eq!(sim.boss_bar, Some(second));

        let calls = recorder.calls();
        let last_update = calls
            .iter()
            .rev()
            .find_map(|c| match c {
                Call::UpdateBossBar(current, max) => Some((*current, *max)),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_update, (900.0, 900.0));
    }

    #[test]
    fn test_boss_eye_glow_reaches_visuals() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        sim.spawn_enemy(&titan_boss_order()).unwrap();
        sim.tick(DT);
        assert_eq!(recorder.count(|c| matches!(c, Call::EyeGlow(..))), 1);
    }

    #[test]
    fn test_pickups_heal_and_buff() {
        let recorder = Recorder::default();
        let mut config = config();
        config.player.max_health = 1.0e6;
        let mut sim = started(config, &recorder);
        sim.player.take_damage(999_960.0);
        let at = sim.player().position();
        sim.power_ups.push(PowerUp {
            kind: PowerUpKind::Health,
            position: at,
            visual: Some(VisualHandle(900)),
        });
        sim.power_ups.push(PowerUp {
            kind: PowerUpKind::Damage,
            position: at,
            visual: None,
        });
        // Out of reach
        sim.power_ups.push(PowerUp {
            kind: PowerUpKind::Speed,
            position: at + Vec3::new(10.0, 0.0, 0.0),
            visual: None,
        });

        sim.tick(DT);
        assert_relative_eq!(sim.player().health().current, 90.0);
        assert_eq!(sim.buffs().damage_multiplier(), DAMAGE_BUFF);
        assert_eq!(sim.power_ups().len(), 1);
        assert_eq!(sim.stats().power_ups_collected, 2);
        assert_eq!(recorder.count(|c| *c == Call::RemoveModel(VisualHandle(900))), 1);
        assert_eq!(recorder.count(|c| *c == Call::Sound(SoundCue::Pickup)), 2);

        sim.player.heal(1.0e6);
        run(&mut sim, 10.5);
        assert_eq!(sim.state(), SessionState::Playing);
        assert_eq!(sim.buffs().damage_multiplier(), 1.0);
    }

    #[test]
    fn test_speed_buff_uses_difficulty_scale() {
        let recorder = Recorder::default();
        let mut config = config().with_difficulty(Difficulty::Hard);
        config.player.max_health = 1.0e6;
        let mut sim = started(config, &recorder);
        assert_relative_eq!(sim.buffs().speed_multiplier(), 1.05);

        let at = sim.player().position();
        sim.power_ups.push(PowerUp {
            kind: PowerUpKind::Speed,
            position: at,
            visual: None,
        });
        sim.tick(DT);
        assert_relative_eq!(sim.buffs().speed_multiplier(), SPEED_BUFF * 1.05);

        run(&mut sim, 10.5);
        assert_relative_eq!(sim.buffs().speed_multiplier(), 1.05);
    }

    #[test]
    fn test_power_up_timer_waits_for_active_wave() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        let before = sim.power_up_timer.remaining();
        // Still on the wave overlay
        run(&mut sim, 1.0);
        assert_eq!(sim.director().phase(), WavePhase::Starting);
        assert_eq!(sim.power_up_timer.remaining(), before);

        run(&mut sim, 1.0);
        assert_eq!(sim.director().phase(), WavePhase::Active);
        assert!(sim.power_up_timer.remaining() < before);
    }

    #[test]
    fn test_spawned_pickup_lands_on_floor() {
        let recorder = Recorder::default();
        let mut sim = started(config(), &recorder);
        sim.spawn_power_up();
        sim.spawn_power_up();

        assert_eq!(sim.power_ups().len(), 2);
        assert_eq!(recorder.count(|c| matches!(c, Call::SpawnPickup(_))), 2);
        for pickup in sim.power_ups() {
            assert!(crate::level::is_over_floor(pickup.position));
            assert!(pickup.position.distance(sim.player().position()) > 1.5);
        }

        assert!(sim.request_restart(0.0));
        assert!(sim.power_ups().is_empty());
        assert_eq!(recorder.count(|c| matches!(c, Call::RemoveModel(_))), 2);
    }
}
