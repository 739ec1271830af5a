//! Wave director
//!
//! Owns the wave lifecycle: when to spawn, what to spawn, when a wave is
//! over and when the run is won. It never touches the world directly.
//! Everything it decides is queued as a [`DirectorEvent`] and drained by
//! the simulation once per tick.
//!
//! ```text
//!   STARTING ──(1.2 s)──► ACTIVE ──(all spawned, none alive)──► COMPLETE
//!      ▲                    │                                      │
//!      └────────────────────┼──────────(1.2 s, next wave)──────────┘
//!                           └──(final wave cleared)──► VICTORY
//! ```

use arena_combat::boss::{profile_for_wave, BossProfile};
use arena_core::prelude::*;
use rand::Rng;

use crate::difficulty::DifficultyTuning;
use crate::wave::{
    arena_phase_for_wave, base_spawn_rate, boss_count_for_wave, build_spawn_cycle,
    enemies_per_wave, wave_composition, wave_speed_multiplier, WavePhase, START_WAVE,
    TOTAL_WAVES, TRANSITION_DURATION,
};

/// Chance that a regular non-arachnid spawn growls
const GROWL_CHANCE: f64 = 0.2;
/// Spawn interval multiplier while fewer than [`LOW_ALIVE_THRESHOLD`] enemies live
const LOW_ALIVE_RATE_SCALE: f32 = 0.65;
const LOW_ALIVE_THRESHOLD: usize = 3;
/// Seconds the completion overlay stays up between waves
const COMPLETE_OVERLAY_SECONDS: f32 = 2.4;
/// Seconds the final overlay stays up before victory is raised
const VICTORY_OVERLAY_SECONDS: f32 = 2.2;

/// One-shot audio cue requested by the director
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    WaveStart,
    WaveComplete,
    BossRoar,
    Growl,
}

/// Why an enemy left the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalCause {
    Killed,
    /// Lost its body or visual and was force-removed
    Corrupted,
}

/// Everything needed to create one enemy
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnOrder {
    pub archetype: Archetype,
    pub is_boss: bool,
    pub profile: Option<&'static BossProfile>,
    pub health: f32,
    /// Contact damage before the per-tick contact factor
    pub damage: f32,
    pub radius: f32,
    pub speed_multiplier: f32,
}

/// Output of the director, drained once per tick
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorEvent {
    ShowOverlay { title: String, subtitle: String },
    HideOverlay,
    WaveCounter { wave: u32, total: u32 },
    PhaseChanged { from: WavePhase, to: WavePhase },
    ArenaPhase(u8),
    ShowBossBar { name: &'static str },
    Cue(Cue),
    Spawn(SpawnOrder),
    Victory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OverlayAction {
    Hide,
    HideThenVictory,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlayTimer {
    remaining: f32,
    action: OverlayAction,
}

/// Drives waves from first spawn to victory
#[derive(Debug, Clone)]
pub struct WaveDirector {
    tuning: DifficultyTuning,
    wave: u32,
    phase: WavePhase,
    spawned: u32,
    killed: u32,
    per_wave: u32,
    spawn_rate: f32,
    game_time: f32,
    last_spawn_time: f32,
    transition_time: f32,
    spawn_cycle: Vec<Archetype>,
    current_boss: Option<EnemyId>,
    victory: bool,
    overlay_timer: Option<OverlayTimer>,
    arena_phase: Option<u8>,
    pending: Vec<DirectorEvent>,
}

impl WaveDirector {
    pub fn new(tuning: DifficultyTuning) -> Self {
        Self {
            tuning,
            wave: START_WAVE,
            phase: WavePhase::Starting,
            spawned: 0,
            killed: 0,
            per_wave: enemies_per_wave(START_WAVE),
            spawn_rate: base_spawn_rate(START_WAVE),
            game_time: 0.0,
            last_spawn_time: 0.0,
            transition_time: 0.0,
            spawn_cycle: Vec::new(),
            current_boss: None,
            victory: false,
            overlay_timer: None,
            arena_phase: None,
            pending: Vec::new(),
        }
    }

    pub fn tuning(&self) -> &DifficultyTuning {
        &self.tuning
    }

    /// Swap difficulty; takes effect from the next wave start
    pub fn set_tuning(&mut self, tuning: DifficultyTuning) {
        self.tuning = tuning;
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn total_waves(&self) -> u32 {
        TOTAL_WAVES
    }

    pub fn phase(&self) -> WavePhase {
        self.phase
    }

    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn killed(&self) -> u32 {
        self.killed
    }

    pub fn enemies_per_wave(&self) -> u32 {
        self.per_wave
    }

    /// Seconds between spawns for the current wave, difficulty applied
    pub fn spawn_rate(&self) -> f32 {
        self.spawn_rate
    }

    pub fn current_boss(&self) -> Option<EnemyId> {
        self.current_boss
    }

    pub fn is_victory(&self) -> bool {
        self.victory
    }

    pub fn arena_phase(&self) -> Option<u8> {
        self.arena_phase
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<DirectorEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Begin wave `wave`; past the last wave this raises victory instead
    pub fn start_wave<R: Rng + ?Sized>(&mut self, wave: u32, rng: &mut R) {
        if wave > TOTAL_WAVES {
            self.trigger_victory();
            return;
        }

        let wave = wave.clamp(START_WAVE, TOTAL_WAVES);
        self.wave = wave;
        self.set_phase(WavePhase::Starting);
        self.spawned = 0;
        self.killed = 0;
        self.transition_time = 0.0;
        self.current_boss = None;
        self.spawn_cycle = build_spawn_cycle(wave_composition(wave), rng);
        self.per_wave = enemies_per_wave(wave);
        self.spawn_rate = base_spawn_rate(wave) * self.tuning.spawn_rate_scale;

        let arena_phase = arena_phase_for_wave(wave);
        if self.arena_phase != Some(arena_phase) {
            self.arena_phase = Some(arena_phase);
            self.pending.push(DirectorEvent::ArenaPhase(arena_phase));
        }

        // A new wave overlay supersedes any pending hide
        self.overlay_timer = None;
        self.pending.push(DirectorEvent::ShowOverlay {
            title: format!("WAVE {} / {}", wave, TOTAL_WAVES),
            subtitle: format!("BOSS: {}", profile_for_wave(wave).name),
        });
        self.pending.push(DirectorEvent::WaveCounter {
            wave,
            total: TOTAL_WAVES,
        });

        log::info!(
            "Wave {}/{} starting: {} enemies, spawn every {:.2}s",
            wave,
            TOTAL_WAVES,
            self.per_wave,
            self.spawn_rate
        );
    }

    /// Advance timers and the lifecycle by `dt`
    ///
    /// `alive` is the number of live enemies in the roster. Spawn decisions
    /// are queued as [`DirectorEvent::Spawn`]; the caller confirms each one
    /// with [`WaveDirector::confirm_spawn`].
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, alive: usize, rng: &mut R) {
        self.game_time += dt;
        self.tick_overlay(dt);

        match self.phase {
            WavePhase::Starting => {
                self.transition_time += dt;
                if self.transition_time > TRANSITION_DURATION {
                    self.set_phase(WavePhase::Active);
                    self.transition_time = 0.0;
                    self.pending.push(DirectorEvent::HideOverlay);
                    self.pending.push(DirectorEvent::Cue(Cue::WaveStart));
                }
            }
            WavePhase::Active => {
                let mut rate = self.spawn_rate;
                if alive < LOW_ALIVE_THRESHOLD {
                    rate *= LOW_ALIVE_RATE_SCALE;
                }

                let mut alive = alive;
                if self.game_time - self.last_spawn_time > rate
                    && self.spawned < self.per_wave
                    && alive < self.tuning.max_active_enemies
                {
                    let order = self.next_spawn_order(rng);
                    self.pending.push(DirectorEvent::Spawn(order));
                    self.last_spawn_time = self.game_time;
                    alive += 1;
                }

                if self.spawned >= self.per_wave && alive == 0 {
                    self.complete_wave();
                }
            }
            WavePhase::Complete => {
                self.transition_time += dt;
                if self.transition_time > TRANSITION_DURATION {
                    if self.wave < TOTAL_WAVES {
                        self.start_wave(self.wave + 1, rng);
                    } else {
                        self.trigger_victory();
                    }
                }
            }
            WavePhase::Victory => {}
        }
    }

    fn tick_overlay(&mut self, dt: f32) {
        let Some(timer) = self.overlay_timer.as_mut() else {
            return;
        };
        timer.remaining -= dt;
        if timer.remaining > 0.0 {
            return;
        }

        let action = timer.action;
        self.overlay_timer = None;
        self.pending.push(DirectorEvent::HideOverlay);
        if action == OverlayAction::HideThenVictory {
            self.trigger_victory();
        }
    }

    /// Decide the next spawn: bosses first, then the shuffled cycle
    fn next_spawn_order<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpawnOrder {
        let wave = self.wave;
        let is_boss = self.spawned < boss_count_for_wave(wave);

        let (archetype, profile) = if is_boss {
            let profile = profile_for_wave(wave);
            self.pending.push(DirectorEvent::Cue(Cue::BossRoar));
            self.pending.push(DirectorEvent::ShowBossBar { name: profile.name });
            (profile.archetype, Some(profile))
        } else {
            if self.spawn_cycle.is_empty() {
                self.spawn_cycle = build_spawn_cycle(wave_composition(wave), rng);
            }
            let archetype = self.spawn_cycle.pop().unwrap_or(Archetype::Arachnid);
            if archetype != Archetype::Arachnid && rng.gen_bool(GROWL_CHANCE) {
                self.pending.push(DirectorEvent::Cue(Cue::Growl));
            }
            (archetype, None)
        };

        let stats = archetype.stats();
        let mut health = stats.health;
        let mut damage = stats.damage;
        let mut radius = archetype.collision_radius(is_boss);
        let mut speed_multiplier = wave_speed_multiplier(wave);

        if let Some(profile) = profile {
            damage *= profile.damage_multiplier;
            health *= (1.0 + wave as f32 * 0.18) * profile.health_multiplier;
            radius *= profile.radius_scale();
            speed_multiplier = (speed_multiplier * profile.speed_multiplier).max(1.2);
        }
        health *= self.tuning.enemy_health_scale;
        speed_multiplier *= self.tuning.enemy_speed_scale;

        log::debug!(
            "Wave {} spawn #{}: {}{}",
            wave,
            self.spawned + 1,
            archetype,
            if is_boss { " (boss)" } else { "" }
        );

        SpawnOrder {
            archetype,
            is_boss,
            profile,
            health,
            damage,
            radius,
            speed_multiplier,
        }
    }

    /// Count a spawn order that made it into the roster
    pub fn confirm_spawn(&mut self, order: &SpawnOrder, id: EnemyId) {
        self.spawned += 1;
        if order.is_boss {
            self.current_boss = Some(id);
        }
    }

    /// Credit a removed enemy; kills never exceed the wave quota
    pub fn record_enemy_removed(&mut self, id: EnemyId, cause: RemovalCause) {
        if self.killed < self.per_wave {
            self.killed += 1;
        }
        if self.current_boss == Some(id) {
            self.current_boss = None;
        }
        if cause == RemovalCause::Corrupted {
            log::warn!("Enemy {} removed as corrupted", id);
        }
    }

    /// Live enemies plus those still to spawn this wave
    pub fn remaining_enemies(&self, alive: usize) -> usize {
        if self.phase == WavePhase::Victory {
            return 0;
        }
        alive + self.per_wave.saturating_sub(self.spawned) as usize
    }

    /// Close out the current wave
    pub fn complete_wave(&mut self) {
        if self.phase == WavePhase::Victory {
            return;
        }
        self.pending.push(DirectorEvent::Cue(Cue::WaveComplete));
        self.transition_time = 0.0;

        if self.wave >= TOTAL_WAVES {
            self.set_phase(WavePhase::Victory);
            self.pending.push(DirectorEvent::ShowOverlay {
                title: format!("ALL {} WAVES CLEARED", TOTAL_WAVES),
                subtitle: "FINAL BOSS DEFEATED".to_string(),
            });
            self.overlay_timer = Some(OverlayTimer {
                remaining: VICTORY_OVERLAY_SECONDS,
                action: OverlayAction::HideThenVictory,
            });
            log::info!("Final wave cleared");
            return;
        }

        self.set_phase(WavePhase::Complete);
        self.pending.push(DirectorEvent::ShowOverlay {
            title: format!("WAVE {} COMPLETE", self.wave),
            subtitle: format!("NEXT BOSS: {}", profile_for_wave(self.wave + 1).name),
        });
        self.overlay_timer = Some(OverlayTimer {
            remaining: COMPLETE_OVERLAY_SECONDS,
            action: OverlayAction::Hide,
        });
        log::info!("Wave {} complete", self.wave);
    }

    /// Enter victory; repeated calls do nothing
    pub fn trigger_victory(&mut self) {
        if self.victory {
            return;
        }
        self.victory = true;
        self.overlay_timer = None;
        self.set_phase(WavePhase::Victory);
        self.pending.push(DirectorEvent::Victory);
        log::info!("Victory after {} waves", self.wave);
    }

    /// Back to the pre-run state; call [`WaveDirector::start_wave`] afterwards
    pub fn reset(&mut self) {
        let tuning = self.tuning.clone();
        *self = Self::new(tuning);
    }

    fn set_phase(&mut self, to: WavePhase) {
        let from = self.phase;
        self.phase = to;
        if from != to {
            self.pending.push(DirectorEvent::PhaseChanged { from, to });
        }
    }
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(DifficultyTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use arena_core::handle::EnemyTag;
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    /// Minimal roster: confirms every spawn, optionally kills on demand
    struct Harness {
        director: WaveDirector,
        rng: ArenaRng,
        ids: HandleAllocator<EnemyTag>,
        alive: Vec<(EnemyId, bool)>,
        events: Vec<DirectorEvent>,
    }

    impl Harness {
        fn new(tuning: DifficultyTuning) -> Self {
            let mut director = WaveDirector::new(tuning);
            let mut rng = seeded_rng(31);
            director.start_wave(START_WAVE, &mut rng);
            Self {
                director,
                rng,
                ids: HandleAllocator::new(),
                alive: Vec::new(),
                events: Vec::new(),
            }
        }

        fn tick(&mut self, dt: f32) {
            self.director.tick(dt, self.alive.len(), &mut self.rng);
            for event in self.director.drain_events() {
                if let DirectorEvent::Spawn(order) = &event {
                    let id = self.ids.allocate().unwrap();
                    self.director.confirm_spawn(order, id);
                    self.alive.push((id, order.is_boss));
                }
                self.events.push(event);
            }
        }

        fn kill_all(&mut self) {
            for (id, _) in std::mem::take(&mut self.alive) {
                self.director.record_enemy_removed(id, RemovalCause::Killed);
            }
        }

        fn spawn_orders(&self) -> Vec<&SpawnOrder> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    DirectorEvent::Spawn(order) => Some(order),
                    _ => None,
                })
                .collect()
        }

        /// Tick until the wave has spawned everything, killing as it goes
        fn clear_wave(&mut self) {
            let wave = self.director.wave();
            for _ in 0..20_000 {
                self.tick(DT);
                self.kill_all();
                if matches!(
                    self.director.phase(),
                    WavePhase::Complete | WavePhase::Victory
                ) {
                    return;
                }
            }
            panic!("wave {} never cleared", wave);
        }
    }

    #[test]
    fn test_start_wave_sets_counters() {
        let mut rng = seeded_rng(1);
        let mut director = WaveDirector::default();
        director.start_wave(3, &mut rng);

        assert_eq!(director.wave(), 3);
        assert_eq!(director.phase(), WavePhase::Starting);
        assert_eq!(director.enemies_per_wave(), 22);
        assert_relative_eq!(director.spawn_rate(), 1.04 - 3.0 * 0.055, epsilon = 1e-5);

        let events = director.drain_events();
        assert!(events.contains(&DirectorEvent::ArenaPhase(1)));
        assert!(events.contains(&DirectorEvent::ShowOverlay {
            title: "WAVE 3 / 6".to_string(),
            subtitle: "BOSS: Nightfang Executioner".to_string(),
        }));
        assert!(director.drain_events().is_empty());
    }

    #[test]
    fn test_start_wave_past_last_is_victory() {
        let mut rng = seeded_rng(1);
        let mut director = WaveDirector::default();
        director.start_wave(7, &mut rng);
        assert!(director.is_victory());
        assert_eq!(director.phase(), WavePhase::Victory);
        assert_eq!(director.remaining_enemies(5), 0);
    }

    #[test]
    fn test_starting_becomes_active_after_transition() {
        let mut h = Harness::new(DifficultyTuning::default());
        h.tick(1.0);
        assert_eq!(h.director.phase(), WavePhase::Starting);
        h.tick(0.3);
        assert_eq!(h.director.phase(), WavePhase::Active);
        assert!(h.events.contains(&DirectorEvent::Cue(Cue::WaveStart)));
        assert!(h.events.contains(&DirectorEvent::HideOverlay));
    }

    #[test]
    fn test_bosses_spawn_first() {
        let mut h = Harness::new(DifficultyTuning::default());
        let mut rng = seeded_rng(2);
        h.director.start_wave(4, &mut rng);
        for _ in 0..600 {
            h.tick(DT);
        }

        let orders = h.spawn_orders();
        assert!(orders.len() > 3);
        assert!(orders[0].is_boss && orders[1].is_boss);
        assert!(orders[2..].iter().all(|o| !o.is_boss));
        assert_eq!(orders[0].archetype, Archetype::RiftJudicator);
        assert!(h.director.current_boss().is_some());
    }

    #[test]
    fn test_boss_order_stats() {
        let mut h = Harness::new(Difficulty::Hard.tuning());
        for _ in 0..200 {
            h.tick(DT);
        }
        let boss = h.spawn_orders()[0].clone();
        assert!(boss.is_boss);
        assert_eq!(boss.archetype, Archetype::Titan);
        // wave 1: (1 + 0.18) * 1.0 * hard health scale
        assert_relative_eq!(boss.health, 900.0 * 1.18 * 1.15, epsilon = 1e-2);
        assert_relative_eq!(boss.radius, 1.2 * 0.78, epsilon = 1e-5);
        assert_relative_eq!(boss.speed_multiplier, 1.2 * 1.08, epsilon = 1e-5);

        let regular = h.spawn_orders()[1].clone();
        assert!(!regular.is_boss);
        assert_relative_eq!(regular.speed_multiplier, 1.0 * 1.08, epsilon = 1e-5);
    }

    #[test]
    fn test_respects_live_cap() {
        let tuning = DifficultyTuning::default().with_max_active_enemies(4);
        let mut h = Harness::new(tuning);
        for _ in 0..3000 {
            h.tick(DT);
        }
        assert_eq!(h.alive.len(), 4);
        assert_eq!(h.director.spawned(), 4);
        assert_eq!(h.director.phase(), WavePhase::Active);
    }

    #[test]
    fn test_wave_completion_scenario() {
        let mut h = Harness::new(DifficultyTuning::default());
        h.clear_wave();

        assert_eq!(h.director.phase(), WavePhase::Complete);
        assert_eq!(h.director.spawned(), 14);
        assert_eq!(h.director.killed(), 14);
        assert!(h.events.contains(&DirectorEvent::Cue(Cue::WaveComplete)));
        assert!(h.events.contains(&DirectorEvent::ShowOverlay {
            title: "WAVE 1 COMPLETE".to_string(),
            subtitle: "NEXT BOSS: Void Reaper".to_string(),
        }));

        // 1.2 s later wave 2 starts
        for _ in 0..80 {
            h.tick(DT);
        }
        assert_eq!(h.director.wave(), 2);
        assert_eq!(h.director.phase(), WavePhase::Starting);
        assert_eq!(h.director.spawned(), 0);
    }

    #[test]
    fn test_victory_scenario() {
        let mut h = Harness::new(DifficultyTuning::default());
        let mut rng = seeded_rng(3);
        h.director.start_wave(TOTAL_WAVES, &mut rng);
        h.clear_wave();

        assert_eq!(h.director.phase(), WavePhase::Victory);
        assert!(!h.director.is_victory(), "victory waits for the overlay");
        assert_eq!(h.director.remaining_enemies(0), 0);

        for _ in 0..140 {
            h.tick(DT);
        }
        assert!(h.director.is_victory());
        let victories = h.events.iter().filter(|e| **e == DirectorEvent::Victory).count();
        assert_eq!(victories, 1);

        h.director.trigger_victory();
        assert!(h.director.drain_events().is_empty());
    }

    #[test]
    fn test_waves_only_increase() {
        let mut h = Harness::new(DifficultyTuning::default().with_spawn_rate_scale(0.1));
        let mut last = h.director.wave();
        for _ in 0..TOTAL_WAVES {
            h.clear_wave();
            for _ in 0..200 {
                h.tick(DT);
                h.kill_all();
                assert!(h.director.wave() >= last);
                last = h.director.wave();
            }
        }
        assert!(h.director.is_victory());
        assert_eq!(h.director.wave(), TOTAL_WAVES);
    }

    #[test]
    fn test_kill_credit_is_capped() {
        let mut rng = seeded_rng(4);
        let mut director = WaveDirector::default();
        director.start_wave(1, &mut rng);
        let id: EnemyId = Handle::new(0, 0);
        for _ in 0..40 {
            director.record_enemy_removed(id, RemovalCause::Corrupted);
        }
        assert_eq!(director.killed(), director.enemies_per_wave());
    }

    #[test]
    fn test_remaining_enemies() {
        let mut rng = seeded_rng(5);
        let mut director = WaveDirector::default();
        director.start_wave(2, &mut rng);
        assert_eq!(director.remaining_enemies(0), 18);
        assert_eq!(director.remaining_enemies(3), 21);
    }

    #[test]
    fn test_new_wave_supersedes_overlay_timer() {
        let mut h = Harness::new(DifficultyTuning::default());
        h.clear_wave();
        assert!(h.director.overlay_timer.is_some());

        let mut rng = seeded_rng(6);
        h.director.start_wave(2, &mut rng);
        assert!(h.director.overlay_timer.is_none());
    }
}
