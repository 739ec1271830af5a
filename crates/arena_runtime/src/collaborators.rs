//! Presentation collaborators
//!
//! Rendering, audio and HUD live outside the simulation. The simulation talks
//! to them through these traits; every method has a no-op default so a
//! headless run only implements what it cares about.

use arena_combat::{BeamSegment, BossProfile};
use arena_core::{Archetype, EnemyId};
use glam::Vec3;

use crate::powerup::PowerUpKind;

/// Opaque link to a spawned model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// One-shot sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    BossRoar,
    WaveStart,
    WaveComplete,
    Growl,
    Explosion,
    Pickup,
}

impl From<arena_waves::Cue> for SoundCue {
    fn from(cue: arena_waves::Cue) -> Self {
        match cue {
            arena_waves::Cue::BossRoar => Self::BossRoar,
            arena_waves::Cue::WaveStart => Self::WaveStart,
            arena_waves::Cue::WaveComplete => Self::WaveComplete,
            arena_waves::Cue::Growl => Self::Growl,
        }
    }
}

/// How the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndScreen {
    Victory,
    GameOver,
}

/// Models, transforms and boss beams
pub trait VisualLayer {
    /// Create the model for a new enemy; `None` leaves the enemy without a visual
    fn spawn_model(
        &mut self,
        id: EnemyId,
        archetype: Archetype,
        profile: Option<&BossProfile>,
    ) -> Option<VisualHandle>;

    fn set_transform(&mut self, _visual: VisualHandle, _position: Vec3, _yaw: f32) {}

    fn show_beams(&mut self, _visual: VisualHandle, _beams: &[BeamSegment; 2], _power: f32) {}

    fn hide_beams(&mut self, _visual: VisualHandle) {}

    /// Boss eye glow in [0, 1], set every attack tick
    fn set_eye_glow(&mut self, _visual: VisualHandle, _glow: f32) {}

    /// Create the model for a pickup; removed through [`VisualLayer::remove_model`]
    fn spawn_pickup(&mut self, _kind: PowerUpKind, _position: Vec3) -> Option<VisualHandle> {
        None
    }

    fn remove_model(&mut self, _visual: VisualHandle) {}

    /// Swap the decorative trap set
    fn set_arena_phase(&mut self, _phase: u8) {}

    fn explosion(&mut self, _at: Vec3) {}
}

/// Fire-and-forget sound playback
pub trait AudioCues {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Overlay, counters, boss bar and end screen
pub trait Hud {
    fn show_overlay(&mut self, _title: &str, _subtitle: &str) {}

    fn hide_overlay(&mut self) {}

    fn set_wave_counter(&mut self, _wave: u32, _total: u32) {}

    fn set_remaining_enemies(&mut self, _remaining: usize) {}

    fn set_player_health(&mut self, _current: f32, _max: f32) {}

    fn show_boss_bar(&mut self, _name: &str) {}

    fn update_boss_bar(&mut self, _current: f32, _max: f32) {}

    fn hide_boss_bar(&mut self) {}

    fn show_end_screen(&mut self, _screen: EndScreen) {}
}

/// Visual layer that hands out handles and draws nothing
#[derive(Debug, Default)]
pub struct NullVisuals {
    next: u64,
}

impl VisualLayer for NullVisuals {
    fn spawn_model(
        &mut self,
        _id: EnemyId,
        _archetype: Archetype,
        _profile: Option<&BossProfile>,
    ) -> Option<VisualHandle> {
        self.next += 1;
        Some(VisualHandle(self.next))
    }
}

#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioCues for NullAudio {}

#[derive(Debug, Default)]
pub struct NullHud;

impl Hud for NullHud {}

/// HUD that reports overlays and the end screen through the log
#[derive(Debug, Default)]
pub struct LogHud;

impl Hud for LogHud {
    fn show_overlay(&mut self, title: &str, subtitle: &str) {
        log::info!("[overlay] {} - {}", title, subtitle);
    }

    fn show_boss_bar(&mut self, name: &str) {
        log::info!("[boss] {}", name);
    }

    fn show_end_screen(&mut self, screen: EndScreen) {
        log::info!("[end] {:?}", screen);
    }
}

/// The three presentation collaborators a simulation talks to
pub struct Collaborators {
    pub visuals: Box<dyn VisualLayer>,
    pub audio: Box<dyn AudioCues>,
    pub hud: Box<dyn Hud>,
}

impl Collaborators {
    /// Everything discarded
    pub fn headless() -> Self {
        Self {
            visuals: Box::new(NullVisuals::default()),
            audio: Box::new(NullAudio),
            hud: Box::new(NullHud),
        }
    }

    pub fn with_visuals(mut self, visuals: Box<dyn VisualLayer>) -> Self {
        self.visuals = visuals;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioCues>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_hud(mut self, hud: Box<dyn Hud>) -> Self {
        self.hud = hud;
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::headless()
    }
}
