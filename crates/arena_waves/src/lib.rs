//! Arena Waves - wave director and difficulty presets
//!
//! # Features
//!
//! - Six-wave run with per-wave composition, boss count and spawn cadence
//! - Wave lifecycle `Starting -> Active -> Complete -> ... -> Victory`
//! - Difficulty presets scaling spawn rate, enemy stats and player damage
//! - Event queue output so the director never touches the world
//!
//! # Example
//!
//! ```ignore
//! use arena_waves::prelude::*;
//!
//! let mut director = WaveDirector::new(Difficulty::Hard.tuning());
//! director.start_wave(START_WAVE, &mut rng);
//!
//! director.tick(dt, roster.alive_count(), &mut rng);
//! for event in director.drain_events() {
//!     if let DirectorEvent::Spawn(order) = event {
//!         let id = roster.spawn(&order)?;
//!         director.confirm_spawn(&order, id);
//!     }
//! }
//! ```

pub mod difficulty;
pub mod director;
pub mod error;
pub mod wave;

pub mod prelude {
    pub use crate::difficulty::{Difficulty, DifficultyTuning};
    pub use crate::director::{Cue, DirectorEvent, RemovalCause, SpawnOrder, WaveDirector};
    pub use crate::error::{Result, WaveError};
    pub use crate::wave::{
        boss_count_for_wave, enemies_per_wave, wave_composition, WavePhase, START_WAVE,
        TOTAL_WAVES, TRANSITION_DURATION,
    };
}

pub use prelude::*;
