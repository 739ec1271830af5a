//! Arena Combat - health, damage rules and boss attacks
//!
//! # Features
//!
//! - Health pools with death tracking
//! - Player damage gate (hit cooldown, lethal bypass, difficulty scaling)
//! - Contact damage, kamikaze blast and out-of-bounds rules
//! - Per-wave boss profiles
//! - Boss twin-beam laser state machine
//!
//! # Example
//!
//! ```ignore
//! use arena_combat::prelude::*;
//!
//! let profile = profile_for_wave(3);
//! let mut attack = BossAttackState::from_overrides(&profile.laser, &mut rng)?;
//!
//! let pose = BossPose { center, yaw, radius };
//! let frame = attack.tick(dt, &pose, player_position, &mut rng);
//! if frame.hit_player() {
//!     if let Some(amount) = gate.filter(frame.damage) {
//!         player_health.apply_damage(amount);
//!     }
//! }
//! ```

pub mod boss;
pub mod damage;
pub mod error;
pub mod health;
pub mod laser;

pub mod prelude {
    pub use crate::boss::{profile_for_wave, BossProfile, BOSS_PROFILES};
    pub use crate::damage::{
        contact_damage, contact_hit, contact_range, DamageInfo, DamageSource, KamikazeBlast,
        ENEMY_KILL_HEIGHT, PLAYER_FALL_HEIGHT,
    };
    pub use crate::error::{CombatError, Result};
    pub use crate::health::{
        Health, PlayerDamageGate, LETHAL_DAMAGE, LETHAL_THRESHOLD, PLAYER_HIT_COOLDOWN,
    };
    pub use crate::laser::{
        AttackFrame, AttackPhase, BeamSegment, BossAttackState, BossPose, LaserConfig,
        LaserOverrides,
    };
}

pub use prelude::*;
