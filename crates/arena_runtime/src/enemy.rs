//! Enemy roster
//!
//! A flat list of enemies addressed by generational [`EnemyId`]. Bosses carry
//! their profile and attack state inside [`EnemyKind::Boss`], so a boss
//! without an attack state cannot be expressed.

use arena_ai::Agent;
use arena_combat::{BossAttackState, BossProfile, Health};
use arena_core::handle::EnemyTag;
use arena_core::{Archetype, EnemyId, HandleAllocator};
use arena_physics::RigidBodyHandle;
use glam::Vec3;

use crate::collaborators::VisualHandle;
use crate::error::Result;

/// Boss-only state
#[derive(Debug, Clone)]
pub struct BossEncounter {
    pub profile: &'static BossProfile,
    pub attack: BossAttackState,
}

#[derive(Debug, Clone)]
pub enum EnemyKind {
    Regular,
    Boss(BossEncounter),
}

/// One enemy in the roster
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub agent: Agent,
    pub health: Health,
    /// Damage per contact hit before the per-tick contact factor
    pub contact_damage: f32,
    pub kind: EnemyKind,
    /// `None` once the body is lost
    pub body: Option<RigidBodyHandle>,
    /// `None` once the model is lost
    pub visual: Option<VisualHandle>,
}

impl Enemy {
    pub fn archetype(&self) -> Archetype {
        self.agent.archetype
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss(_))
    }

    pub fn boss(&self) -> Option<&BossEncounter> {
        match &self.kind {
            EnemyKind::Boss(encounter) => Some(encounter),
            EnemyKind::Regular => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut BossEncounter> {
        match &mut self.kind {
            EnemyKind::Boss(encounter) => Some(encounter),
            EnemyKind::Regular => None,
        }
    }

    /// Missing its body or its model
    pub fn is_corrupted(&self) -> bool {
        self.body.is_none() || self.visual.is_none()
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead
    }

    pub fn position(&self) -> Vec3 {
        self.agent.body.position
    }

    /// Where the model is drawn
    pub fn visual_position(&self) -> Vec3 {
        self.agent.state.visual_position
    }
}

/// All live enemies
#[derive(Default)]
pub struct EnemyRoster {
    ids: HandleAllocator<EnemyTag>,
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an id for an enemy about to be built
    pub fn allocate(&mut self) -> Result<EnemyId> {
        Ok(self.ids.allocate()?)
    }

    pub fn insert(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EnemyId) -> bool {
        self.ids.is_valid(id) && self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    /// Body positions of every enemy, in roster order
    pub fn positions(&self) -> Vec<Vec3> {
        self.enemies.iter().map(Enemy::position).collect()
    }

    /// Closest living enemy to `point` within `range`
    pub fn nearest_alive(&self, point: Vec3, range: f32) -> Option<EnemyId> {
        self.enemies
            .iter()
            .filter(|e| !e.is_dead() && !e.is_corrupted())
            .map(|e| (e.id, e.visual_position().distance(point)))
            .filter(|(_, d)| *d <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Remove and return every enemy matching `pred`, freeing their ids
    pub fn drain_where<F>(&mut self, pred: F) -> Vec<Enemy>
    where
        F: Fn(&Enemy) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.enemies).into_iter().partition(|e| pred(e));
        self.enemies = kept;
        for enemy in &removed {
            self.ids.free(enemy.id);
        }
        removed
    }

    /// Remove everything, invalidating every outstanding id
    pub fn clear(&mut self) -> Vec<Enemy> {
        self.ids.clear();
        std::mem::take(&mut self.enemies)
    }
}
