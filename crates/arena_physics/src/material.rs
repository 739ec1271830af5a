//! Physics materials defining surface properties

use rapier3d::prelude as rapier;
use serde::{Deserialize, Serialize};

/// Physics material defining friction and restitution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsMaterial {
    /// Friction coefficient (0 = frictionless, 1 = high friction)
    pub friction: f32,
    /// Restitution/bounciness (0 = no bounce, 1 = perfect bounce)
    pub restitution: f32,
    /// Density for mass calculation. Zero leaves mass to the body.
    pub density: f32,
    /// How friction is combined between two colliders
    pub friction_combine: CombineRule,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
            friction_combine: CombineRule::Average,
        }
    }
}

impl PhysicsMaterial {
    /// Enemy skin: slides along walls, mass comes from the body
    pub fn frictionless() -> Self {
        Self {
            friction: 0.0,
            restitution: 0.0,
            density: 0.0,
            friction_combine: CombineRule::Min,
        }
    }

    /// Arena stone
    pub fn stone() -> Self {
        Self {
            friction: 0.7,
            restitution: 0.1,
            density: 2.5,
            ..Default::default()
        }
    }
}

/// Rule for combining material properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CombineRule {
    /// Use the average of both values
    #[default]
    Average,
    /// Use the minimum value
    Min,
    /// Use the maximum value
    Max,
    /// Multiply the values
    Multiply,
}

impl From<CombineRule> for rapier::CoefficientCombineRule {
    fn from(rule: CombineRule) -> Self {
        match rule {
            CombineRule::Average => rapier::CoefficientCombineRule::Average,
            CombineRule::Min => rapier::CoefficientCombineRule::Min,
            CombineRule::Max => rapier::CoefficientCombineRule::Max,
            CombineRule::Multiply => rapier::CoefficientCombineRule::Multiply,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frictionless_material() {
        let skin = PhysicsMaterial::frictionless();
        assert_eq!(skin.friction, 0.0);
        assert_eq!(skin.density, 0.0);
        assert_eq!(
            rapier::CoefficientCombineRule::from(skin.friction_combine),
            rapier::CoefficientCombineRule::Min
        );
        assert_eq!(PhysicsMaterial::stone().friction, 0.7);
    }
}
