//! Player Stance
//!
//! Standing and crouching collision volumes. Crouching swaps the capsule
//! immediately; standing back up restores the standing capsule exactly.
//!
//! # Stances
//!
//! - Standing: 1.8m capsule centered 0.9m above the feet
//! - Crouching: 1.0m capsule centered 0.5m above the feet

use serde::{Deserialize, Serialize};

use crate::physics::Capsule;

/// Standing height in meters
pub const STANDING_HEIGHT: f32 = 1.8;

/// Crouching height in meters
pub const CROUCH_HEIGHT: f32 = 1.0;

/// Capsule radius shared by both stances
pub const BODY_RADIUS: f32 = 0.3;

/// Player stance states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stance {
    /// Standing upright at full height
    #[default]
    Standing,
    /// Crouched with the shorter capsule
    Crouching,
}

impl Stance {
    /// The other stance.
    pub fn toggled(self) -> Self {
        match self {
            Stance::Standing => Stance::Crouching,
            Stance::Crouching => Stance::Standing,
        }
    }

    /// Collision volume for this stance.
    pub fn shape(self, shapes: &StanceShapes) -> Capsule {
        match self {
            Stance::Standing => shapes.standing,
            Stance::Crouching => shapes.crouching,
        }
    }
}

/// Collision volumes for each stance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceShapes {
    pub standing: Capsule,
    pub crouching: Capsule,
}

impl Default for StanceShapes {
    fn default() -> Self {
        Self {
            standing: Capsule::upright(STANDING_HEIGHT, BODY_RADIUS),
            crouching: Capsule::upright(CROUCH_HEIGHT, BODY_RADIUS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shapes() {
        let shapes = StanceShapes::default();
        assert_eq!(shapes.standing.height, 1.8);
        assert_eq!(shapes.standing.center_offset, 0.9);
        assert_eq!(shapes.crouching.height, 1.0);
        assert_eq!(shapes.crouching.center_offset, 0.5);
    }

    #[test]
    fn test_toggle_twice_restores_shape() {
        let shapes = StanceShapes::default();
        let stance = Stance::Standing;
        assert_eq!(stance.toggled().shape(&shapes), shapes.crouching);
        assert_eq!(stance.toggled().toggled().shape(&shapes), shapes.standing);
    }
}
