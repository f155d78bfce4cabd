//! Named moves and homing settings from TOML.

use serde::Deserialize;

use crate::motion::MotionConstraints;

use super::mechanical::MechanicalConstraints;
use super::units::Degrees;

/// A named absolute move.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveConfig {
    /// Target position in degrees (absolute from origin).
    pub target_degrees: Degrees,

    /// Velocity as percentage of the axis maximum (1-100).
    #[serde(default = "default_percent")]
    pub velocity_percent: u8,

    /// Acceleration (and jerk) as percentage of the axis maximum (1-100).
    #[serde(default = "default_percent")]
    pub acceleration_percent: u8,
}

fn default_percent() -> u8 {
    100
}

impl MoveConfig {
    /// Constraints for this move on an axis.
    pub fn constraints(&self, mechanical: &MechanicalConstraints) -> MotionConstraints {
        scaled(mechanical, self.velocity_percent, self.acceleration_percent)
    }
}

/// Where and how fast the axis goes when homed.
#[derive(Debug, Clone, Deserialize)]
pub struct HomingConfig {
    /// Home position in degrees; the axis is re-referenced to it afterwards.
    #[serde(default)]
    pub position_degrees: Degrees,

    /// Homing velocity as percentage of the axis maximum (1-100).
    #[serde(default = "default_homing_percent")]
    pub velocity_percent: u8,
}

fn default_homing_percent() -> u8 {
    25
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            position_degrees: Degrees(0.0),
            velocity_percent: default_homing_percent(),
        }
    }
}

impl HomingConfig {
    /// Constraints for the homing move: reduced velocity, full acceleration.
    pub fn constraints(&self, mechanical: &MechanicalConstraints) -> MotionConstraints {
        scaled(mechanical, self.velocity_percent, 100)
    }
}

fn scaled(
    mechanical: &MechanicalConstraints,
    velocity_percent: u8,
    acceleration_percent: u8,
) -> MotionConstraints {
    mechanical.motion_constraints().scaled(
        velocity_percent as f32 / 100.0,
        acceleration_percent as f32 / 100.0,
    )
}
