//! Mechanical constraints derived from axis configuration.

use crate::motion::{MotionConstraints, ProfileShape};

use super::axis::AxisConfig;
use super::limits::StepLimits;
use super::units::Degrees;

/// Derived mechanical parameters computed from axis configuration.
///
/// These are computed once at initialization and used for all motion planning.
/// Everything downstream of this type works in steps.
#[derive(Debug, Clone)]
pub struct MechanicalConstraints {
    /// Total steps per output revolution (steps × microsteps × gear_ratio).
    pub steps_per_revolution: u32,

    /// Steps per degree of output rotation.
    pub steps_per_degree: f32,

    /// Maximum velocity in steps per second.
    pub max_velocity_steps_per_sec: f32,

    /// Maximum acceleration in steps per second squared.
    pub max_acceleration_steps_per_sec2: f32,

    /// Maximum jerk in steps per second cubed.
    pub max_jerk_steps_per_sec3: f32,

    /// Ramp shape.
    pub shape: ProfileShape,

    /// Soft limits in steps (if configured).
    pub limits: Option<StepLimits>,
}

impl MechanicalConstraints {
    /// Compute mechanical constraints from axis configuration.
    pub fn from_config(config: &AxisConfig) -> Self {
        let steps_per_revolution = config.total_steps_per_revolution();
        let steps_per_degree = steps_per_revolution as f32 / 360.0;

        let limits = config
            .limits
            .as_ref()
            .map(|l| StepLimits::from_soft_limits(l, steps_per_degree));

        Self {
            steps_per_revolution,
            steps_per_degree,
            max_velocity_steps_per_sec: config.max_velocity.0 * steps_per_degree,
            max_acceleration_steps_per_sec2: config.max_acceleration.0 * steps_per_degree,
            max_jerk_steps_per_sec3: config.max_jerk.0 * steps_per_degree,
            shape: config.profile,
            limits,
        }
    }

    /// Full-speed constraints for this axis, starting from rest.
    pub fn motion_constraints(&self) -> MotionConstraints {
        match self.shape {
            ProfileShape::SCurve => MotionConstraints::s_curve(
                self.max_velocity_steps_per_sec,
                self.max_acceleration_steps_per_sec2,
                self.max_jerk_steps_per_sec3,
            ),
            ProfileShape::Trapezoidal => MotionConstraints::trapezoidal(
                self.max_velocity_steps_per_sec,
                self.max_acceleration_steps_per_sec2,
            ),
        }
    }

    /// Convert degrees to steps.
    #[inline]
    pub fn degrees_to_steps(&self, degrees: Degrees) -> f32 {
        degrees.to_steps(self.steps_per_degree)
    }

    /// Convert steps to degrees.
    #[inline]
    pub fn steps_to_degrees(&self, steps: f32) -> Degrees {
        Degrees::from_steps(steps, self.steps_per_degree)
    }

    /// Apply the soft-limit policy to a target in steps.
    ///
    /// Returns `Err(limit)` when a rejecting limit is violated.
    pub fn check_limits(&self, steps: f32) -> Result<f32, f32> {
        match &self.limits {
            Some(limits) => limits.apply(steps),
            None => Ok(steps),
        }
    }
}
