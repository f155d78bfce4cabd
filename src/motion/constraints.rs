//! Kinematic limits for a single move.

use serde::Deserialize;

/// Shape of the velocity ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ProfileShape {
    /// Jerk-limited ramps: jerk-up, constant acceleration, jerk-down (7 segments).
    #[default]
    SCurve,
    /// Constant-acceleration ramps (3 segments); `max_jerk` is ignored.
    Trapezoidal,
}

/// Kinematic limits for one move, in steps.
///
/// Immutable per move. Validity is checked by the profile generator, not here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConstraints {
    /// Maximum velocity in steps/sec.
    pub max_velocity: f32,
    /// Maximum acceleration in steps/sec².
    pub max_acceleration: f32,
    /// Maximum jerk in steps/sec³ (S-curve only).
    pub max_jerk: f32,
    /// Velocity at the start and end of the move, in `[0, max_velocity)`.
    pub start_velocity: f32,
    /// Ramp shape.
    pub shape: ProfileShape,
}

impl MotionConstraints {
    /// Jerk-limited constraints starting from rest.
    pub const fn s_curve(max_velocity: f32, max_acceleration: f32, max_jerk: f32) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            max_jerk,
            start_velocity: 0.0,
            shape: ProfileShape::SCurve,
        }
    }

    /// Constant-acceleration constraints starting from rest.
    pub const fn trapezoidal(max_velocity: f32, max_acceleration: f32) -> Self {
        Self {
            max_velocity,
            max_acceleration,
            max_jerk: 0.0,
            start_velocity: 0.0,
            shape: ProfileShape::Trapezoidal,
        }
    }

    /// Set the start (and end) velocity.
    pub const fn with_start_velocity(mut self, start_velocity: f32) -> Self {
        self.start_velocity = start_velocity;
        self
    }

    /// Scale velocity, acceleration and jerk limits.
    ///
    /// Jerk follows the acceleration factor so ramp proportions are kept.
    pub fn scaled(mut self, velocity_factor: f32, acceleration_factor: f32) -> Self {
        self.max_velocity *= velocity_factor;
        self.max_acceleration *= acceleration_factor;
        self.max_jerk *= acceleration_factor;
        if self.start_velocity >= self.max_velocity {
            self.start_velocity = 0.0;
        }
        self
    }

    /// Whether every parameter the shape uses is finite and positive,
    /// and the start velocity lies in `[0, max_velocity)`.
    pub fn is_valid(&self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        let jerk_ok = match self.shape {
            ProfileShape::SCurve => positive(self.max_jerk),
            ProfileShape::Trapezoidal => true,
        };

        positive(self.max_velocity)
            && positive(self.max_acceleration)
            && jerk_ok
            && self.start_velocity.is_finite()
            && self.start_velocity >= 0.0
            && self.start_velocity < self.max_velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(MotionConstraints::s_curve(500.0, 1000.0, 5000.0).is_valid());
        assert!(MotionConstraints::trapezoidal(500.0, 1000.0).is_valid());
        assert!(!MotionConstraints::s_curve(500.0, 1000.0, 0.0).is_valid());
        assert!(!MotionConstraints::trapezoidal(0.0, 1000.0).is_valid());
        assert!(!MotionConstraints::trapezoidal(500.0, -1.0).is_valid());
        assert!(!MotionConstraints::trapezoidal(500.0, f32::NAN).is_valid());
        assert!(!MotionConstraints::trapezoidal(500.0, 1000.0)
            .with_start_velocity(500.0)
            .is_valid());
    }

    #[test]
    fn test_scaled_keeps_start_velocity_below_max() {
        let c = MotionConstraints::s_curve(500.0, 1000.0, 5000.0)
            .with_start_velocity(200.0)
            .scaled(0.25, 0.5);
        assert!((c.max_velocity - 125.0).abs() < 1e-3);
        assert!((c.max_acceleration - 500.0).abs() < 1e-3);
        assert!((c.max_jerk - 2500.0).abs() < 1e-3);
        assert_eq!(c.start_velocity, 0.0);
    }
}
