//! Soft limit configuration and types.

use serde::Deserialize;

use super::units::Degrees;

/// Policy for handling limit violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Reject moves that would exceed limits.
    #[default]
    Reject,
    /// Clamp target to nearest limit.
    Clamp,
}

/// Soft limits in degrees (from configuration).
#[derive(Debug, Clone, Deserialize)]
pub struct SoftLimits {
    /// Minimum allowed position in degrees.
    #[serde(rename = "min_degrees")]
    pub min: Degrees,

    /// Maximum allowed position in degrees.
    #[serde(rename = "max_degrees")]
    pub max: Degrees,

    /// What to do when limit is exceeded.
    #[serde(default)]
    pub policy: LimitPolicy,
}

impl SoftLimits {
    /// Create new soft limits.
    pub fn new(min: Degrees, max: Degrees, policy: LimitPolicy) -> Self {
        Self { min, max, policy }
    }

    /// Check if limits are valid (min < max).
    pub fn is_valid(&self) -> bool {
        self.min.0 < self.max.0
    }

    /// Check if a position is within limits.
    pub fn contains(&self, position: Degrees) -> bool {
        position.0 >= self.min.0 && position.0 <= self.max.0
    }
}

/// Soft limits converted to steps (for runtime use).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLimits {
    /// Minimum position in steps.
    pub min_steps: f32,
    /// Maximum position in steps.
    pub max_steps: f32,
    /// Limit policy.
    pub policy: LimitPolicy,
}

impl StepLimits {
    /// Create step limits from soft limits and steps per degree.
    pub fn from_soft_limits(soft: &SoftLimits, steps_per_degree: f32) -> Self {
        Self {
            min_steps: soft.min.to_steps(steps_per_degree),
            max_steps: soft.max.to_steps(steps_per_degree),
            policy: soft.policy,
        }
    }

    /// Check if a position is within limits.
    pub fn contains(&self, steps: f32) -> bool {
        steps >= self.min_steps && steps <= self.max_steps
    }

    /// Apply limit policy to a target position.
    ///
    /// Returns `Ok(steps)` if valid or clamped, `Err(limit)` with the
    /// violated limit if rejected.
    pub fn apply(&self, target: f32) -> Result<f32, f32> {
        if self.contains(target) {
            return Ok(target);
        }

        let limit = if target < self.min_steps {
            self.min_steps
        } else {
            self.max_steps
        };

        match self.policy {
            LimitPolicy::Reject => Err(limit),
            LimitPolicy::Clamp => Ok(limit),
        }
    }
}
