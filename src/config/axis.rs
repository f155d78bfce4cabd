//! Axis configuration from TOML.

use heapless::String;
use serde::Deserialize;

use crate::motion::ProfileShape;

use super::limits::SoftLimits;
use super::units::{DegreesPerSec, DegreesPerSecCubed, DegreesPerSecSquared, Microsteps};

/// Complete axis configuration from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Human-readable name (max 32 chars).
    pub name: String<32>,

    /// Base steps per revolution (typically 200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep setting (1, 2, 4, 8, 16, 32, etc.).
    pub microsteps: Microsteps,

    /// Gear ratio (output:input, e.g., 5.0 means 5:1 reduction).
    #[serde(default = "default_gear_ratio")]
    pub gear_ratio: f32,

    /// Maximum angular velocity in degrees per second.
    #[serde(rename = "max_velocity_deg_per_sec")]
    pub max_velocity: DegreesPerSec,

    /// Maximum angular acceleration in degrees per second squared.
    #[serde(rename = "max_acceleration_deg_per_sec2")]
    pub max_acceleration: DegreesPerSecSquared,

    /// Maximum angular jerk in degrees per second cubed (S-curve only).
    #[serde(default, rename = "max_jerk_deg_per_sec3")]
    pub max_jerk: DegreesPerSecCubed,

    /// Ramp shape used for every move on this axis.
    #[serde(default)]
    pub profile: ProfileShape,

    /// Invert direction pin logic.
    #[serde(default)]
    pub invert_direction: bool,

    /// Driver enable input is active low.
    #[serde(default)]
    pub enable_active_low: bool,

    /// Optional soft limits.
    #[serde(default)]
    pub limits: Option<SoftLimits>,
}

fn default_gear_ratio() -> f32 {
    1.0
}

impl AxisConfig {
    /// Calculate total steps per output shaft revolution.
    pub fn total_steps_per_revolution(&self) -> u32 {
        (self.steps_per_revolution as f32 * self.microsteps.value() as f32 * self.gear_ratio)
            as u32
    }

    /// Calculate steps per degree of output rotation.
    pub fn steps_per_degree(&self) -> f32 {
        self.total_steps_per_revolution() as f32 / 360.0
    }
}
