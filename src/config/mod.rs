//! Configuration module for axis-motion.
//!
//! Provides types for loading and validating the axis, executor, homing and
//! named-move configuration from TOML files (with `std` feature) or
//! pre-parsed data.

mod axis;
mod executor;
mod limits;
mod mechanical;
mod moves;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::AxisConfig;
pub use executor::ExecutorConfig;
pub use limits::{LimitPolicy, SoftLimits, StepLimits};
pub use mechanical::MechanicalConstraints;
pub use moves::{HomingConfig, MoveConfig};
pub use system::SystemConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Degrees, DegreesPerSec, DegreesPerSecCubed, DegreesPerSecSquared, Micros, Microsteps};
