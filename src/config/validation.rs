//! Configuration validation.

use crate::error::{ConfigError, Error, Result};
use crate::motion::ProfileShape;

use super::limits::{LimitPolicy, SoftLimits};
use super::units::Degrees;
use super::{AxisConfig, ExecutorConfig, HomingConfig, MoveConfig, SystemConfig};

/// Validate a system configuration.
///
/// Checks:
/// - Axis kinematic limits are positive (jerk only for S-curve axes)
/// - Soft limits are valid (min < max)
/// - Executor tick rate and tolerance are positive
/// - Velocity/acceleration percentages are in range
/// - Move and homing targets respect rejecting soft limits
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_axis(&config.axis)?;
    validate_executor(&config.executor)?;

    let limits = config.axis.limits.as_ref();

    validate_homing(&config.homing, limits)?;

    for (_name, mv) in config.moves.iter() {
        validate_move(mv, limits)?;
    }

    Ok(())
}

fn validate_axis(config: &AxisConfig) -> Result<()> {
    // Gear ratio must be positive
    if !positive(config.gear_ratio) {
        return Err(Error::Config(ConfigError::InvalidGearRatio(config.gear_ratio)));
    }

    if !positive(config.max_velocity.0) {
        return Err(Error::Config(ConfigError::InvalidMaxVelocity(
            config.max_velocity.0,
        )));
    }

    if !positive(config.max_acceleration.0) {
        return Err(Error::Config(ConfigError::InvalidMaxAcceleration(
            config.max_acceleration.0,
        )));
    }

    // Jerk is only used by S-curve ramps
    if config.profile == ProfileShape::SCurve && !positive(config.max_jerk.0) {
        return Err(Error::Config(ConfigError::InvalidMaxJerk(config.max_jerk.0)));
    }

    if let Some(ref limits) = config.limits {
        if !limits.is_valid() {
            return Err(Error::Config(ConfigError::InvalidSoftLimits {
                min: limits.min.0,
                max: limits.max.0,
            }));
        }
    }

    Ok(())
}

fn validate_executor(config: &ExecutorConfig) -> Result<()> {
    if config.tick_rate_hz == 0 {
        return Err(Error::Config(ConfigError::InvalidTickRate(config.tick_rate_hz)));
    }

    if !positive(config.arrival_tolerance_steps) {
        return Err(Error::Config(ConfigError::InvalidTolerance(
            config.arrival_tolerance_steps,
        )));
    }

    Ok(())
}

fn validate_homing(config: &HomingConfig, limits: Option<&SoftLimits>) -> Result<()> {
    validate_percent(config.velocity_percent, ConfigError::InvalidVelocityPercent)?;
    validate_target(config.position_degrees, limits)
}

fn validate_move(config: &MoveConfig, limits: Option<&SoftLimits>) -> Result<()> {
    validate_percent(config.velocity_percent, ConfigError::InvalidVelocityPercent)?;
    validate_percent(
        config.acceleration_percent,
        ConfigError::InvalidAccelerationPercent,
    )?;
    validate_target(config.target_degrees, limits)
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn validate_percent(value: u8, err: fn(u8) -> ConfigError) -> Result<()> {
    if value == 0 || value > 100 {
        return Err(Error::Config(err(value)));
    }
    Ok(())
}

fn validate_target(target: Degrees, limits: Option<&SoftLimits>) -> Result<()> {
    // Clamp policy targets are clipped at run time
    if let Some(limits) = limits {
        if limits.policy == LimitPolicy::Reject && !limits.contains(target) {
            return Err(Error::Config(ConfigError::TargetExceedsLimits {
                target: target.0,
                min: limits.min.0,
                max: limits.max.0,
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::{DegreesPerSec, DegreesPerSecCubed, DegreesPerSecSquared, Microsteps};

    fn axis() -> AxisConfig {
        AxisConfig {
            name: heapless::String::try_from("test").unwrap(),
            steps_per_revolution: 200,
            microsteps: Microsteps::SIXTEENTH,
            gear_ratio: 1.0,
            max_velocity: DegreesPerSec(360.0),
            max_acceleration: DegreesPerSecSquared(720.0),
            max_jerk: DegreesPerSecCubed(3600.0),
            profile: ProfileShape::SCurve,
            invert_direction: false,
            enable_active_low: false,
            limits: None,
        }
    }

    #[test]
    fn test_invalid_gear_ratio() {
        let config = AxisConfig {
            gear_ratio: -1.0,
            ..axis()
        };

        assert!(matches!(
            validate_axis(&config),
            Err(Error::Config(ConfigError::InvalidGearRatio(_)))
        ));
    }

    #[test]
    fn test_jerk_required_for_s_curve_only() {
        let s_curve = AxisConfig {
            max_jerk: DegreesPerSecCubed(0.0),
            ..axis()
        };
        assert!(matches!(
            validate_axis(&s_curve),
            Err(Error::Config(ConfigError::InvalidMaxJerk(_)))
        ));

        let trapezoidal = AxisConfig {
            profile: ProfileShape::Trapezoidal,
            ..s_curve
        };
        assert!(validate_axis(&trapezoidal).is_ok());
    }

    #[test]
    fn test_nan_velocity_rejected() {
        let config = AxisConfig {
            max_velocity: DegreesPerSec(f32::NAN),
            ..axis()
        };
        assert!(validate_axis(&config).is_err());
    }

    #[test]
    fn test_percent_range() {
        let mv = |v, a| MoveConfig {
            target_degrees: Degrees(0.0),
            velocity_percent: v,
            acceleration_percent: a,
        };

        assert!(validate_move(&mv(100, 1), None).is_ok());
        assert!(matches!(
            validate_move(&mv(0, 50), None),
            Err(Error::Config(ConfigError::InvalidVelocityPercent(0)))
        ));
        assert!(matches!(
            validate_move(&mv(50, 101), None),
            Err(Error::Config(ConfigError::InvalidAccelerationPercent(101)))
        ));
    }

    #[test]
    fn test_target_against_limits() {
        let reject = SoftLimits::new(Degrees(-10.0), Degrees(10.0), LimitPolicy::Reject);
        let clamp = SoftLimits::new(Degrees(-10.0), Degrees(10.0), LimitPolicy::Clamp);

        assert!(validate_target(Degrees(20.0), Some(&reject)).is_err());
        assert!(validate_target(Degrees(20.0), Some(&clamp)).is_ok());
        assert!(validate_target(Degrees(5.0), Some(&reject)).is_ok());
    }

    #[test]
    fn test_executor_settings() {
        let bad_rate = ExecutorConfig {
            tick_rate_hz: 0,
            ..Default::default()
        };
        assert!(matches!(
            validate_executor(&bad_rate),
            Err(Error::Config(ConfigError::InvalidTickRate(0)))
        ));

        let bad_tol = ExecutorConfig {
            arrival_tolerance_steps: 0.0,
            ..Default::default()
        };
        assert!(validate_executor(&bad_tol).is_err());
    }
}
