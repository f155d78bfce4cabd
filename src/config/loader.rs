//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::SystemConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use axis_motion::load_config;
///
/// let config = load_config("axis.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SystemConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Config(ConfigError::IoError(truncated(&e.to_string()))))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<SystemConfig> {
    let config: SystemConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(truncated(e.message()))))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

/// Copy as much of `msg` as fits.
fn truncated<const N: usize>(msg: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in msg.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::ProfileShape;

    const MINIMAL: &str = r#"
[axis]
name = "stage"
steps_per_revolution = 200
microsteps = 16
max_velocity_deg_per_sec = 360.0
max_acceleration_deg_per_sec2 = 720.0
max_jerk_deg_per_sec3 = 3600.0
"#;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config(MINIMAL).unwrap();

        assert_eq!(config.axis.name.as_str(), "stage");
        assert_eq!(config.axis.profile, ProfileShape::SCurve);
        assert_eq!(config.axis.gear_ratio, 1.0);
        assert_eq!(config.executor.tick_rate_hz, 1000);
        assert_eq!(config.homing.velocity_percent, 25);
        assert_eq!(config.move_names().count(), 0);
    }

    #[test]
    fn test_parse_with_moves() {
        let toml = r#"
[axis]
name = "stage"
steps_per_revolution = 200
microsteps = 8
max_velocity_deg_per_sec = 180.0
max_acceleration_deg_per_sec2 = 360.0
profile = "trapezoidal"

[axis.limits]
min_degrees = -90.0
max_degrees = 90.0
policy = "clamp"

[executor]
tick_rate_hz = 5000

[moves.park]
target_degrees = 0.0

[moves.sweep]
target_degrees = 85.0
velocity_percent = 50
acceleration_percent = 75
"#;

        let config = parse_config(toml).unwrap();
        assert_eq!(config.axis.profile, ProfileShape::Trapezoidal);
        assert_eq!(config.executor.tick_rate_hz, 5000);
        assert_eq!(config.executor.arrival_tolerance_steps, 0.1);

        let sweep = config.move_config("sweep").unwrap();
        assert_eq!(sweep.velocity_percent, 50);
        assert_eq!(sweep.acceleration_percent, 75);
        assert_eq!(config.move_config("park").unwrap().velocity_percent, 100);
        assert!(config.move_config("missing").is_none());
    }

    #[test]
    fn test_parse_rejects_bad_microsteps() {
        let toml = MINIMAL.replace("microsteps = 16", "microsteps = 12");
        assert!(matches!(
            parse_config(&toml),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }

    #[test]
    fn test_parse_runs_validation() {
        let toml = MINIMAL.replace("max_jerk_deg_per_sec3 = 3600.0", "max_jerk_deg_per_sec3 = 0.0");
        assert!(matches!(
            parse_config(&toml),
            Err(Error::Config(ConfigError::InvalidMaxJerk(_)))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/axis.toml"),
            Err(Error::Config(ConfigError::IoError(_)))
        ));
    }

    #[test]
    fn test_truncated_message() {
        let s: heapless::String<4> = truncated("abcdef");
        assert_eq!(s.as_str(), "abcd");
    }
}
