//! Error types for axis-motion.
//!
//! Provides unified error handling across configuration, motion execution and
//! the operational state machine.

use core::fmt;

use crate::state::{Event, OperatingState};

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all axis-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Motion profile or execution error
    Motion(MotionError),
    /// Operational state machine error
    State(StateError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Invalid gear ratio (must be > 0)
    InvalidGearRatio(f32),
    /// Invalid max velocity (must be > 0)
    InvalidMaxVelocity(f32),
    /// Invalid max acceleration (must be > 0)
    InvalidMaxAcceleration(f32),
    /// Invalid max jerk (must be > 0)
    InvalidMaxJerk(f32),
    /// Invalid soft limits (min must be < max)
    InvalidSoftLimits {
        /// Minimum limit value
        min: f32,
        /// Maximum limit value
        max: f32,
    },
    /// Invalid executor tick rate (must be > 0)
    InvalidTickRate(u32),
    /// Invalid arrival tolerance (must be > 0)
    InvalidTolerance(f32),
    /// Invalid velocity percent (must be 1-100)
    InvalidVelocityPercent(u8),
    /// Invalid acceleration percent (must be 1-100)
    InvalidAccelerationPercent(u8),
    /// Named move not found in configuration
    MoveNotFound(heapless::String<32>),
    /// Named move target lies outside rejecting soft limits
    TargetExceedsLimits {
        /// Target position in degrees
        target: f32,
        /// Minimum limit in degrees
        min: f32,
        /// Maximum limit in degrees
        max: f32,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion profile and execution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A move is already running on the executor
    Busy,
    /// The profile generator rejected the move (a physical parameter is <= 0)
    InvalidConstraints,
    /// Target position lies outside the soft limits
    LimitExceeded {
        /// Requested target in steps
        target: f32,
        /// Limit that was exceeded (min or max) in steps
        limit: f32,
    },
}

/// Operational state machine errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The event is not legal in the current state; the state is unchanged
    RejectedTransition {
        /// State the machine was (and still is) in
        state: OperatingState,
        /// Event that was rejected
        event: Event,
    },
    /// A command requires the `Ready` state
    NotReady(OperatingState),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::State(e) => write!(f, "State error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidGearRatio(v) => write!(f, "Invalid gear ratio: {}. Must be > 0", v),
            ConfigError::InvalidMaxVelocity(v) => write!(f, "Invalid max velocity: {}. Must be > 0", v),
            ConfigError::InvalidMaxAcceleration(v) => write!(f, "Invalid max acceleration: {}. Must be > 0", v),
            ConfigError::InvalidMaxJerk(v) => write!(f, "Invalid max jerk: {}. Must be > 0", v),
            ConfigError::InvalidSoftLimits { min, max } => {
                write!(f, "Invalid soft limits: min ({}) must be < max ({})", min, max)
            }
            ConfigError::InvalidTickRate(v) => write!(f, "Invalid tick rate: {} Hz. Must be > 0", v),
            ConfigError::InvalidTolerance(v) => write!(f, "Invalid arrival tolerance: {}. Must be > 0", v),
            ConfigError::InvalidVelocityPercent(v) => write!(f, "Invalid velocity percent: {}. Must be 1-100", v),
            ConfigError::InvalidAccelerationPercent(v) => write!(f, "Invalid acceleration percent: {}. Must be 1-100", v),
            ConfigError::MoveNotFound(name) => write!(f, "Move '{}' not found", name),
            ConfigError::TargetExceedsLimits { target, min, max } => {
                write!(f, "Target position {} exceeds limits [{}, {}]", target, min, max)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::Busy => write!(f, "A move is already in progress"),
            MotionError::InvalidConstraints => {
                write!(f, "Motion constraints rejected by the profile generator")
            }
            MotionError::LimitExceeded { target, limit } => {
                write!(f, "Target {} exceeds limit {}", target, limit)
            }
        }
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::RejectedTransition { state, event } => {
                write!(f, "Event {} rejected in state {}", event, state)
            }
            StateError::NotReady(state) => write!(f, "Axis not ready (state {})", state),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<StateError> for Error {
    fn from(e: StateError) -> Self {
        Error::State(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for StateError {}
