//! # axis-motion
//!
//! Jerk-limited single-axis motion control: closed-form motion profiles, a
//! tick-driven executor and an operational state machine.
//!
//! ## Features
//!
//! - **Closed-form profiles**: 7-segment S-curve or 3-segment trapezoidal
//!   ramps, with reduced-peak handling for short moves
//! - **Time-driven execution**: profiles are sampled on every control tick,
//!   allocation-free and in bounded time
//! - **Operating-mode discipline**: a total, inspectable transition table
//!   with exit/transition/entry hooks
//! - **Configuration-driven**: axis limits and named moves from TOML
//! - **embedded-hal 1.0**: `OutputPin`-based direction/enable actuation
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axis_motion::{AxisController, Degrees, Micros};
//!
//! let config = axis_motion::load_config("axis.toml")?;
//! let mut axis = AxisController::new(&config);
//!
//! axis.initialize()?;
//! axis.enable()?;
//! axis.move_to(Degrees(90.0), clock.now())?;
//!
//! loop {
//!     axis.tick(clock.now());
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod logging;

// Core modules
pub mod actuator;
pub mod config;
pub mod controller;
pub mod error;
pub mod motion;
pub mod state;

// Re-exports for ergonomic API
pub use actuator::{Actuator, FnActuator, NullActuator, PinActuator, StepRateSink};
pub use config::{validate_config, ExecutorConfig, MechanicalConstraints, SystemConfig};
pub use controller::{AxisController, ControllerStatus};
pub use error::{Error, Result};
pub use motion::{
    sample, Direction, ExecutorState, ExecutorStatus, KinematicState, MotionConstraints,
    MotionExecutor, MotionPhase, MoveOutcome, Profile, ProfileShape,
};
pub use state::{Event, OperatingState, OperationalStateMachine, StateHooks, Transition};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Degrees, DegreesPerSec, DegreesPerSecSquared, Micros, Microsteps};
