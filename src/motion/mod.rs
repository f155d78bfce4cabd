//! Motion module for axis-motion.
//!
//! Profile generation, trajectory sampling and tick-driven execution.

mod constraints;
mod executor;
mod profile;
mod sampler;

pub use constraints::{MotionConstraints, ProfileShape};
pub use executor::{Direction, ExecutorState, ExecutorStatus, MotionExecutor, MoveOutcome};
pub use profile::{MotionPhase, Profile, SegmentKind, MAX_SEGMENTS};
pub use sampler::{sample, KinematicState};
