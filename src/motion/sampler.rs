//! Trajectory sampling.
//!
//! Pure evaluation of a [`Profile`] at an elapsed time. Bounded work: a scan
//! over at most seven boundaries and one cubic evaluation.

use super::profile::{MotionPhase, Profile};

/// Kinematic state of a move at one instant.
///
/// All quantities are magnitudes along the move; the caller applies the
/// direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KinematicState {
    /// Distance covered so far, in `[0, target_distance]`.
    pub position: f32,
    /// Speed, never negative.
    pub velocity: f32,
    /// Signed acceleration.
    pub acceleration: f32,
    /// 1-based index of the active segment (0 once complete).
    pub phase: u8,
    /// Coarse phase of the active segment.
    pub motion_phase: MotionPhase,
    /// Elapsed time reached the end of the profile.
    pub is_complete: bool,
}

impl KinematicState {
    fn complete(distance: f32) -> Self {
        Self {
            position: distance,
            velocity: 0.0,
            acceleration: 0.0,
            phase: 0,
            motion_phase: MotionPhase::Complete,
            is_complete: true,
        }
    }
}

/// Sample `profile` at `elapsed` seconds from the start of the move.
///
/// `elapsed` is clamped to `[0, total_time]`; at or past the end the move is
/// reported complete at `target_distance` with zero velocity. An invalid
/// profile describes no motion and samples as complete at zero.
pub fn sample(profile: &Profile, elapsed: f32) -> KinematicState {
    if !profile.is_valid() {
        return KinematicState::complete(0.0);
    }

    let total = profile.total_time();
    let distance = profile.target_distance();
    let t = if elapsed.is_nan() { 0.0 } else { elapsed.max(0.0) };

    if t >= total {
        return KinematicState::complete(distance);
    }

    let boundaries = profile.boundaries();
    let segments = profile.segments();

    // first boundary t[i] >= t closes the active segment i - 1
    let index = boundaries[1..]
        .iter()
        .position(|&end| end >= t)
        .unwrap_or(segments.len() - 1);

    let segment = &segments[index];
    let (position, velocity, acceleration) = segment.evaluate(t - boundaries[index]);

    KinematicState {
        position: position.clamp(0.0, distance),
        velocity: velocity.max(0.0),
        acceleration,
        phase: (index + 1) as u8,
        motion_phase: segment.phase,
        is_complete: false,
    }
}
