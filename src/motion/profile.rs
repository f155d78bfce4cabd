//! Motion profile generation.
//!
//! Closed-form, symmetric profiles: a ramp from the start velocity up to the
//! peak, an optional cruise, and the mirrored ramp back down. S-curve ramps
//! are split into jerk-up, constant acceleration and jerk-down segments; the
//! trapezoidal shape uses a single constant-acceleration segment per ramp.
//!
//! Each segment stores the kinematic state at its start, seeded from the end
//! of the preceding segment, so position and velocity are continuous across
//! every boundary by construction.

use libm::{cbrt, sqrt, sqrtf};

use super::constraints::{MotionConstraints, ProfileShape};
use super::sampler::{sample, KinematicState};

/// Maximum number of segments in a profile.
pub const MAX_SEGMENTS: usize = 7;

/// Coarse phase of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    /// Ramping up toward the peak velocity.
    Accelerating,
    /// Holding the peak velocity.
    Cruising,
    /// Ramping down from the peak velocity.
    Decelerating,
    /// Motion complete.
    #[default]
    Complete,
}

/// Polynomial type of a profile segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SegmentKind {
    /// Acceleration linear in time (jerk-limited sub-phase).
    Jerk,
    /// Constant non-zero acceleration.
    ConstantAcceleration,
    /// Zero acceleration.
    ConstantVelocity,
}

/// One segment, described by its state at the segment start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Segment {
    pub(crate) kind: SegmentKind,
    pub(crate) phase: MotionPhase,
    pub(crate) position: f32,
    pub(crate) velocity: f32,
    pub(crate) acceleration: f32,
    pub(crate) jerk: f32,
}

impl Segment {
    const EMPTY: Self = Self {
        kind: SegmentKind::ConstantVelocity,
        phase: MotionPhase::Complete,
        position: 0.0,
        velocity: 0.0,
        acceleration: 0.0,
        jerk: 0.0,
    };

    /// Position, velocity and acceleration `tau` seconds into the segment.
    #[inline]
    pub(crate) fn evaluate(&self, tau: f32) -> (f32, f32, f32) {
        let a0 = self.acceleration;
        let j = self.jerk;
        let tau2 = tau * tau;

        let acceleration = a0 + j * tau;
        let velocity = self.velocity + a0 * tau + 0.5 * j * tau2;
        let position =
            self.position + self.velocity * tau + 0.5 * a0 * tau2 + j * tau2 * tau / 6.0;

        (position, velocity, acceleration)
    }
}

/// Durations of one ramp between the start velocity and the peak velocity.
#[derive(Debug, Clone, Copy)]
struct Ramp {
    /// Duration of each jerk sub-phase (zero for trapezoidal ramps).
    jerk_time: f32,
    /// Duration of the constant-acceleration sub-phase.
    accel_time: f32,
    /// Acceleration magnitude reached in the ramp.
    peak_acceleration: f32,
}

impl Ramp {
    /// Ramp covering a velocity change of `delta_v`.
    fn new(delta_v: f32, constraints: &MotionConstraints) -> Self {
        let a = constraints.max_acceleration;
        let delta_v = delta_v.max(0.0);

        match constraints.shape {
            ProfileShape::Trapezoidal => Self {
                jerk_time: 0.0,
                accel_time: delta_v / a,
                peak_acceleration: a,
            },
            ProfileShape::SCurve => {
                let j = constraints.max_jerk;
                if delta_v >= a * a / j {
                    Self {
                        jerk_time: a / j,
                        accel_time: delta_v / a - a / j,
                        peak_acceleration: a,
                    }
                } else {
                    // max_acceleration is never reached
                    let jerk_time = sqrtf(delta_v / j);
                    Self {
                        jerk_time,
                        accel_time: 0.0,
                        peak_acceleration: j * jerk_time,
                    }
                }
            }
        }
    }

    #[inline]
    fn duration(&self) -> f32 {
        2.0 * self.jerk_time + self.accel_time
    }

    /// Displacement of the ramp; the acceleration pulse is symmetric so the
    /// mean velocity is the midpoint of the two end velocities.
    #[inline]
    fn distance(&self, v_start: f32, v_peak: f32) -> f32 {
        0.5 * (v_start + v_peak) * self.duration()
    }
}

/// Computed motion profile for one move.
///
/// Immutable once generated. Holds the magnitude of the displacement only;
/// the direction of travel belongs to the caller.
#[derive(Debug, Clone)]
pub struct Profile {
    boundaries: [f32; MAX_SEGMENTS + 1],
    segments: [Segment; MAX_SEGMENTS],
    segment_count: usize,
    total_time: f32,
    target_distance: f32,
    peak_velocity: f32,
    ramp_time: f32,
    cruise_time: f32,
    shape: ProfileShape,
    is_valid: bool,
}

impl Profile {
    /// Generate a profile covering `distance` under `constraints`.
    ///
    /// Returns an invalid profile when `distance <= 0` or when any parameter
    /// the shape relies on is not strictly positive.
    pub fn generate(distance: f32, constraints: &MotionConstraints) -> Self {
        if !(distance.is_finite() && distance > 0.0) || !constraints.is_valid() {
            return Self::invalid();
        }

        let v0 = constraints.start_velocity;
        let v_max = constraints.max_velocity;

        let full_ramp = Ramp::new(v_max - v0, constraints);
        let full_ramp_distance = full_ramp.distance(v0, v_max);

        let (peak_velocity, ramp, cruise_time) = if 2.0 * full_ramp_distance < distance {
            let cruise_time = (distance - 2.0 * full_ramp_distance) / v_max;
            (v_max, full_ramp, cruise_time)
        } else {
            let peak = reduced_peak_velocity(distance, constraints).clamp(v0, v_max);
            (peak, Ramp::new(peak - v0, constraints), 0.0)
        };

        let mut profile = Self::invalid();
        profile.shape = constraints.shape;
        profile.target_distance = distance;
        profile.peak_velocity = peak_velocity;
        profile.ramp_time = ramp.duration();
        profile.cruise_time = cruise_time;
        profile.build_segments(v0, &ramp, cruise_time, constraints);
        profile.is_valid = profile.total_time > 0.0;
        profile
    }

    /// A profile that describes no motion.
    pub const fn invalid() -> Self {
        Self {
            boundaries: [0.0; MAX_SEGMENTS + 1],
            segments: [Segment::EMPTY; MAX_SEGMENTS],
            segment_count: 0,
            total_time: 0.0,
            target_distance: 0.0,
            peak_velocity: 0.0,
            ramp_time: 0.0,
            cruise_time: 0.0,
            shape: ProfileShape::SCurve,
            is_valid: false,
        }
    }

    /// Displacement of one full ramp from the start velocity to `max_velocity`.
    ///
    /// A move longer than twice this distance reaches `max_velocity` and cruises.
    pub fn full_ramp_distance(constraints: &MotionConstraints) -> f32 {
        if !constraints.is_valid() {
            return 0.0;
        }
        let v0 = constraints.start_velocity;
        let v_max = constraints.max_velocity;
        Ramp::new(v_max - v0, constraints).distance(v0, v_max)
    }

    fn build_segments(
        &mut self,
        v0: f32,
        ramp: &Ramp,
        cruise_time: f32,
        constraints: &MotionConstraints,
    ) {
        let a = ramp.peak_acceleration;
        let mut chain = SegmentChain::new(v0);

        match constraints.shape {
            ProfileShape::SCurve => {
                let j = constraints.max_jerk;
                let tj = ramp.jerk_time;
                let ta = ramp.accel_time;
                chain.push(MotionPhase::Accelerating, tj, 0.0, j);
                chain.push(MotionPhase::Accelerating, ta, a, 0.0);
                chain.push(MotionPhase::Accelerating, tj, a, -j);
                chain.push(MotionPhase::Cruising, cruise_time, 0.0, 0.0);
                chain.push(MotionPhase::Decelerating, tj, 0.0, -j);
                chain.push(MotionPhase::Decelerating, ta, -a, 0.0);
                chain.push(MotionPhase::Decelerating, tj, -a, j);
            }
            ProfileShape::Trapezoidal => {
                let ta = ramp.accel_time;
                chain.push(MotionPhase::Accelerating, ta, a, 0.0);
                chain.push(MotionPhase::Cruising, cruise_time, 0.0, 0.0);
                chain.push(MotionPhase::Decelerating, ta, -a, 0.0);
            }
        }

        self.boundaries = chain.boundaries;
        self.segments = chain.segments;
        self.segment_count = chain.count;
        self.total_time = chain.boundaries[chain.count];
    }

    /// Sample the profile; see [`sample`].
    #[inline]
    pub fn sample(&self, elapsed: f32) -> KinematicState {
        sample(self, elapsed)
    }

    /// Check if the profile is valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Total duration in seconds.
    #[inline]
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Displacement magnitude in steps.
    #[inline]
    pub fn target_distance(&self) -> f32 {
        self.target_distance
    }

    /// Phase-boundary timestamps `t[0..=N]`, `t[0] = 0`, `t[N] = total_time`.
    #[inline]
    pub fn boundaries(&self) -> &[f32] {
        if self.segment_count == 0 {
            &[]
        } else {
            &self.boundaries[..=self.segment_count]
        }
    }

    /// Number of segments (7 for S-curve, 3 for trapezoidal, 0 if invalid).
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Polynomial type of segment `index` (0-based).
    pub fn segment_kind(&self, index: usize) -> Option<SegmentKind> {
        self.segments[..self.segment_count].get(index).map(|s| s.kind)
    }

    /// Velocity held during the cruise (or reached at the apex).
    #[inline]
    pub fn peak_velocity(&self) -> f32 {
        self.peak_velocity
    }

    /// Duration of one ramp in seconds.
    #[inline]
    pub fn ramp_time(&self) -> f32 {
        self.ramp_time
    }

    /// Duration of the constant-velocity phase in seconds.
    #[inline]
    pub fn cruise_time(&self) -> f32 {
        self.cruise_time
    }

    /// Ramp shape.
    #[inline]
    pub fn shape(&self) -> ProfileShape {
        self.shape
    }

    #[inline]
    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments[..self.segment_count]
    }
}

/// Appends segments while carrying the end state of each into the next.
struct SegmentChain {
    boundaries: [f32; MAX_SEGMENTS + 1],
    segments: [Segment; MAX_SEGMENTS],
    count: usize,
    position: f32,
    velocity: f32,
}

impl SegmentChain {
    fn new(start_velocity: f32) -> Self {
        Self {
            boundaries: [0.0; MAX_SEGMENTS + 1],
            segments: [Segment::EMPTY; MAX_SEGMENTS],
            count: 0,
            position: 0.0,
            velocity: start_velocity,
        }
    }

    fn push(&mut self, phase: MotionPhase, duration: f32, acceleration: f32, jerk: f32) {
        let kind = if jerk != 0.0 {
            SegmentKind::Jerk
        } else if acceleration != 0.0 {
            SegmentKind::ConstantAcceleration
        } else {
            SegmentKind::ConstantVelocity
        };

        let segment = Segment {
            kind,
            phase,
            position: self.position,
            velocity: self.velocity,
            acceleration,
            jerk,
        };

        let duration = duration.max(0.0);
        let (position, velocity, _) = segment.evaluate(duration);
        self.position = position;
        self.velocity = velocity;

        self.segments[self.count] = segment;
        self.boundaries[self.count + 1] = self.boundaries[self.count] + duration;
        self.count += 1;
    }
}

/// Peak velocity of a move too short to reach `max_velocity`.
///
/// Solves `2 * ramp_distance(v_peak) = distance` in closed form. Computed in
/// f64: the cubic branch cancels badly in single precision.
fn reduced_peak_velocity(distance: f32, constraints: &MotionConstraints) -> f32 {
    let d = distance as f64;
    let v0 = constraints.start_velocity as f64;
    let a = constraints.max_acceleration as f64;

    match constraints.shape {
        // (vp² - v0²) / a = d
        ProfileShape::Trapezoidal => sqrt(a * d + v0 * v0) as f32,
        ProfileShape::SCurve => {
            let j = constraints.max_jerk as f64;
            let b = a * a / j;

            // Shortest move whose ramps still reach max_acceleration.
            let edge_distance = (2.0 * v0 + b) * 2.0 * a / j;

            if d >= edge_distance {
                // (v0 + vp)((vp - v0)/a + a/j) = d
                // => vp² + b·vp + (v0·b - v0² - a·d) = 0, constant term < 0
                let c = v0 * b - v0 * v0 - a * d;
                (-2.0 * c / (b + sqrt(b * b - 4.0 * c))) as f32
            } else {
                // Pure jerk ramps, tj = s: 2(2·v0 + j·s²)·s = d
                // => s³ + p·s + q = 0 with p >= 0, single real root
                let p = 2.0 * v0 / j;
                let q = -d / (2.0 * j);
                let disc = sqrt(q * q / 4.0 + p * p * p / 27.0);
                let s = cbrt(-q / 2.0 + disc) + cbrt(-q / 2.0 - disc);
                (v0 + j * s * s) as f32
            }
        }
    }
}
