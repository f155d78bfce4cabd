//! Motion execution - time-driven profile sampling.

use libm::fabsf;

use crate::actuator::{Actuator, NullActuator};
use crate::config::units::Micros;
use crate::config::ExecutorConfig;
use crate::error::MotionError;

use super::constraints::MotionConstraints;
use super::profile::{MotionPhase, Profile};
use super::sampler::sample;

/// Executor lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExecutorState {
    /// No move loaded, or the last one was cancelled.
    #[default]
    Idle,
    /// A move is being sampled on every tick.
    Running,
    /// The last move reached its target.
    Completed,
    /// The last move was rejected by the profile generator.
    Faulted,
}

/// Direction of travel along the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Increasing position.
    #[default]
    Forward,
    /// Decreasing position.
    Reverse,
}

impl Direction {
    /// Direction of a signed displacement (zero counts as forward).
    #[inline]
    pub fn of(displacement: f32) -> Self {
        if displacement < 0.0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Sign multiplier (+1.0 or -1.0).
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    /// Check if this is the forward direction.
    #[inline]
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

/// Result of an accepted move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveOutcome {
    /// A profile was generated and the executor is running.
    Started,
    /// The target was within tolerance; the executor went straight to `Completed`.
    AlreadyAtTarget,
}

/// Consistent snapshot of the executor, safe to copy out of the control loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecutorStatus {
    /// Lifecycle state.
    pub state: ExecutorState,
    /// Position in steps.
    pub current_position: f32,
    /// Signed velocity in steps/sec.
    pub current_velocity: f32,
    /// Target of the current or last move, in steps.
    pub target_position: f32,
    /// Fraction of the move duration elapsed, in `[0, 1]`.
    pub progress: f32,
}

/// Tick-driven executor for single-axis moves.
///
/// Owns at most one profile at a time. `tick` is allocation-free and does a
/// bounded amount of work; callers serialise access across contexts.
#[derive(Debug)]
pub struct MotionExecutor<A: Actuator = NullActuator> {
    actuator: A,
    config: ExecutorConfig,
    state: ExecutorState,
    profile: Profile,
    direction: Direction,
    start_time: Micros,
    start_position: f32,
    current_position: f32,
    current_velocity: f32,
    target_position: f32,
    /// Elapsed seconds at the last tick of the running move.
    last_elapsed: f32,
    phase: MotionPhase,
}

impl MotionExecutor<NullActuator> {
    /// Create an executor with no actuation sink.
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_actuator(config, NullActuator)
    }
}

impl<A: Actuator> MotionExecutor<A> {
    /// Create an executor that reports to `actuator`.
    pub fn with_actuator(config: ExecutorConfig, actuator: A) -> Self {
        Self {
            actuator,
            config,
            state: ExecutorState::Idle,
            profile: Profile::invalid(),
            direction: Direction::Forward,
            start_time: Micros(0),
            start_position: 0.0,
            current_position: 0.0,
            current_velocity: 0.0,
            target_position: 0.0,
            last_elapsed: 0.0,
            phase: MotionPhase::Complete,
        }
    }

    /// Start a move to `target` (steps) at time `now`.
    ///
    /// Accepted from any state except `Running`, including `Faulted`.
    ///
    /// # Errors
    ///
    /// - `MotionError::Busy` while a move is running; nothing changes.
    /// - `MotionError::InvalidConstraints` when the profile generator rejects
    ///   the move; the executor enters `Faulted`.
    pub fn request_move(
        &mut self,
        target: f32,
        constraints: &MotionConstraints,
        now: Micros,
    ) -> Result<MoveOutcome, MotionError> {
        if self.state == ExecutorState::Running {
            return Err(MotionError::Busy);
        }

        let displacement = target - self.current_position;
        let distance = fabsf(displacement);

        if distance < self.config.arrival_tolerance_steps {
            self.current_position = target;
            self.current_velocity = 0.0;
            self.target_position = target;
            self.phase = MotionPhase::Complete;
            self.state = ExecutorState::Completed;
            return Ok(MoveOutcome::AlreadyAtTarget);
        }

        let profile = Profile::generate(distance, constraints);
        if !profile.is_valid() {
            log_warn!("profile rejected for move to {} steps", target);
            self.current_velocity = 0.0;
            self.phase = MotionPhase::Complete;
            self.state = ExecutorState::Faulted;
            return Err(MotionError::InvalidConstraints);
        }

        self.profile = profile;
        self.direction = Direction::of(displacement);
        self.start_time = now;
        self.start_position = self.current_position;
        self.target_position = target;
        self.last_elapsed = 0.0;
        self.phase = MotionPhase::Accelerating;
        self.state = ExecutorState::Running;

        self.actuator.set_direction(self.direction.is_forward());

        log_debug!(
            "move {} -> {} steps, {} s",
            self.start_position,
            target,
            self.profile.total_time()
        );

        Ok(MoveOutcome::Started)
    }

    /// Abandon any move and go `Idle` at the current position.
    ///
    /// Idempotent, never blocks; the zero-velocity command is repeated on
    /// every call.
    pub fn cancel(&mut self) {
        self.current_velocity = 0.0;
        self.phase = MotionPhase::Complete;
        self.state = ExecutorState::Idle;
        self.actuator.set_velocity(0.0);
    }

    /// Clear `Faulted` (or any other state) back to `Idle` without moving.
    pub fn reset(&mut self) {
        self.cancel();
        self.profile = Profile::invalid();
        self.last_elapsed = 0.0;
    }

    /// Advance the running move to `now`. No-op unless `Running`.
    ///
    /// Returns the state after the tick.
    pub fn tick(&mut self, now: Micros) -> ExecutorState {
        if self.state != ExecutorState::Running {
            return self.state;
        }

        let elapsed = now.secs_since(self.start_time);
        self.last_elapsed = elapsed;

        let kin = sample(&self.profile, elapsed);

        if kin.is_complete {
            self.current_position = self.target_position;
            self.current_velocity = 0.0;
            self.phase = MotionPhase::Complete;
            self.state = ExecutorState::Completed;
            self.actuator.set_velocity(0.0);
            log_info!("move complete at {} steps", self.current_position);
        } else {
            let sign = self.direction.sign();
            self.current_position = self.start_position + sign * kin.position;
            self.current_velocity = sign * kin.velocity;
            self.phase = kin.motion_phase;
            self.actuator.set_velocity(kin.velocity);
        }

        self.state
    }

    /// Snapshot of the executor.
    pub fn status(&self) -> ExecutorStatus {
        ExecutorStatus {
            state: self.state,
            current_position: self.current_position,
            current_velocity: self.current_velocity,
            target_position: self.target_position,
            progress: self.progress(),
        }
    }

    fn progress(&self) -> f32 {
        match self.state {
            ExecutorState::Running => {
                let total = self.profile.total_time();
                if total > 0.0 {
                    (self.last_elapsed / total).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            ExecutorState::Completed => 1.0,
            ExecutorState::Idle | ExecutorState::Faulted => 0.0,
        }
    }

    /// Re-reference the axis: the current position becomes `position` steps.
    ///
    /// # Errors
    ///
    /// `MotionError::Busy` while a move is running.
    pub fn set_position(&mut self, position: f32) -> Result<(), MotionError> {
        if self.state == ExecutorState::Running {
            return Err(MotionError::Busy);
        }
        self.current_position = position;
        self.target_position = position;
        Ok(())
    }

    /// Get the lifecycle state.
    #[inline]
    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Check if a move is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == ExecutorState::Running
    }

    /// Coarse phase at the last tick.
    #[inline]
    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Get the current position in steps.
    #[inline]
    pub fn position(&self) -> f32 {
        self.current_position
    }

    /// Direction of the current or last move.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Profile of the current or last move.
    #[inline]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Get the executor configuration.
    #[inline]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Get the actuator.
    #[inline]
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Get the actuator mutably.
    #[inline]
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// Consume the executor, returning its actuator.
    pub fn into_actuator(self) -> A {
        self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        velocities: heapless::Vec<f32, 512>,
        directions: heapless::Vec<bool, 8>,
    }

    impl Actuator for Recorder {
        fn set_velocity(&mut self, v: f32) {
            let _ = self.velocities.push(v);
        }

        fn set_direction(&mut self, forward: bool) {
            let _ = self.directions.push(forward);
        }
    }

    fn scenario_a() -> MotionConstraints {
        MotionConstraints::trapezoidal(500.0, 1000.0)
    }

    fn executor() -> MotionExecutor<Recorder> {
        MotionExecutor::with_actuator(ExecutorConfig::default(), Recorder::default())
    }

    #[test]
    fn test_move_runs_to_completion() {
        let mut ex = executor();
        let start = Micros::from_millis(10);

        assert_eq!(ex.request_move(1000.0, &scenario_a(), start), Ok(MoveOutcome::Started));
        assert_eq!(ex.state(), ExecutorState::Running);
        assert_eq!(ex.actuator().directions.as_slice(), &[true]);

        let mut now = start;
        while ex.tick(now) == ExecutorState::Running {
            let status = ex.status();
            assert!(status.current_velocity >= 0.0);
            assert!(status.current_velocity <= 500.0 + 1e-3);
            now = now + 10_000;
        }

        let status = ex.status();
        assert_eq!(status.state, ExecutorState::Completed);
        assert_eq!(status.current_position, 1000.0);
        assert_eq!(status.current_velocity, 0.0);
        assert_eq!(status.progress, 1.0);
        assert_eq!(ex.actuator().velocities.last(), Some(&0.0));
        // 2.5 s at 10 ms per tick
        assert!(now.secs_since(start) >= 2.5);
        assert!(now.secs_since(start) < 2.52);
    }

    #[test]
    fn test_reverse_move() {
        let mut ex = executor();
        ex.set_position(200.0).unwrap();
        ex.request_move(100.0, &scenario_a(), Micros(0)).unwrap();
        assert_eq!(ex.direction(), Direction::Reverse);
        assert_eq!(ex.actuator().directions.as_slice(), &[false]);

        ex.tick(Micros::from_millis(200));
        let status = ex.status();
        assert!(status.current_position < 200.0);
        assert!(status.current_velocity < 0.0);
        assert!(*ex.actuator().velocities.last().unwrap() > 0.0);

        ex.tick(Micros::from_secs_f32(1.0));
        assert_eq!(ex.position(), 100.0);
    }

    #[test]
    fn test_busy_leaves_move_untouched() {
        let mut ex = executor();
        ex.request_move(1000.0, &scenario_a(), Micros(0)).unwrap();
        ex.tick(Micros::from_millis(100));
        let before = ex.status();
        let total = ex.profile().total_time();

        let err = ex.request_move(-50.0, &scenario_a(), Micros::from_millis(100));
        assert_eq!(err, Err(MotionError::Busy));
        assert_eq!(ex.status(), before);
        assert_eq!(ex.profile().total_time(), total);
        assert_eq!(ex.direction(), Direction::Forward);
    }

    #[test]
    fn test_within_tolerance_completes_immediately() {
        let mut ex = executor();
        ex.set_position(10.0).unwrap();

        // invalid constraints prove the generator is never consulted
        let bogus = MotionConstraints::trapezoidal(0.0, 0.0);
        assert_eq!(
            ex.request_move(10.05, &bogus, Micros(0)),
            Ok(MoveOutcome::AlreadyAtTarget)
        );
        assert_eq!(ex.state(), ExecutorState::Completed);
        assert_eq!(ex.position(), 10.05);
        assert!(ex.actuator().directions.is_empty());
    }

    #[test]
    fn test_tolerance_uses_distance_magnitude() {
        let mut ex = executor();
        ex.set_position(10.0).unwrap();
        let bogus = MotionConstraints::trapezoidal(0.0, 0.0);

        assert_eq!(
            ex.request_move(9.95, &bogus, Micros(0)),
            Ok(MoveOutcome::AlreadyAtTarget)
        );
        assert_eq!(ex.position(), 9.95);

        // just outside the band on the reverse side reaches the generator
        assert_eq!(
            ex.request_move(9.8, &bogus, Micros(0)),
            Err(MotionError::InvalidConstraints)
        );

        ex.reset();
        assert_eq!(ex.request_move(9.15, &scenario_a(), Micros(0)), Ok(MoveOutcome::Started));
        assert_eq!(ex.direction(), Direction::Reverse);
        assert!((ex.profile().target_distance() - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_generator_rejection_faults() {
        let mut ex = executor();
        let bogus = MotionConstraints::s_curve(500.0, 1000.0, -1.0);

        assert_eq!(
            ex.request_move(100.0, &bogus, Micros(0)),
            Err(MotionError::InvalidConstraints)
        );
        assert_eq!(ex.state(), ExecutorState::Faulted);
        assert_eq!(ex.status().progress, 0.0);

        // ticking does not self-heal
        assert_eq!(ex.tick(Micros::from_millis(50)), ExecutorState::Faulted);

        ex.reset();
        assert_eq!(ex.state(), ExecutorState::Idle);
        assert_eq!(ex.request_move(100.0, &scenario_a(), Micros(0)), Ok(MoveOutcome::Started));
    }

    #[test]
    fn test_new_move_allowed_after_fault() {
        let mut ex = executor();
        let _ = ex.request_move(100.0, &MotionConstraints::trapezoidal(-1.0, 1.0), Micros(0));
        assert_eq!(ex.state(), ExecutorState::Faulted);
        assert!(ex.request_move(100.0, &scenario_a(), Micros(0)).is_ok());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut ex = executor();
        ex.request_move(1000.0, &scenario_a(), Micros(0)).unwrap();
        ex.tick(Micros::from_millis(300));
        let pos = ex.position();

        ex.cancel();
        ex.cancel();
        assert_eq!(ex.state(), ExecutorState::Idle);
        assert_eq!(ex.position(), pos);
        assert_eq!(ex.status().current_velocity, 0.0);
        assert_eq!(ex.status().progress, 0.0);

        let v = &ex.actuator().velocities;
        assert_eq!(&v[v.len() - 2..], &[0.0, 0.0]);

        // further ticks do nothing
        let n = v.len();
        ex.tick(Micros::from_millis(400));
        assert_eq!(ex.actuator().velocities.len(), n);
    }

    #[test]
    fn test_progress_tracks_last_tick() {
        let mut ex = executor();
        ex.request_move(1000.0, &scenario_a(), Micros::from_millis(1000)).unwrap();
        assert_eq!(ex.status().progress, 0.0);

        ex.tick(Micros::from_millis(1000 + 1250));
        assert!((ex.status().progress - 0.5).abs() < 1e-4);
        assert_eq!(ex.phase(), MotionPhase::Cruising);
    }

    #[test]
    fn test_clock_before_start_counts_as_zero() {
        let mut ex = executor();
        ex.request_move(1000.0, &scenario_a(), Micros::from_millis(500)).unwrap();
        ex.tick(Micros::from_millis(100));
        assert_eq!(ex.state(), ExecutorState::Running);
        assert_eq!(ex.position(), 0.0);
    }

    #[test]
    fn test_set_position_rejected_while_running() {
        let mut ex = executor();
        ex.request_move(10.0, &scenario_a(), Micros(0)).unwrap();
        assert_eq!(ex.set_position(0.0), Err(MotionError::Busy));
    }
}
