//! Supervising controller.
//!
//! Couples one [`MotionExecutor`] with one [`OperationalStateMachine`]: motion
//! commands are gated on the operating state, and executor progress observed
//! on each tick is turned into state machine events.

use crate::actuator::{Actuator, NullActuator};
use crate::config::units::{Degrees, Micros};
use crate::config::{MechanicalConstraints, SystemConfig};
use crate::error::{ConfigError, Error, MotionError, Result, StateError};
use crate::motion::{
    ExecutorState, ExecutorStatus, MotionConstraints, MotionExecutor, MotionPhase, MoveOutcome,
};
use crate::state::{Event, NoHooks, OperatingState, OperationalStateMachine, StateHooks};

/// Snapshot of the whole axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerStatus {
    /// Operating state.
    pub state: OperatingState,
    /// Executor snapshot (positions in steps).
    pub executor: ExecutorStatus,
    /// Current position in degrees.
    pub position: Degrees,
    /// Events rejected by the state machine so far.
    pub rejected_transitions: u32,
}

/// Single-axis controller owning its executor and state machine.
pub struct AxisController<A: Actuator = NullActuator, H: StateHooks = NoHooks> {
    executor: MotionExecutor<A>,
    machine: OperationalStateMachine<H>,
    mechanical: MechanicalConstraints,
    config: SystemConfig,
}

impl AxisController<NullActuator, NoHooks> {
    /// Create a controller with no actuation sink and no hooks.
    pub fn new(config: &SystemConfig) -> Self {
        Self::with_parts(config, NullActuator, NoHooks)
    }
}

impl<A: Actuator, H: StateHooks> AxisController<A, H> {
    /// Create a controller from configuration, an actuator and state hooks.
    pub fn with_parts(config: &SystemConfig, actuator: A, hooks: H) -> Self {
        Self {
            executor: MotionExecutor::with_actuator(config.executor, actuator),
            machine: OperationalStateMachine::with_hooks(hooks),
            mechanical: config.mechanical(),
            config: config.clone(),
        }
    }

    /// `Uninitialized` -> `Idle`.
    pub fn initialize(&mut self) -> Result<()> {
        self.machine.dispatch(Event::Initialize)?;
        Ok(())
    }

    /// `Idle` -> `Ready`, energising the driver.
    pub fn enable(&mut self) -> Result<()> {
        self.machine.dispatch(Event::Enable)?;
        self.executor.actuator_mut().set_enabled(true);
        Ok(())
    }

    /// `Ready` -> `Idle`, releasing the driver.
    pub fn disable(&mut self) -> Result<()> {
        self.machine.dispatch(Event::Disable)?;
        self.executor.actuator_mut().set_enabled(false);
        Ok(())
    }

    /// Move to an absolute position in degrees at full speed.
    pub fn move_to(&mut self, target: Degrees, now: Micros) -> Result<MoveOutcome> {
        self.move_to_steps(self.mechanical.degrees_to_steps(target), now)
    }

    /// Move to an absolute position in steps at full speed.
    ///
    /// # Errors
    ///
    /// - `StateError::NotReady` outside `Ready`
    /// - `MotionError::LimitExceeded` when a rejecting soft limit is violated
    /// - `MotionError::InvalidConstraints` when the axis limits cannot produce
    ///   a profile; the machine enters `Error`
    pub fn move_to_steps(&mut self, target: f32, now: Micros) -> Result<MoveOutcome> {
        self.require_ready()?;
        let constraints = self.mechanical.motion_constraints();
        self.start_move(target, &constraints, now)
    }

    /// Run a named move from the configuration.
    pub fn execute(&mut self, name: &str, now: Micros) -> Result<MoveOutcome> {
        let mv = self.config.move_config(name).ok_or_else(|| {
            let mut missing = heapless::String::new();
            for c in name.chars() {
                if missing.push(c).is_err() {
                    break;
                }
            }
            Error::Config(ConfigError::MoveNotFound(missing))
        })?;

        let target = self.mechanical.degrees_to_steps(mv.target_degrees);
        let constraints = mv.constraints(&self.mechanical);

        self.require_ready()?;
        self.start_move(target, &constraints, now)
    }

    /// Move to the configured home position at homing speed, then
    /// re-reference the axis there.
    pub fn home(&mut self, now: Micros) -> Result<MoveOutcome> {
        self.require_ready()?;

        let home = self.mechanical.degrees_to_steps(self.config.homing.position_degrees);
        let target = self.check_limits(home)?;
        let constraints = self.config.homing.constraints(&self.mechanical);

        match self.executor.request_move(target, &constraints, now) {
            Ok(outcome) => {
                self.machine.dispatch(Event::HomeCommand)?;
                if outcome == MoveOutcome::AlreadyAtTarget {
                    self.finish_homing()?;
                }
                Ok(outcome)
            }
            Err(e) => Err(self.move_failed(e)),
        }
    }

    /// Immediate stop: the executor is cancelled and a zero velocity is
    /// commanded at once. The machine passes through `Decelerating` and
    /// reaches `Ready` on the next tick; no ramp-down is generated.
    pub fn stop(&mut self) -> Result<()> {
        match self.machine.state() {
            OperatingState::Decelerating => {
                self.executor.cancel();
                Ok(())
            }
            _ => {
                self.machine.dispatch(Event::Stop)?;
                self.executor.cancel();
                Ok(())
            }
        }
    }

    /// Emergency stop. The executor is cancelled unconditionally, even when
    /// the event itself is rejected.
    pub fn emergency_stop(&mut self) -> Result<()> {
        self.executor.cancel();
        log_error!("emergency stop in state {}", self.machine.state());
        self.machine.dispatch(Event::EmergencyStop)?;
        Ok(())
    }

    /// Acknowledge a latched fault: `Error` -> `Idle`, executor reset.
    pub fn clear_fault(&mut self) -> Result<()> {
        self.machine.dispatch(Event::ErrorCleared)?;
        self.executor.reset();
        self.executor.actuator_mut().set_enabled(false);
        Ok(())
    }

    /// Abort everything and force the machine to `Idle`.
    pub fn reset(&mut self) {
        self.executor.reset();
        self.executor.actuator_mut().set_enabled(false);
        self.machine.reset();
    }

    /// Advance the executor and keep the operating state in step with it.
    ///
    /// Returns the operating state after the tick.
    pub fn tick(&mut self, now: Micros) -> OperatingState {
        let executor_state = self.executor.tick(now);

        match self.machine.state() {
            OperatingState::Accelerating
            | OperatingState::Running
            | OperatingState::Decelerating => self.follow_motion_phase(),
            OperatingState::Stopping if executor_state != ExecutorState::Running => {
                self.follow(Event::MotionComplete);
            }
            OperatingState::Homing => match executor_state {
                ExecutorState::Completed => {
                    if self.finish_homing().is_err() {
                        log_error!("homing could not re-reference the axis");
                        self.follow(Event::ErrorDetected);
                    }
                }
                ExecutorState::Idle | ExecutorState::Faulted => {
                    self.follow(Event::ErrorDetected);
                }
                ExecutorState::Running => {}
            },
            _ => {}
        }

        self.machine.state()
    }

    /// Snapshot of the axis.
    pub fn status(&self) -> ControllerStatus {
        let executor = self.executor.status();
        ControllerStatus {
            state: self.machine.state(),
            executor,
            position: self.mechanical.steps_to_degrees(executor.current_position),
            rejected_transitions: self.machine.rejected_count(),
        }
    }

    /// Current position in degrees.
    pub fn position(&self) -> Degrees {
        self.mechanical.steps_to_degrees(self.executor.position())
    }

    /// Get the operating state.
    #[inline]
    pub fn state(&self) -> OperatingState {
        self.machine.state()
    }

    /// Get the executor.
    #[inline]
    pub fn executor(&self) -> &MotionExecutor<A> {
        &self.executor
    }

    /// Get the state machine.
    #[inline]
    pub fn machine(&self) -> &OperationalStateMachine<H> {
        &self.machine
    }

    /// Get the derived mechanical constraints.
    #[inline]
    pub fn mechanical(&self) -> &MechanicalConstraints {
        &self.mechanical
    }

    /// Get the actuator.
    #[inline]
    pub fn actuator(&self) -> &A {
        self.executor.actuator()
    }

    /// Get the actuator mutably.
    #[inline]
    pub fn actuator_mut(&mut self) -> &mut A {
        self.executor.actuator_mut()
    }

    /// Consume the controller, returning its actuator.
    pub fn into_actuator(self) -> A {
        self.executor.into_actuator()
    }

    fn require_ready(&self) -> Result<()> {
        if self.machine.can_move() {
            Ok(())
        } else {
            Err(Error::State(StateError::NotReady(self.machine.state())))
        }
    }

    fn check_limits(&self, target: f32) -> Result<f32> {
        self.mechanical
            .check_limits(target)
            .map_err(|limit| Error::Motion(MotionError::LimitExceeded { target, limit }))
    }

    fn start_move(
        &mut self,
        target: f32,
        constraints: &MotionConstraints,
        now: Micros,
    ) -> Result<MoveOutcome> {
        let target = self.check_limits(target)?;

        match self.executor.request_move(target, constraints, now) {
            Ok(MoveOutcome::Started) => {
                self.machine.dispatch(Event::StartMotion)?;
                Ok(MoveOutcome::Started)
            }
            Ok(MoveOutcome::AlreadyAtTarget) => Ok(MoveOutcome::AlreadyAtTarget),
            Err(e) => Err(self.move_failed(e)),
        }
    }

    fn move_failed(&mut self, e: MotionError) -> Error {
        if e == MotionError::InvalidConstraints {
            log_error!("move rejected by profile generator");
            self.follow(Event::ErrorDetected);
        }
        Error::Motion(e)
    }

    fn finish_homing(&mut self) -> Result<()> {
        let home = self.mechanical.degrees_to_steps(self.config.homing.position_degrees);
        self.executor.set_position(home)?;
        self.machine.dispatch(Event::HomeComplete)?;
        Ok(())
    }

    /// Dispatch an event the controller expects to be legal; a rejection is
    /// already counted by the machine.
    fn follow(&mut self, event: Event) -> bool {
        self.machine.dispatch(event).is_ok()
    }

    /// Step the machine forward with `MotionComplete` until it matches the
    /// executor's phase (`Ready` once the executor has stopped).
    fn follow_motion_phase(&mut self) {
        let target = if self.executor.is_running() {
            phase_rank(self.executor.phase())
        } else {
            3
        };

        for _ in 0..3 {
            let current = match self.machine.state() {
                OperatingState::Accelerating => 0,
                OperatingState::Running => 1,
                OperatingState::Decelerating => 2,
                _ => return,
            };
            if current >= target || !self.follow(Event::MotionComplete) {
                return;
            }
        }
    }
}

fn phase_rank(phase: MotionPhase) -> u8 {
    match phase {
        MotionPhase::Accelerating => 0,
        MotionPhase::Cruising => 1,
        MotionPhase::Decelerating => 2,
        MotionPhase::Complete => 3,
    }
}
