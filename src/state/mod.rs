//! Operational state machine.
//!
//! A fixed set of operating states advanced by events through a const
//! transition table. Pairs missing from the table are rejected and leave the
//! state unchanged.

use core::fmt;

mod hooks;
mod machine;
mod table;

pub use hooks::{NoHooks, StateHooks};
pub use machine::{OperationalStateMachine, Transition};
pub use table::{next_state, TRANSITIONS};

/// High-level operating mode of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingState {
    /// Power-on state, nothing configured yet.
    #[default]
    Uninitialized,
    /// Initialized, driver disabled.
    Idle,
    /// Driver enabled, accepting motion commands.
    Ready,
    /// Ramping up.
    Accelerating,
    /// At cruise velocity.
    Running,
    /// Ramping down.
    Decelerating,
    /// Emergency stop in progress.
    Stopping,
    /// Running the homing move.
    Homing,
    /// Fault latched; requires `ErrorCleared`.
    Error,
}

impl OperatingState {
    /// Every state, in declaration order.
    pub const ALL: [OperatingState; 9] = [
        OperatingState::Uninitialized,
        OperatingState::Idle,
        OperatingState::Ready,
        OperatingState::Accelerating,
        OperatingState::Running,
        OperatingState::Decelerating,
        OperatingState::Stopping,
        OperatingState::Homing,
        OperatingState::Error,
    ];

    /// Get the state name as a static string.
    pub const fn name(self) -> &'static str {
        match self {
            OperatingState::Uninitialized => "Uninitialized",
            OperatingState::Idle => "Idle",
            OperatingState::Ready => "Ready",
            OperatingState::Accelerating => "Accelerating",
            OperatingState::Running => "Running",
            OperatingState::Decelerating => "Decelerating",
            OperatingState::Stopping => "Stopping",
            OperatingState::Homing => "Homing",
            OperatingState::Error => "Error",
        }
    }
}

impl fmt::Display for OperatingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Input that may move the machine to another state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Bring the system up.
    Initialize,
    /// Energise the driver.
    Enable,
    /// Release the driver.
    Disable,
    /// A move was started.
    StartMotion,
    /// The current motion phase finished.
    MotionComplete,
    /// Controlled stop.
    Stop,
    /// Immediate stop.
    EmergencyStop,
    /// Start homing.
    HomeCommand,
    /// Homing finished.
    HomeComplete,
    /// A fault was detected.
    ErrorDetected,
    /// The fault was acknowledged.
    ErrorCleared,
}

impl Event {
    /// Every event, in declaration order.
    pub const ALL: [Event; 11] = [
        Event::Initialize,
        Event::Enable,
        Event::Disable,
        Event::StartMotion,
        Event::MotionComplete,
        Event::Stop,
        Event::EmergencyStop,
        Event::HomeCommand,
        Event::HomeComplete,
        Event::ErrorDetected,
        Event::ErrorCleared,
    ];

    /// Get the event name as a static string.
    pub const fn name(self) -> &'static str {
        match self {
            Event::Initialize => "Initialize",
            Event::Enable => "Enable",
            Event::Disable => "Disable",
            Event::StartMotion => "StartMotion",
            Event::MotionComplete => "MotionComplete",
            Event::Stop => "Stop",
            Event::EmergencyStop => "EmergencyStop",
            Event::HomeCommand => "HomeCommand",
            Event::HomeComplete => "HomeComplete",
            Event::ErrorDetected => "ErrorDetected",
            Event::ErrorCleared => "ErrorCleared",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
