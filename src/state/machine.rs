//! The state machine itself.

use crate::error::StateError;

use super::hooks::{NoHooks, StateHooks};
use super::table::next_state;
use super::{Event, OperatingState};

/// An accepted state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    /// State that was left.
    pub from: OperatingState,
    /// State that was entered.
    pub to: OperatingState,
    /// Event that caused the change.
    pub event: Event,
}

/// Operating-mode state machine for one axis.
///
/// Always in exactly one state. A transition is applied entirely inside
/// [`dispatch`](Self::dispatch) (hooks included) before it returns.
#[derive(Debug)]
pub struct OperationalStateMachine<H: StateHooks = NoHooks> {
    state: OperatingState,
    previous_state: Option<OperatingState>,
    rejected_count: u32,
    hooks: H,
}

impl OperationalStateMachine<NoHooks> {
    /// Create a machine in `Uninitialized` with no hooks.
    pub fn new() -> Self {
        Self::with_hooks(NoHooks)
    }
}

impl Default for OperationalStateMachine<NoHooks> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: StateHooks> OperationalStateMachine<H> {
    /// Create a machine in `Uninitialized` reporting to `hooks`.
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            state: OperatingState::Uninitialized,
            previous_state: None,
            rejected_count: 0,
            hooks,
        }
    }

    /// Apply `event`.
    ///
    /// On success the exit, transition and entry hooks have run, in that
    /// order.
    ///
    /// # Errors
    ///
    /// `StateError::RejectedTransition` when the table has no entry for the
    /// current state and `event`; the state is unchanged and the rejection
    /// is counted.
    pub fn dispatch(&mut self, event: Event) -> Result<Transition, StateError> {
        match next_state(self.state, event) {
            Some(to) => Ok(self.apply(to, event)),
            None => {
                self.rejected_count = self.rejected_count.saturating_add(1);
                log_warn!("event {} rejected in state {}", event, self.state);
                self.hooks.on_rejected(self.state, event);
                Err(StateError::RejectedTransition {
                    state: self.state,
                    event,
                })
            }
        }
    }

    /// Force the machine to `Idle` through a synthetic `ErrorCleared`,
    /// whatever the current state.
    pub fn reset(&mut self) -> Transition {
        self.apply(OperatingState::Idle, Event::ErrorCleared)
    }

    fn apply(&mut self, to: OperatingState, event: Event) -> Transition {
        let transition = Transition {
            from: self.state,
            to,
            event,
        };

        self.hooks.on_exit(transition.from);
        self.previous_state = Some(transition.from);
        self.state = to;
        self.hooks.on_transition(&transition);
        self.hooks.on_entry(to);

        log_info!("state {} -> {} ({})", transition.from, to, event);
        transition
    }

    /// Get the current state.
    #[inline]
    pub fn state(&self) -> OperatingState {
        self.state
    }

    /// State before the last accepted transition.
    #[inline]
    pub fn previous_state(&self) -> Option<OperatingState> {
        self.previous_state
    }

    /// Check if the machine is in `state`.
    #[inline]
    pub fn is_state(&self, state: OperatingState) -> bool {
        self.state == state
    }

    /// Motion commands are accepted only in `Ready`.
    #[inline]
    pub fn can_move(&self) -> bool {
        self.state == OperatingState::Ready
    }

    /// Check if a move is in progress.
    #[inline]
    pub fn is_moving(&self) -> bool {
        matches!(
            self.state,
            OperatingState::Accelerating | OperatingState::Running | OperatingState::Decelerating
        )
    }

    /// Check if a fault is latched.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.state == OperatingState::Error
    }

    /// Number of rejected events since creation.
    #[inline]
    pub fn rejected_count(&self) -> u32 {
        self.rejected_count
    }

    /// Get the hooks.
    #[inline]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Get the hooks mutably.
    #[inline]
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TRANSITIONS;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Exit(OperatingState),
        Transition(OperatingState, OperatingState, Event),
        Entry(OperatingState),
        Rejected(OperatingState, Event),
    }

    #[derive(Default)]
    struct Recorder {
        calls: heapless::Vec<Call, 32>,
    }

    impl StateHooks for Recorder {
        fn on_exit(&mut self, state: OperatingState) {
            let _ = self.calls.push(Call::Exit(state));
        }

        fn on_transition(&mut self, t: &Transition) {
            let _ = self.calls.push(Call::Transition(t.from, t.to, t.event));
        }

        fn on_entry(&mut self, state: OperatingState) {
            let _ = self.calls.push(Call::Entry(state));
        }

        fn on_rejected(&mut self, state: OperatingState, event: Event) {
            let _ = self.calls.push(Call::Rejected(state, event));
        }
    }

    /// Drive a fresh machine into `target` along legal transitions.
    fn machine_in(target: OperatingState) -> OperationalStateMachine {
        use Event::*;
        use OperatingState as S;

        let path: &[Event] = match target {
            S::Uninitialized => &[],
            S::Idle => &[Initialize],
            S::Ready => &[Initialize, Enable],
            S::Accelerating => &[Initialize, Enable, StartMotion],
            S::Running => &[Initialize, Enable, StartMotion, MotionComplete],
            S::Decelerating => &[Initialize, Enable, StartMotion, MotionComplete, MotionComplete],
            S::Stopping => &[Initialize, Enable, StartMotion, EmergencyStop],
            S::Homing => &[Initialize, Enable, HomeCommand],
            S::Error => &[Initialize, Enable, ErrorDetected],
        };

        let mut sm = OperationalStateMachine::new();
        for &event in path {
            sm.dispatch(event).unwrap();
        }
        assert_eq!(sm.state(), target);
        sm
    }

    #[test]
    fn test_initial_state() {
        let sm = OperationalStateMachine::new();
        assert_eq!(sm.state(), OperatingState::Uninitialized);
        assert_eq!(sm.previous_state(), None);
        assert_eq!(sm.rejected_count(), 0);
    }

    #[test]
    fn test_hook_order() {
        let mut sm = OperationalStateMachine::with_hooks(Recorder::default());
        let t = sm.dispatch(Event::Initialize).unwrap();

        assert_eq!(t.from, OperatingState::Uninitialized);
        assert_eq!(t.to, OperatingState::Idle);
        assert_eq!(
            sm.hooks().calls.as_slice(),
            &[
                Call::Exit(OperatingState::Uninitialized),
                Call::Transition(OperatingState::Uninitialized, OperatingState::Idle, Event::Initialize),
                Call::Entry(OperatingState::Idle),
            ]
        );
        assert_eq!(sm.previous_state(), Some(OperatingState::Uninitialized));
    }

    #[test]
    fn test_every_table_entry_is_accepted() {
        for &(from, event, to) in TRANSITIONS.iter() {
            let mut sm = machine_in(from);
            let t = sm.dispatch(event).unwrap();
            assert_eq!(t, Transition { from, to, event });
            assert_eq!(sm.state(), to);
        }
    }

    #[test]
    fn test_every_missing_pair_is_rejected() {
        let mut rejected = 0;

        for state in OperatingState::ALL {
            for event in Event::ALL {
                if TRANSITIONS.iter().any(|t| t.0 == state && t.1 == event) {
                    continue;
                }

                let mut sm = machine_in(state);
                let before = sm.previous_state();
                assert_eq!(
                    sm.dispatch(event),
                    Err(StateError::RejectedTransition { state, event })
                );
                assert_eq!(sm.state(), state);
                assert_eq!(sm.previous_state(), before);
                assert_eq!(sm.rejected_count(), 1);
                rejected += 1;
            }
        }

        assert_eq!(rejected, 9 * 11 - TRANSITIONS.len());
    }

    #[test]
    fn test_rejection_notifies_hooks_only() {
        let mut sm = OperationalStateMachine::with_hooks(Recorder::default());
        assert!(sm.dispatch(Event::StartMotion).is_err());
        assert_eq!(
            sm.hooks().calls.as_slice(),
            &[Call::Rejected(OperatingState::Uninitialized, Event::StartMotion)]
        );
    }

    #[test]
    fn test_reset_from_every_state() {
        for state in OperatingState::ALL {
            let mut sm = machine_in(state);
            let t = sm.reset();
            assert_eq!(t.event, Event::ErrorCleared);
            assert_eq!(t.from, state);
            assert_eq!(sm.state(), OperatingState::Idle);
            assert_eq!(sm.previous_state(), Some(state));
        }
    }

    #[test]
    fn test_predicates() {
        assert!(machine_in(OperatingState::Ready).can_move());
        assert!(!machine_in(OperatingState::Idle).can_move());
        assert!(machine_in(OperatingState::Running).is_moving());
        assert!(!machine_in(OperatingState::Stopping).is_moving());
        assert!(machine_in(OperatingState::Error).is_error());
        assert!(machine_in(OperatingState::Homing).is_state(OperatingState::Homing));
    }
}
