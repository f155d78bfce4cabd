//! Transition hooks.

use super::{Event, OperatingState, Transition};

/// Observer of state machine activity.
///
/// Hooks receive only their own state, never the machine, so they cannot
/// dispatch events from inside a transition. Implementations must not block.
pub trait StateHooks {
    /// Called first, with the state being left.
    fn on_exit(&mut self, _state: OperatingState) {}

    /// Called second, with the full transition.
    fn on_transition(&mut self, _transition: &Transition) {}

    /// Called last, with the state being entered.
    fn on_entry(&mut self, _state: OperatingState) {}

    /// Called when an event is rejected; the state is unchanged.
    fn on_rejected(&mut self, _state: OperatingState, _event: Event) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHooks;

impl StateHooks for NoHooks {}

impl<H: StateHooks + ?Sized> StateHooks for &mut H {
    fn on_exit(&mut self, state: OperatingState) {
        (**self).on_exit(state)
    }

    fn on_transition(&mut self, transition: &Transition) {
        (**self).on_transition(transition)
    }

    fn on_entry(&mut self, state: OperatingState) {
        (**self).on_entry(state)
    }

    fn on_rejected(&mut self, state: OperatingState, event: Event) {
        (**self).on_rejected(state, event)
    }
}
