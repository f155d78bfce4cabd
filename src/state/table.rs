//! Legal transitions.

use super::{Event, OperatingState};

use Event::*;
use OperatingState::*;

/// Every legal `(from, event, to)` triple. Anything else is rejected.
pub const TRANSITIONS: [(OperatingState, Event, OperatingState); 23] = [
    (Uninitialized, Initialize, Idle),
    (Idle, Enable, Ready),
    (Ready, Disable, Idle),
    (Ready, StartMotion, Accelerating),
    (Ready, HomeCommand, Homing),
    (Ready, ErrorDetected, Error),
    (Accelerating, MotionComplete, Running),
    (Accelerating, Stop, Decelerating),
    (Accelerating, EmergencyStop, Stopping),
    (Accelerating, ErrorDetected, Error),
    (Running, MotionComplete, Decelerating),
    (Running, Stop, Decelerating),
    (Running, EmergencyStop, Stopping),
    (Running, ErrorDetected, Error),
    (Decelerating, MotionComplete, Ready),
    (Decelerating, EmergencyStop, Stopping),
    (Decelerating, ErrorDetected, Error),
    (Stopping, MotionComplete, Ready),
    (Stopping, ErrorDetected, Error),
    (Homing, HomeComplete, Ready),
    (Homing, EmergencyStop, Stopping),
    (Homing, ErrorDetected, Error),
    (Error, ErrorCleared, Idle),
];

/// Look up the successor of `state` under `event`.
pub fn next_state(state: OperatingState, event: Event) -> Option<OperatingState> {
    TRANSITIONS
        .iter()
        .find(|(from, ev, _)| *from == state && *ev == event)
        .map(|&(_, _, to)| to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_no_duplicate_keys() {
        for (i, a) in TRANSITIONS.iter().enumerate() {
            for b in &TRANSITIONS[i + 1..] {
                assert!(!(a.0 == b.0 && a.1 == b.1), "duplicate {:?}/{:?}", a.0, a.1);
            }
        }
    }

    #[test]
    fn test_every_state_reachable() {
        for state in OperatingState::ALL {
            let reachable = state == OperatingState::Uninitialized
                || TRANSITIONS.iter().any(|t| t.2 == state);
            assert!(reachable, "{} unreachable", state);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(next_state(Ready, StartMotion), Some(Accelerating));
        assert_eq!(next_state(Error, ErrorCleared), Some(Idle));
        assert_eq!(next_state(Idle, StartMotion), None);
        assert_eq!(next_state(Stopping, Stop), None);
    }

    #[test]
    fn test_only_error_cleared_leaves_error() {
        for event in Event::ALL {
            let next = next_state(Error, event);
            if event == ErrorCleared {
                assert_eq!(next, Some(Idle));
            } else {
                assert_eq!(next, None);
            }
        }
    }
}
