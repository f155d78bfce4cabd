//! Actuation seam.
//!
//! The executor reports what the axis should be doing through an injected
//! [`Actuator`]: a velocity magnitude, a direction flag and (from the
//! controller) an enable flag. Pulse generation itself lives behind it.

mod hal;

pub use hal::{PinActuator, StepRateSink};

/// Capability that receives actuation commands.
///
/// Implementations must not block: `set_velocity` is called from the tick
/// path and, through `cancel`, possibly from an emergency context.
pub trait Actuator {
    /// Commanded speed in steps/sec, never negative.
    fn set_velocity(&mut self, steps_per_sec: f32);

    /// Commanded direction of travel.
    fn set_direction(&mut self, forward: bool);

    /// Energise or release the driver.
    fn set_enabled(&mut self, _enabled: bool) {}
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    #[inline]
    fn set_velocity(&mut self, steps_per_sec: f32) {
        (**self).set_velocity(steps_per_sec)
    }

    #[inline]
    fn set_direction(&mut self, forward: bool) {
        (**self).set_direction(forward)
    }

    #[inline]
    fn set_enabled(&mut self, enabled: bool) {
        (**self).set_enabled(enabled)
    }
}

/// Actuator that discards every command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullActuator;

impl Actuator for NullActuator {
    #[inline]
    fn set_velocity(&mut self, _steps_per_sec: f32) {}

    #[inline]
    fn set_direction(&mut self, _forward: bool) {}
}

/// Actuator built from a velocity closure and a direction closure.
pub struct FnActuator<V, D> {
    velocity: V,
    direction: D,
}

impl<V, D> FnActuator<V, D>
where
    V: FnMut(f32),
    D: FnMut(bool),
{
    /// Wrap the two callbacks.
    pub fn new(velocity: V, direction: D) -> Self {
        Self { velocity, direction }
    }
}

impl<V, D> Actuator for FnActuator<V, D>
where
    V: FnMut(f32),
    D: FnMut(bool),
{
    #[inline]
    fn set_velocity(&mut self, steps_per_sec: f32) {
        (self.velocity)(steps_per_sec)
    }

    #[inline]
    fn set_direction(&mut self, forward: bool) {
        (self.direction)(forward)
    }
}

impl<V, D> core::fmt::Debug for FnActuator<V, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnActuator")
    }
}
