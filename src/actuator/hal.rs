//! embedded-hal backed actuator.

use embedded_hal::digital::OutputPin;

use super::Actuator;

/// Receiver of the commanded step rate (timer/PWM pulse generator).
pub trait StepRateSink {
    /// Set the pulse rate in steps/sec; zero stops pulsing.
    fn set_step_rate(&mut self, steps_per_sec: f32);
}

impl<F: FnMut(f32)> StepRateSink for F {
    #[inline]
    fn set_step_rate(&mut self, steps_per_sec: f32) {
        self(steps_per_sec)
    }
}

/// Actuator driving DIR and EN pins, with step rates forwarded to a sink.
///
/// Pin errors cannot be returned through [`Actuator`]; they latch
/// [`pin_fault`](Self::pin_fault) for the controller to inspect.
pub struct PinActuator<DIR, EN, R>
where
    DIR: OutputPin,
    EN: OutputPin,
    R: StepRateSink,
{
    dir_pin: DIR,
    enable_pin: EN,
    rate: R,
    invert_direction: bool,
    enable_active_low: bool,
    /// Cached to avoid redundant pin writes.
    current_direction: Option<bool>,
    pin_fault: bool,
}

impl<DIR, EN, R> PinActuator<DIR, EN, R>
where
    DIR: OutputPin,
    EN: OutputPin,
    R: StepRateSink,
{
    /// Create an actuator; DIR high means forward, EN high means enabled.
    pub fn new(dir_pin: DIR, enable_pin: EN, rate: R) -> Self {
        Self {
            dir_pin,
            enable_pin,
            rate,
            invert_direction: false,
            enable_active_low: false,
            current_direction: None,
            pin_fault: false,
        }
    }

    /// Drive DIR low for forward.
    pub fn with_inverted_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Drive EN low to enable.
    pub fn with_enable_active_low(mut self, active_low: bool) -> Self {
        self.enable_active_low = active_low;
        self
    }

    /// A pin write failed since the last [`clear_pin_fault`](Self::clear_pin_fault).
    #[inline]
    pub fn pin_fault(&self) -> bool {
        self.pin_fault
    }

    /// Clear the latched pin fault.
    pub fn clear_pin_fault(&mut self) {
        self.pin_fault = false;
    }

    /// Give the pins and the rate sink back.
    pub fn release(self) -> (DIR, EN, R) {
        (self.dir_pin, self.enable_pin, self.rate)
    }

    fn write(pin: &mut impl OutputPin, high: bool) -> bool {
        let result = if high { pin.set_high() } else { pin.set_low() };
        result.is_ok()
    }
}

impl<DIR, EN, R> Actuator for PinActuator<DIR, EN, R>
where
    DIR: OutputPin,
    EN: OutputPin,
    R: StepRateSink,
{
    fn set_velocity(&mut self, steps_per_sec: f32) {
        self.rate.set_step_rate(steps_per_sec);
    }

    fn set_direction(&mut self, forward: bool) {
        if self.current_direction == Some(forward) {
            return;
        }

        if Self::write(&mut self.dir_pin, forward != self.invert_direction) {
            self.current_direction = Some(forward);
        } else {
            log_error!("direction pin write failed");
            self.current_direction = None;
            self.pin_fault = true;
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !Self::write(&mut self.enable_pin, enabled != self.enable_active_low) {
            log_error!("enable pin write failed");
            self.pin_fault = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_direction_written_once_per_change() {
        let dir = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let en = PinMock::new(&[]);

        let mut act = PinActuator::new(dir, en, |_: f32| {});
        act.set_direction(true);
        act.set_direction(true);
        act.set_direction(false);
        assert!(!act.pin_fault());

        let (mut dir, mut en, _) = act.release();
        dir.done();
        en.done();
    }

    #[test]
    fn test_inverted_pins() {
        let dir = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let en = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut act = PinActuator::new(dir, en, |_: f32| {})
            .with_inverted_direction(true)
            .with_enable_active_low(true);
        act.set_direction(true);
        act.set_enabled(true);
        act.set_enabled(false);

        let (mut dir, mut en, _) = act.release();
        dir.done();
        en.done();
    }

    #[test]
    fn test_step_rate_forwarded() {
        let mut rates = heapless::Vec::<f32, 4>::new();
        {
            let dir = PinMock::new(&[]);
            let en = PinMock::new(&[]);
            let mut act = PinActuator::new(dir, en, |r: f32| {
                let _ = rates.push(r);
            });
            act.set_velocity(250.0);
            act.set_velocity(0.0);
            let (mut dir, mut en, _) = act.release();
            dir.done();
            en.done();
        }
        assert_eq!(rates.as_slice(), &[250.0, 0.0]);
    }

    #[test]
    fn test_pin_error_latches_fault() {
        let mut act = PinActuator::new(BrokenPin, BrokenPin, |_: f32| {});
        act.set_direction(true);
        assert!(act.pin_fault());

        act.clear_pin_fault();
        assert!(!act.pin_fault());
        act.set_enabled(true);
        assert!(act.pin_fault());
    }
}
