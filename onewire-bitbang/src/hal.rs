use crate::{PinMode, Platform};
use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, InputPin, OutputPin},
};

/// A [`Platform`] built from [`embedded-hal`](embedded_hal) traits.
///
/// Takes ownership of a pin implementing both [`InputPin`] and [`OutputPin`] and a timer
/// implementing [`DelayNs`]. The pin is expected to be configured as open-drain with an
/// external pull-up, so that writing high releases the line and reading returns the level
/// actually present on the wire. Critical sections go through the
/// [`critical-section`](critical_section) crate; the final binary has to link an
/// implementation for its target.
///
/// Most HALs cannot change the electrical mode of a pin through the `embedded-hal` traits,
/// so [`PinMode`] is only tracked here: switching to [`PinMode::Input`] releases the line,
/// and [`PinMode::Output`] drives it high until the next write.
pub struct HalPlatform<P, D> {
    pin: P,
    delay: D,
    mode: PinMode,
}

impl<P, D> HalPlatform<P, D> {
    /// Creates a new platform from an open-drain pin and a delay provider.
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            mode: PinMode::OpenDrainOutput,
        }
    }

    /// The last mode requested through [`Platform::set_pin_mode`].
    pub fn mode(&self) -> PinMode {
        self.mode
    }

    /// Releases the pin and the delay provider.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P, D> Platform for HalPlatform<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    type Error = <P as ErrorType>::Error;

    fn set_pin_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        self.mode = mode;
        match mode {
            PinMode::Input | PinMode::Output => self.pin.set_high(),
            PinMode::OpenDrainOutput => Ok(()),
        }
    }

    fn write_pin(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    fn read_pin(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn critical_section<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        critical_section::with(|_| f(self))
    }
}
