use crate::{
    OneWire, OneWireResult, PinMode, Platform,
    consts::{
        PRESENCE_RECOVERY_US, PRESENCE_SAMPLE_US, READ_LOW_US, READ_RECOVERY_US, READ_SAMPLE_US,
        RESET_LOW_US, RESET_POLL_US, RESET_RETRIES, WRITE_ONE_LOW_US, WRITE_ONE_RECOVERY_US,
        WRITE_ZERO_LOW_US, WRITE_ZERO_RECOVERY_US,
    },
};

/// A bit-banged 1-Wire master on a single signal line.
///
/// Takes ownership of a [`Platform`] providing the GPIO and timing primitives for the line.
/// All operations block the calling thread until their time slot is complete. The bus has no
/// internal locking: sharing one line between threads requires an external lock.
#[derive(Debug)]
pub struct OneWireBus<P> {
    platform: P,
    retries: u8,
}

impl<P> OneWireBus<P> {
    /// Creates a new bus on top of the given platform.
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            retries: RESET_RETRIES,
        }
    }

    /// Set the retry count.
    ///
    /// Before every reset the host polls the line, two microseconds apart, until it
    /// reads high. When the line is still low after this many polls the bus is
    /// considered shorted and the reset reports no presence.
    pub fn with_reset_retries(mut self, retries: u8) -> Self {
        self.retries = retries;
        self
    }

    /// Borrow the underlying platform.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Releases the underlying platform.
    pub fn release(self) -> P {
        self.platform
    }
}

impl<P: Platform> OneWire for OneWireBus<P> {
    type BusError = P::Error;

    fn reset(&mut self) -> OneWireResult<bool, Self::BusError> {
        let p = &mut self.platform;
        p.set_pin_mode(PinMode::OpenDrainOutput)?;
        p.write_pin(true)?;
        // wait until the wire is high, in case a device still holds it
        let mut idle = false;
        for _ in 1..self.retries {
            p.delay_us(RESET_POLL_US);
            if p.read_pin()? {
                idle = true;
                break;
            }
        }
        if !idle {
            log::debug!("1-Wire line stuck low, reset aborted");
            return Ok(false);
        }

        p.write_pin(false)?;
        p.delay_us(RESET_LOW_US);
        let presence = p.critical_section(|p| {
            p.write_pin(true)?;
            p.delay_us(PRESENCE_SAMPLE_US);
            p.read_pin().map(|high| !high)
        })?;
        p.delay_us(PRESENCE_RECOVERY_US);
        Ok(presence)
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        let (low, recovery) = if bit {
            (WRITE_ONE_LOW_US, WRITE_ONE_RECOVERY_US)
        } else {
            (WRITE_ZERO_LOW_US, WRITE_ZERO_RECOVERY_US)
        };
        self.platform.critical_section(|p| {
            p.write_pin(false)?;
            p.delay_us(low);
            p.write_pin(true)
        })?;
        self.platform.delay_us(recovery);
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        let bit = self.platform.critical_section(|p| {
            p.write_pin(false)?;
            p.delay_us(READ_LOW_US);
            p.write_pin(true)?;
            p.delay_us(READ_SAMPLE_US);
            p.read_pin()
        })?;
        self.platform.delay_us(READ_RECOVERY_US);
        Ok(bit)
    }

    fn power(&mut self) -> OneWireResult<(), Self::BusError> {
        self.platform.set_pin_mode(PinMode::Output)?;
        self.platform.write_pin(true)?;
        Ok(())
    }

    fn depower(&mut self) -> OneWireResult<(), Self::BusError> {
        self.platform.set_pin_mode(PinMode::OpenDrainOutput)?;
        Ok(())
    }
}
