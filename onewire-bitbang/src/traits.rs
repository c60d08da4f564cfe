use crate::{OneWireResult, RomAddress, consts};

/// Trait for 1-Wire communication.
/// This trait defines the basic operations required for 1-Wire communication, such as resetting the bus,
/// writing and reading bits, and driving strong power onto the line. Byte transfers and ROM addressing
/// are provided on top of the bit operations.
pub trait OneWire {
    /// The error type returned by the operations of this trait.
    /// This type is used to indicate errors in the underlying hardware or communication.
    type BusError;

    /// Resets the 1-Wire bus and reports whether any device answered with a presence pulse.
    ///
    /// # Returns
    /// `Ok(true)` if a presence pulse was seen, `Ok(false)` if no device answered or the
    /// line never returned high before the reset (shorted or stuck bus).
    ///
    /// # Errors
    /// This method returns an error if the underlying hardware fails.
    fn reset(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a single bit to the 1-Wire bus.
    ///
    /// # Errors
    /// This method returns an error if the write operation fails.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Reads a single bit from the 1-Wire bus.
    /// # Returns
    /// The bit read from the bus.
    /// # Errors
    /// This method returns an error if the read operation fails.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Actively drives the line high to supply parasitically powered devices.
    fn power(&mut self) -> OneWireResult<(), Self::BusError>;

    /// Stops driving the line and lets the pull-up hold it.
    fn depower(&mut self) -> OneWireResult<(), Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    ///
    /// If strong power is needed after the write (e.g. a parasitically powered sensor
    /// converting), call [`OneWire::power`] once this returns.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0)?;
        }
        Ok(())
    }

    /// Reads a byte from the 1-Wire bus, least significant bit first.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let mut byte = 0;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }

    /// Writes every byte of `bytes`, in order.
    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }

    /// Fills `buf` with bytes read from the bus, in order.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for b in buf.iter_mut() {
            *b = self.read_byte()?;
        }
        Ok(())
    }

    /// Sends Match ROM followed by `rom`, restricting the following commands to that one device.
    ///
    /// The bus must have been reset first.
    fn select(&mut self, rom: &RomAddress) -> OneWireResult<(), Self::BusError> {
        self.write_byte(consts::ONEWIRE_MATCH_ROM_CMD)?;
        self.write_bytes(rom.as_bytes())
    }

    /// Sends Skip ROM, so the following commands reach every device on the bus.
    ///
    /// Only meaningful with a single device present or for broadcast commands. The bus must
    /// have been reset first.
    fn skip_rom(&mut self) -> OneWireResult<(), Self::BusError> {
        self.write_byte(consts::ONEWIRE_SKIP_ROM_CMD)
    }

    /// Addresses devices on the 1-Wire bus.
    /// Resets the bus, then selects `rom`, or skips ROM addressing when `rom` is [`None`].
    /// Note: A [`OneWire::read_byte`] or [`OneWire::read_bit`] call will return garbage data if this method is called without specifying a ROM address on a bus with multiple devices.
    ///
    /// # Returns
    /// `Ok(false)` without sending a command if no device answered the reset.
    fn address(&mut self, rom: Option<&RomAddress>) -> OneWireResult<bool, Self::BusError> {
        if !self.reset()? {
            return Ok(false);
        }
        match rom {
            Some(rom) => self.select(rom)?,
            None => self.skip_rom()?,
        }
        Ok(true)
    }
}
