use crate::{OneWire, OneWireResult, RomAddress, consts::ONEWIRE_SEARCH_CMD};

/// Cursor of the 1-Wire ROM search.
///
/// Implements the [1-Wire search algorithm](https://www.analog.com/en/resources/app-notes/1wire-search-algorithm.html):
/// each call to [`next`](SearchState::next) walks the binary tree of ROM addresses one bit at a
/// time and returns the next device, resolving collisions by remembering where the previous pass
/// took the zero branch. Devices come out in a fixed order, ascending when addresses are read
/// least significant bit first.
///
/// The state is owned by the caller and lent to the bus on every call, so several enumerations
/// (on different buses, or one after the other on the same bus) never share hidden state. One
/// state must not be advanced from two places at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchState {
    rom_no: [u8; 8],
    last_discrepancy: u8,
    last_device_found: bool,
}

impl SearchState {
    /// Creates a cursor positioned before the first device.
    pub const fn new() -> Self {
        Self {
            rom_no: [0; 8],
            last_discrepancy: 0,
            last_device_found: false,
        }
    }

    /// Creates a cursor that resumes the search at devices of the given family.
    ///
    /// See [`prefix`](SearchState::prefix).
    pub fn with_family(family: u8) -> Self {
        let mut state = Self::new();
        state.prefix(family);
        state
    }

    /// Clears the cursor so the next search starts over from the first device.
    pub fn start(&mut self) {
        *self = Self::new();
    }

    /// Positions the cursor so the next search looks for devices of `family` first.
    ///
    /// The next [`next`](SearchState::next) call follows the family code down the tree and
    /// returns a device of that family if one is present. Addresses are not filtered: when no
    /// such device exists some other device is returned, and later calls carry on past the
    /// family. Check [`RomAddress::family`] or use [`devices_of_family`](SearchState::devices_of_family).
    pub fn prefix(&mut self, family: u8) {
        self.rom_no = [family, 0, 0, 0, 0, 0, 0, 0];
        self.last_discrepancy = 64;
        self.last_device_found = false;
    }

    /// Whether the last call to [`next`](SearchState::next) returned the last device on the bus.
    pub fn is_exhausted(&self) -> bool {
        self.last_device_found
    }

    /// Forget the discrepancy bookkeeping so the next search starts from the first device.
    fn clear(&mut self) {
        self.last_discrepancy = 0;
        self.last_device_found = false;
    }

    /// Searches for the next device on the 1-Wire bus.
    ///
    /// Calling this method repeatedly returns every device on the bus exactly once. After the
    /// last device, the next call returns `None` and clears the cursor, so calling it again
    /// starts a new enumeration.
    ///
    /// # Returns
    /// The ROM address of the next device, or `None` when there is no presence pulse, all
    /// devices have been returned, or the search broke down mid-way (no device answered a bit).
    /// A broken search clears the cursor as well. The CRC byte of the returned address is not
    /// checked; see [`RomAddress::is_valid`].
    ///
    /// # Errors
    /// Only failures of the underlying bus are reported as errors.
    #[allow(clippy::should_implement_trait)]
    pub fn next<T: OneWire + ?Sized>(
        &mut self,
        onewire: &mut T,
    ) -> OneWireResult<Option<RomAddress>, T::BusError> {
        if self.last_device_found {
            self.clear();
            return Ok(None);
        }
        if !onewire.reset()? {
            log::debug!("1-Wire search: no presence pulse");
            self.clear();
            return Ok(None);
        }
        onewire.write_byte(ONEWIRE_SEARCH_CMD)?;

        let mut last_zero: u8 = 0;
        let mut complete = true;
        for id_bit_num in 1..=64u8 {
            let idx = ((id_bit_num - 1) / 8) as usize; // Index in the ROM array
            let rom_mask = 1u8 << ((id_bit_num - 1) % 8); // Mask for the current bit in the ROM byte

            let id_bit = onewire.read_bit()?;
            let complement_bit = onewire.read_bit()?;
            if id_bit && complement_bit {
                // nobody answered
                complete = false;
                break;
            }
            let dir = if id_bit != complement_bit {
                // all remaining devices agree on this bit
                id_bit
            } else {
                let dir = if id_bit_num < self.last_discrepancy {
                    self.rom_no[idx] & rom_mask != 0
                } else {
                    id_bit_num == self.last_discrepancy
                };
                if !dir {
                    last_zero = id_bit_num;
                }
                log::trace!("1-Wire search: discrepancy at bit {id_bit_num}, taking {dir}");
                dir
            };
            if dir {
                self.rom_no[idx] |= rom_mask;
            } else {
                self.rom_no[idx] &= !rom_mask;
            }
            onewire.write_bit(dir)?;
        }

        if complete {
            self.last_discrepancy = last_zero;
            self.last_device_found = last_zero == 0;
        }
        if !complete || self.rom_no[0] == 0 {
            log::debug!("1-Wire search: no device completed the search");
            self.clear();
            return Ok(None);
        }
        let rom = RomAddress::new(self.rom_no);
        log::debug!("1-Wire search: found {rom}");
        Ok(Some(rom))
    }

    /// Verifies if the device with the given ROM code is present on the 1-Wire bus.
    ///
    /// Runs one search pass steered along `rom`. The cursor is cleared afterwards, so the
    /// next call to [`next`](SearchState::next) starts a new enumeration.
    pub fn verify<T: OneWire + ?Sized>(
        &mut self,
        onewire: &mut T,
        rom: &RomAddress,
    ) -> OneWireResult<bool, T::BusError> {
        self.rom_no = *rom.as_bytes();
        self.last_discrepancy = 64;
        self.last_device_found = false;
        let res = self.next(onewire);
        self.start();
        Ok(res? == Some(*rom))
    }

    /// Iterates over the devices remaining in this enumeration.
    pub fn devices<'a, T: OneWire + ?Sized>(
        &'a mut self,
        onewire: &'a mut T,
    ) -> Devices<'a, T> {
        Devices {
            state: self,
            onewire,
            done: false,
        }
    }

    /// Iterates over the devices of one family.
    ///
    /// Seeds the cursor with [`prefix`](SearchState::prefix) and stops at the first address
    /// with a different family code. Yields nothing if no device of the family is present.
    pub fn devices_of_family<'a, T: OneWire + ?Sized>(
        &'a mut self,
        onewire: &'a mut T,
        family: u8,
    ) -> FamilyDevices<'a, T> {
        self.prefix(family);
        FamilyDevices {
            inner: self.devices(onewire),
            family,
        }
    }
}

/// Iterator over the devices on a bus, created by [`SearchState::devices`].
///
/// Ends after the last device or at the first bus error.
pub struct Devices<'a, T: ?Sized> {
    state: &'a mut SearchState,
    onewire: &'a mut T,
    done: bool,
}

impl<T: OneWire + ?Sized> Iterator for Devices<'_, T> {
    type Item = OneWireResult<RomAddress, T::BusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.state.next(&mut *self.onewire) {
            Ok(Some(rom)) => Some(Ok(rom)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Iterator over the devices of one family, created by [`SearchState::devices_of_family`].
pub struct FamilyDevices<'a, T: ?Sized> {
    inner: Devices<'a, T>,
    family: u8,
}

impl<T: OneWire + ?Sized> Iterator for FamilyDevices<'_, T> {
    type Item = OneWireResult<RomAddress, T::BusError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok(rom) if rom.family() != self.family => {
                self.inner.done = true;
                None
            }
            other => Some(other),
        }
    }
}
