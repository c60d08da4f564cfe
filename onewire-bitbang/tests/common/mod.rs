#![allow(dead_code)]
//! A slot-level simulation of a 1-Wire line with devices attached.
//!
//! The master side is whatever drives the [`Platform`] calls. Low pulses are classified by
//! their length the way real devices do: a reset pulse, a write-zero slot, a write-one slot,
//! or the short pulse that opens a read slot. Devices answer by holding the line low for a
//! limited window, so sampling too late reads the pull-up.

use onewire_bitbang::{PinMode, Platform, RomAddress};
use std::collections::VecDeque;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeviceState {
    Idle,
    Command { bits: u8, value: u8 },
    Search { bit: u8, phase: u8 },
    Match { bit: u8 },
    Selected,
}

/// A device that implements the ROM commands and echoes data written to it once addressed.
#[derive(Debug, Clone)]
pub struct SimDevice {
    rom: [u8; 8],
    state: DeviceState,
    selected: bool,
    echo: VecDeque<bool>,
    leave_at: Option<u8>,
}

impl SimDevice {
    pub fn new(rom: RomAddress) -> Self {
        Self {
            rom: *rom.as_bytes(),
            state: DeviceState::Idle,
            selected: false,
            echo: VecDeque::new(),
            leave_at: None,
        }
    }

    /// Device that stops answering the search once it reaches `bit` (0-based).
    pub fn leaving_search_at(rom: RomAddress, bit: u8) -> Self {
        Self {
            leave_at: Some(bit),
            ..Self::new(rom)
        }
    }

    pub fn rom(&self) -> RomAddress {
        RomAddress::new(self.rom)
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn rom_bit(&self, bit: u8) -> bool {
        self.rom[(bit / 8) as usize] & (1 << (bit % 8)) != 0
    }

    fn reset(&mut self) {
        self.state = DeviceState::Command { bits: 0, value: 0 };
        self.selected = false;
        self.echo.clear();
    }

    fn write_slot(&mut self, bit: bool) {
        let state = self.state;
        self.state = match state {
            DeviceState::Idle => DeviceState::Idle,
            DeviceState::Command { bits, value } => {
                let value = value | ((bit as u8) << bits);
                if bits < 7 {
                    DeviceState::Command {
                        bits: bits + 1,
                        value,
                    }
                } else {
                    match value {
                        0xf0 => DeviceState::Search { bit: 0, phase: 0 },
                        0x55 => DeviceState::Match { bit: 0 },
                        0xcc => {
                            self.selected = true;
                            DeviceState::Selected
                        }
                        _ => DeviceState::Idle,
                    }
                }
            }
            DeviceState::Search { bit: n, phase: 2 } => {
                if bit != self.rom_bit(n) {
                    DeviceState::Idle
                } else if n == 63 {
                    self.selected = true;
                    DeviceState::Selected
                } else {
                    DeviceState::Search {
                        bit: n + 1,
                        phase: 0,
                    }
                }
            }
            DeviceState::Search { .. } => DeviceState::Idle,
            DeviceState::Match { bit: n } => {
                if bit != self.rom_bit(n) {
                    DeviceState::Idle
                } else if n == 63 {
                    self.selected = true;
                    DeviceState::Selected
                } else {
                    DeviceState::Match { bit: n + 1 }
                }
            }
            DeviceState::Selected => {
                self.echo.push_back(bit);
                DeviceState::Selected
            }
        };
    }

    /// Level the device leaves on the line during a read slot; `false` pulls it low.
    fn read_slot(&mut self) -> bool {
        let state = self.state;
        match state {
            DeviceState::Search { bit, .. } if self.leave_at == Some(bit) => {
                self.state = DeviceState::Idle;
                true
            }
            DeviceState::Search { bit, phase: 0 } => {
                self.state = DeviceState::Search { bit, phase: 1 };
                self.rom_bit(bit)
            }
            DeviceState::Search { bit, phase: 1 } => {
                self.state = DeviceState::Search { bit, phase: 2 };
                !self.rom_bit(bit)
            }
            DeviceState::Selected => self.echo.pop_front().unwrap_or(true),
            _ => true,
        }
    }
}

/// The simulated line.
#[derive(Debug, Default)]
pub struct SimBus {
    pub devices: Vec<SimDevice>,
    /// Something holds the line low permanently.
    pub stuck_low: bool,
    pub delay_calls: usize,
    pub resets: usize,
    mode: Option<PinMode>,
    now: u64,
    low_since: Option<u64>,
    held_low: Option<(u64, u64)>,
}

impl SimBus {
    pub fn new(roms: &[RomAddress]) -> Self {
        Self {
            devices: roms.iter().copied().map(SimDevice::new).collect(),
            ..Self::default()
        }
    }

    pub fn with_devices(devices: Vec<SimDevice>) -> Self {
        Self {
            devices,
            ..Self::default()
        }
    }

    pub fn stuck() -> Self {
        Self {
            stuck_low: true,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Option<PinMode> {
        self.mode
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    fn end_of_low_pulse(&mut self, width: u64) {
        let now = self.now;
        if width >= 480 {
            self.resets += 1;
            self.devices.iter_mut().for_each(SimDevice::reset);
            if !self.devices.is_empty() {
                // presence pulse
                self.held_low = Some((now + 15, now + 240));
            }
        } else if width >= 15 {
            self.devices.iter_mut().for_each(|d| d.write_slot(false));
        } else if width >= 5 {
            self.devices.iter_mut().for_each(|d| d.write_slot(true));
        } else {
            // wired-AND of every device's answer
            let level = self
                .devices
                .iter_mut()
                .fold(true, |level, d| d.read_slot() & level);
            if !level {
                self.held_low = Some((now, now + 15));
            }
        }
    }
}

impl Platform for SimBus {
    type Error = Infallible;

    fn set_pin_mode(&mut self, mode: PinMode) -> Result<(), Self::Error> {
        self.mode = Some(mode);
        Ok(())
    }

    fn write_pin(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            if let Some(since) = self.low_since.take() {
                self.end_of_low_pulse(self.now - since);
            }
        } else if self.low_since.is_none() {
            self.low_since = Some(self.now);
            self.held_low = None;
        }
        Ok(())
    }

    fn read_pin(&mut self) -> Result<bool, Self::Error> {
        let held = self
            .held_low
            .is_some_and(|(from, until)| (from..until).contains(&self.now));
        Ok(!(self.stuck_low || self.low_since.is_some() || held))
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_calls += 1;
        self.now += us as u64;
    }
}

/// Builds a valid address from a family code and a serial number given as an integer.
pub fn rom(family: u8, serial: u64) -> RomAddress {
    let bytes = serial.to_le_bytes();
    RomAddress::from_parts(family, [bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]])
}

/// Order in which the search returns addresses: ascending, least significant bit first.
pub fn tree_order(rom: &RomAddress) -> u64 {
    rom.to_u64().reverse_bits()
}
