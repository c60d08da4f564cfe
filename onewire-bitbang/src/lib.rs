#![no_std]
#![deny(missing_docs)]
//! # onewire-bitbang
//! A no-std, software-driven (bit-banged) 1-Wire master.
//!
//! The crate drives a single open-drain signal line through the narrow [Platform] capability
//! (pin mode, pin level, microsecond delay and a critical section), so it runs on any target
//! that can supply those, and on a simulated line in tests.
//!
//! [OneWireBus] implements the [OneWire] trait with the standard-speed time slots: reset and
//! presence detect, single bit writes and reads, and the byte/addressing operations built on
//! top of them. [SearchState] holds the cursor of the ROM search algorithm, and the [crc]
//! module provides the 8-bit and 16-bit checksums used to validate data read off the bus.
//!
//! ```ignore
//! let mut bus = OneWireBus::new(HalPlatform::new(pin, delay));
//! let mut search = SearchState::new();
//! while let Some(rom) = search.next(&mut bus)? {
//!     log::info!("found {rom}");
//! }
//! ```

mod bitbang;
pub mod consts;
pub mod crc;
mod error;
mod hal;
mod platform;
mod rom;
mod search;
mod traits;

pub use bitbang::OneWireBus;
pub use consts::{ONEWIRE_MATCH_ROM_CMD, ONEWIRE_SEARCH_CMD, ONEWIRE_SKIP_ROM_CMD};
pub use crc::{OneWireCrc, check_crc16, crc8, crc8_bitwise, crc8_table, crc16};
pub use error::OneWireError;
pub use hal::HalPlatform;
pub use platform::{PinMode, Platform};
pub use rom::RomAddress;
pub use search::{Devices, FamilyDevices, SearchState};
pub use traits::OneWire;

/// Error type for 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
