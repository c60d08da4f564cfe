//! Command and timing constants for standard-speed 1-Wire communication.

/// Command to match a specific ROM address in 1-Wire communication
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Command to skip ROM addressing and talk to every device on the bus at once
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Command to search for devices on the 1-Wire bus
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Number of times the idle line is polled before a reset gives up.
pub const RESET_RETRIES: u8 = 125;

/// Interval between two polls of the idle line, in microseconds.
pub(crate) const RESET_POLL_US: u32 = 2;

/// Reset pulse low time (tRSTL).
pub(crate) const RESET_LOW_US: u32 = 480;

/// Time from releasing the reset pulse to sampling the presence pulse (tMSP).
pub(crate) const PRESENCE_SAMPLE_US: u32 = 70;

/// Remainder of the presence detect window after sampling.
pub(crate) const PRESENCE_RECOVERY_US: u32 = 410;

/// Low time of a write-one slot.
pub(crate) const WRITE_ONE_LOW_US: u32 = 10;

/// Recovery after a write-one slot.
pub(crate) const WRITE_ONE_RECOVERY_US: u32 = 55;

/// Low time of a write-zero slot.
pub(crate) const WRITE_ZERO_LOW_US: u32 = 65;

/// Recovery after a write-zero slot.
pub(crate) const WRITE_ZERO_RECOVERY_US: u32 = 5;

/// Low time that opens a read slot.
pub(crate) const READ_LOW_US: u32 = 3;

/// Delay from releasing the line to sampling it in a read slot.
pub(crate) const READ_SAMPLE_US: u32 = 10;

/// Remainder of a read slot after sampling.
pub(crate) const READ_RECOVERY_US: u32 = 53;
