use crate::crc::crc8;
use core::fmt;

/// A 64-bit 1-Wire ROM address.
///
/// | Byte | Description |
/// |------|-------------|
/// | 0 | Family code (e.g., 0x28 for DS18B20) |
/// | 1-6 | Serial number, least significant byte first |
/// | 7 | CRC-8 of bytes 0-6 |
///
/// Bytes are stored in the order they travel on the wire. The `u64` form used by
/// [`From<u64>`] and the hex formatters is the little-endian reading of those bytes,
/// so the family code is the low byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RomAddress([u8; 8]);

impl RomAddress {
    /// Creates an address from its eight wire-order bytes.
    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Builds an address from a family code and serial number, computing the CRC byte.
    pub fn from_parts(family: u8, serial: [u8; 6]) -> Self {
        let mut bytes = [family, 0, 0, 0, 0, 0, 0, 0];
        bytes[1..7].copy_from_slice(&serial);
        bytes[7] = crc8(&bytes[..7], 0);
        Self(bytes)
    }

    /// The family code.
    pub const fn family(&self) -> u8 {
        self.0[0]
    }

    /// The 48-bit serial number, least significant byte first.
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0; 6];
        serial.copy_from_slice(&self.0[1..7]);
        serial
    }

    /// The CRC byte as read from the device.
    pub const fn crc(&self) -> u8 {
        self.0[7]
    }

    /// Whether the CRC byte matches the CRC-8 of the family code and serial number.
    pub fn is_valid(&self) -> bool {
        crc8(&self.0[..7], 0) == self.0[7]
    }

    /// The address bytes in wire order.
    pub const fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// The address as a little-endian `u64`.
    pub const fn to_u64(&self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}

impl From<[u8; 8]> for RomAddress {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl From<u64> for RomAddress {
    fn from(value: u64) -> Self {
        Self(value.to_le_bytes())
    }
}

impl From<RomAddress> for u64 {
    fn from(rom: RomAddress) -> Self {
        rom.to_u64()
    }
}

impl From<RomAddress> for [u8; 8] {
    fn from(rom: RomAddress) -> Self {
        rom.0
    }
}

/// Formats as `FF-SSSSSSSSSSSS-CC`: family, serial (most significant byte first), CRC.
impl fmt::Display for RomAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}-", self.family())?;
        for b in self.0[1..7].iter().rev() {
            write!(f, "{b:02X}")?;
        }
        write!(f, "-{:02X}", self.crc())
    }
}

impl fmt::LowerHex for RomAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.to_u64(), f)
    }
}

impl fmt::UpperHex for RomAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.to_u64(), f)
    }
}
