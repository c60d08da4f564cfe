//! CRC-8 and CRC-16 used in 1-Wire communications.
//!
//! Both checksums are the reflected forms described in Maxim application note 27. The CRC-8
//! (polynomial `x^8 + x^5 + x^4 + 1`) protects ROM addresses and most scratchpads; the CRC-16
//! (polynomial `x^16 + x^15 + x^2 + 1`) protects memory and command responses, and is sent on
//! the wire inverted, low byte first.

/// Lookup table for the reflected CRC-8 polynomial `0x8c`.
const CRC8_TABLE: [u8; 256] = [
    0, 94, 188, 226, 97, 63, 221, 131, 194, 156, 126, 32, 163, 253, 31, 65, 157, 195, 33, 127,
    252, 162, 64, 30, 95, 1, 227, 189, 62, 96, 130, 220, 35, 125, 159, 193, 66, 28, 254, 160,
    225, 191, 93, 3, 128, 222, 60, 98, 190, 224, 2, 92, 223, 129, 99, 61, 124, 34, 192, 158,
    29, 67, 161, 255, 70, 24, 250, 164, 39, 121, 155, 197, 132, 218, 56, 102, 229, 187, 89, 7,
    219, 133, 103, 57, 186, 228, 6, 88, 25, 71, 165, 251, 120, 38, 196, 154, 101, 59, 217, 135,
    4, 90, 184, 230, 167, 249, 27, 69, 198, 152, 122, 36, 248, 166, 68, 26, 153, 199, 37, 123,
    58, 100, 134, 216, 91, 5, 231, 185, 140, 210, 48, 110, 237, 179, 81, 15, 78, 16, 242, 172,
    47, 113, 147, 205, 17, 79, 173, 243, 112, 46, 204, 146, 211, 141, 111, 49, 178, 236, 14, 80,
    175, 241, 19, 77, 206, 144, 114, 44, 109, 51, 209, 143, 12, 82, 176, 238, 50, 108, 142, 208,
    83, 13, 239, 177, 240, 174, 76, 18, 145, 207, 45, 115, 202, 148, 118, 40, 171, 245, 23, 73,
    8, 86, 180, 234, 105, 55, 213, 139, 87, 9, 235, 181, 54, 104, 138, 212, 149, 203, 41, 119,
    244, 170, 72, 22, 233, 183, 85, 11, 136, 214, 52, 106, 43, 117, 151, 201, 74, 20, 246, 168,
    116, 42, 200, 150, 21, 75, 169, 247, 182, 232, 10, 84, 215, 137, 107, 53,
];

/// Nibble parity, `1` where the nibble has an odd number of set bits.
const ODD_PARITY: [u8; 16] = [0, 1, 1, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0, 1, 1, 0];

/// Computes the 1-Wire CRC-8 of `bytes` starting from `seed` using the lookup table.
pub fn crc8_table(bytes: &[u8], seed: u8) -> u8 {
    bytes
        .iter()
        .fold(seed, |crc, &b| CRC8_TABLE[(crc ^ b) as usize])
}

/// Computes the 1-Wire CRC-8 of `bytes` starting from `seed`, one bit at a time.
///
/// Slower than [`crc8_table`] but needs no table; both always agree.
pub fn crc8_bitwise(bytes: &[u8], seed: u8) -> u8 {
    bytes.iter().fold(seed, |crc, &b| crc8_update(crc, b))
}

#[inline]
fn crc8_update(crc: u8, byte: u8) -> u8 {
    let mut crc = crc ^ byte;
    for _ in 0..8 {
        if crc & 0x1 == 0x1 {
            crc = (crc >> 1) ^ 0x8c;
        } else {
            crc >>= 1;
        }
    }
    crc
}

/// Computes the 1-Wire CRC-8 of `bytes` starting from `seed`.
///
/// Uses [`crc8_table`] with the `crc-table` feature (the default), [`crc8_bitwise`] otherwise.
#[inline]
pub fn crc8(bytes: &[u8], seed: u8) -> u8 {
    #[cfg(feature = "crc-table")]
    {
        crc8_table(bytes, seed)
    }
    #[cfg(not(feature = "crc-table"))]
    {
        crc8_bitwise(bytes, seed)
    }
}

/// Computes the 1-Wire CRC-16 of `bytes` starting from `seed`.
///
/// The result can be fed back as `seed` to continue over more data. Note that devices send
/// the one's complement of this value, low byte first; use [`check_crc16`] to compare against
/// the bytes received.
pub fn crc16(bytes: &[u8], seed: u16) -> u16 {
    bytes.iter().fold(seed, |mut crc, &b| {
        let cdata = (b as u16 ^ crc) & 0xff;
        crc >>= 8;
        if ODD_PARITY[(cdata & 0x0f) as usize] ^ ODD_PARITY[(cdata >> 4) as usize] != 0 {
            crc ^= 0xc001;
        }
        crc ^ (cdata << 6) ^ (cdata << 7)
    })
}

/// Checks `bytes` against the inverted CRC-16 received from a device.
///
/// `inverted_crc` holds the two CRC bytes exactly as they came off the bus.
pub fn check_crc16(bytes: &[u8], inverted_crc: [u8; 2], seed: u16) -> bool {
    !crc16(bytes, seed) == u16::from_le_bytes(inverted_crc)
}

#[derive(Debug, Default, Clone, Copy)]
/// Calculate CRC-8 used in 1-Wire communications, one byte at a time.
pub struct OneWireCrc(u8);

impl OneWireCrc {
    /// Start from a given seed.
    pub fn new(seed: u8) -> Self {
        Self(seed)
    }

    /// Get the current CRC value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Update the CRC with the incoming byte.
    pub fn update(&mut self, byte: u8) {
        self.0 = crc8(&[byte], self.0);
    }

    /// Validate a sequence of bytes where the last byte is the 1-Wire CRC of
    /// the previous bytes.
    pub fn validate(sequence: &[u8]) -> bool {
        let mut crc = OneWireCrc(0);
        for &byte in sequence.iter() {
            crc.update(byte);
        }
        crc.0 == 0x0 // the CRC of data followed by its own CRC is zero
    }
}
