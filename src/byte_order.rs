//! Helpers for the little-endian 24-bit length field used in packet headers.
//!
//! These helpers keep Clippy expectations scoped to the conversion points so
//! framing code can remain explicit about wire endianness without repeating
//! lint annotations.

/// Largest value representable by a 24-bit length field.
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Serialise the low 24 bits of `value` as three little-endian bytes.
///
/// Bits above the 24th are discarded; callers validate the range first.
///
/// # Examples
///
/// ```
/// use seqframe::byte_order::write_le_u24;
///
/// assert_eq!(write_le_u24(0x0012_3456), [0x56, 0x34, 0x12]);
/// ```
#[must_use]
pub fn write_le_u24(value: u32) -> [u8; 3] {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Packet headers carry the payload length in little-endian order."
    )]
    let [b0, b1, b2, _] = value.to_le_bytes();
    [b0, b1, b2]
}

/// Parse a 24-bit little-endian length from its on-wire representation.
///
/// # Examples
///
/// ```
/// use seqframe::byte_order::read_le_u24;
///
/// assert_eq!(read_le_u24([0xff, 0xff, 0xff]), 0x00FF_FFFF);
/// assert_eq!(read_le_u24([0x01, 0x00, 0x00]), 1);
/// ```
#[must_use]
pub fn read_le_u24(bytes: [u8; 3]) -> u32 {
    let [b0, b1, b2] = bytes;
    #[expect(
        clippy::little_endian_bytes,
        reason = "Packet headers carry the payload length in little-endian order."
    )]
    u32::from_le_bytes([b0, b1, b2, 0])
}

#[cfg(test)]
mod tests {
    //! Conversion checks for the 24-bit length helpers.

    use rstest::rstest;

    use super::{U24_MAX, read_le_u24, write_le_u24};

    #[rstest]
    #[case::zero(0, [0x00, 0x00, 0x00])]
    #[case::one(1, [0x01, 0x00, 0x00])]
    #[case::mixed(0x0001_0203, [0x03, 0x02, 0x01])]
    #[case::max(U24_MAX, [0xff, 0xff, 0xff])]
    fn le_u24_matches_wire_bytes(#[case] value: u32, #[case] wire: [u8; 3]) {
        assert_eq!(write_le_u24(value), wire);
        assert_eq!(read_le_u24(wire), value);
    }

    #[test]
    fn write_discards_high_byte() {
        assert_eq!(write_le_u24(0xAB00_0001), [0x01, 0x00, 0x00]);
    }
}
