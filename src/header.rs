//! Four-byte packet header: 24-bit little-endian payload length plus an 8-bit
//! sequence number.

use crate::byte_order::{U24_MAX, read_le_u24, write_le_u24};

/// Size of an encoded packet header in bytes.
pub const HEADER_LEN: usize = 4;

/// Largest payload a single physical packet may carry (16,777,215 bytes).
///
/// A packet of exactly this length signals that the logical message continues
/// in the next packet.
pub const MAX_PAYLOAD_LEN: usize = U24_MAX as usize;

/// Decoded packet header.
///
/// # Examples
///
/// ```
/// use seqframe::PacketHeader;
///
/// let header = PacketHeader::decode([0x03, 0x00, 0x00, 0x07]);
/// assert_eq!(header.payload_len(), 3);
/// assert_eq!(header.sequence(), 7);
/// assert_eq!(header.encode(), [0x03, 0x00, 0x00, 0x07]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketHeader {
    payload_len: u32,
    sequence: u8,
}

impl PacketHeader {
    /// Build a header, returning `None` when `payload_len` exceeds
    /// [`MAX_PAYLOAD_LEN`].
    #[must_use]
    pub fn new(payload_len: usize, sequence: u8) -> Option<Self> {
        let payload_len = u32::try_from(payload_len).ok().filter(|len| *len <= U24_MAX)?;
        Some(Self {
            payload_len,
            sequence,
        })
    }

    /// Build a header for a chunk of at most [`MAX_PAYLOAD_LEN`] bytes.
    pub(crate) fn for_chunk(chunk_len: usize, sequence: u8) -> Self {
        debug_assert!(chunk_len <= MAX_PAYLOAD_LEN, "chunk exceeds max payload");
        Self {
            payload_len: u32::try_from(chunk_len).map_or(U24_MAX, |len| len.min(U24_MAX)),
            sequence,
        }
    }

    /// Parse a header from its wire bytes.
    #[must_use]
    pub fn decode(bytes: [u8; HEADER_LEN]) -> Self {
        let [l0, l1, l2, sequence] = bytes;
        Self {
            payload_len: read_le_u24([l0, l1, l2]),
            sequence,
        }
    }

    /// Serialise the header into its wire bytes.
    #[must_use]
    pub fn encode(self) -> [u8; HEADER_LEN] {
        let [l0, l1, l2] = write_le_u24(self.payload_len);
        [l0, l1, l2, self.sequence]
    }

    /// Write the encoded header into the first [`HEADER_LEN`] bytes of `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than [`HEADER_LEN`].
    pub fn stamp(self, dst: &mut [u8]) { dst[..HEADER_LEN].copy_from_slice(&self.encode()); }

    /// Payload length announced by the header.
    #[must_use]
    pub const fn payload_len(self) -> usize { self.payload_len as usize }

    /// Sequence number carried by the header.
    #[must_use]
    pub const fn sequence(self) -> u8 { self.sequence }

    /// Whether the payload is maximal, meaning another packet follows.
    #[must_use]
    pub const fn continues(self) -> bool { self.payload_len() == MAX_PAYLOAD_LEN }
}
