//! Raw wire builders and decoders for asserting on packet bytes.

use bytes::BytesMut;
use seqframe::{PacketCodec, PhysicalPacket};
use tokio_util::codec::Decoder;

/// Encode a header with an arbitrary 24-bit `len` (not checked against the
/// payload) followed by `payload`.
///
/// Useful for forging malformed packets.
#[must_use]
pub fn raw_packet(len: u32, sequence: u8, payload: &[u8]) -> Vec<u8> {
    let [l0, l1, l2, _] = len.to_le_bytes();
    let mut out = Vec::with_capacity(4 + payload.len());
    out.extend_from_slice(&[l0, l1, l2, sequence]);
    out.extend_from_slice(payload);
    out
}

/// Encode a well-formed packet carrying `payload`.
///
/// # Panics
///
/// Panics if `payload` exceeds the maximum packet length.
#[must_use]
pub fn packet(sequence: u8, payload: &[u8]) -> Vec<u8> {
    let len = u32::try_from(payload.len()).expect("payload length fits in u32");
    assert!(
        payload.len() <= seqframe::MAX_PAYLOAD_LEN,
        "payload exceeds max packet length"
    );
    raw_packet(len, sequence, payload)
}

/// Split `wire` into physical packets.
///
/// # Panics
///
/// Panics if `wire` contains a truncated packet.
#[must_use]
pub fn decode_packets(wire: &[u8]) -> Vec<PhysicalPacket> {
    let mut codec = PacketCodec::new();
    let mut buf = BytesMut::from(wire);
    let mut packets = Vec::new();
    while let Some(packet) = codec.decode_eof(&mut buf).expect("well-formed packets") {
        packets.push(packet);
    }
    packets
}

/// Payload of `len` bytes with a repeating, position-dependent pattern so
/// misordered chunks are detectable.
#[must_use]
pub fn patterned_payload(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| u8::try_from(i % 251).expect("remainder below 251"))
        .collect()
}
