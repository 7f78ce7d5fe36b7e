//! Unit tests for the physical packet codec.
//!
//! Covers header parsing, partial input buffering, EOF classification and
//! oversized payload rejection.

use std::io;

use bytes::{Bytes, BytesMut};
use rstest::rstest;
use tokio_util::codec::{Decoder, Encoder};

use super::*;

#[test]
fn decodes_single_packet() {
    let mut buf = BytesMut::from(&[0x03, 0x00, 0x00, 0x02, b'a', b'b', b'c'][..]);
    let packet = PacketCodec::new()
        .decode(&mut buf)
        .expect("decode should succeed")
        .expect("expected a packet");

    assert_eq!(packet, PhysicalPacket::new(2, Bytes::from_static(b"abc")));
    assert!(buf.is_empty());
}

#[test]
fn waits_for_complete_payload() {
    let mut codec = PacketCodec::new();
    let mut buf = BytesMut::from(&[0x03, 0x00, 0x00, 0x00, b'a'][..]);
    assert!(codec.decode(&mut buf).expect("decode").is_none());
    assert_eq!(buf.len(), 5);

    buf.extend_from_slice(b"bc");
    let packet = codec.decode(&mut buf).expect("decode").expect("packet");
    assert_eq!(packet.payload.as_ref(), b"abc");
}

#[test]
fn decodes_empty_packet() {
    let mut buf = BytesMut::from(&[0x00, 0x00, 0x00, 0x07][..]);
    let packet = PacketCodec::new()
        .decode(&mut buf)
        .expect("decode")
        .expect("packet");
    assert_eq!(packet.sequence, 7);
    assert!(packet.payload.is_empty());
}

#[rstest]
#[case::mid_header(&[0x05, 0x00][..], EofError::MidHeader { bytes_received: 2, header_size: 4 })]
#[case::mid_body(&[0x05, 0x00, 0x00, 0x00, 1, 2][..], EofError::MidBody { bytes_received: 2, expected: 5 })]
fn truncated_input_at_eof_is_classified(#[case] input: &[u8], #[case] expected: EofError) {
    let mut buf = BytesMut::from(input);
    let err = PacketCodec::new()
        .decode_eof(&mut buf)
        .expect_err("truncated input must fail");

    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    let eof = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<EofError>())
        .expect("EOF detail");
    assert_eq!(eof, &expected);
}

#[test]
fn clean_eof_yields_none() {
    let mut buf = BytesMut::new();
    assert!(
        PacketCodec::new()
            .decode_eof(&mut buf)
            .expect("clean EOF")
            .is_none()
    );
}

#[test]
fn encodes_header_and_payload() {
    let mut buf = BytesMut::new();
    PacketCodec::new()
        .encode(PhysicalPacket::new(9, Bytes::from_static(b"hi")), &mut buf)
        .expect("encode should succeed");
    assert_eq!(buf.as_ref(), &[0x02, 0x00, 0x00, 0x09, b'h', b'i']);
}

#[test]
fn rejects_oversized_payloads() {
    let mut buf = BytesMut::new();
    let err = PacketCodec::new()
        .encode(
            PhysicalPacket::new(0, vec![0_u8; MAX_PAYLOAD_LEN + 1]),
            &mut buf,
        )
        .expect_err("oversized payload must be rejected");
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(buf.is_empty());
}

#[test]
fn maximal_packet_continues() {
    assert!(PhysicalPacket::new(0, vec![0_u8; MAX_PAYLOAD_LEN]).continues());
    assert!(!PhysicalPacket::new(0, vec![0_u8; 16]).continues());
}
