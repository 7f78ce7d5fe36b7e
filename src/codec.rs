//! Tokio codec for individual physical packets.
//!
//! [`PacketCodec`] splits a byte stream into [`PhysicalPacket`]s and encodes
//! them back without validating sequence numbers or reassembling messages.
//! It suits wire inspection and tests that need to observe fragmentation; the
//! sequenced message API lives on [`PacketConn`](crate::PacketConn).
//!
//! # Error Handling
//!
//! The framing layer reports failures through [`PacketError`], which separates
//! transport failures from protocol violations. See the [`error`] module.

use std::io;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::header::{HEADER_LEN, MAX_PAYLOAD_LEN, PacketHeader};

pub mod error;

pub use error::{EofError, PacketError, ProtocolError, TransportStage, is_transport_error};

/// A single packet as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhysicalPacket {
    /// Sequence number carried by the header.
    pub sequence: u8,
    /// Payload bytes following the header.
    pub payload: Bytes,
}

impl PhysicalPacket {
    /// Construct a packet from its parts.
    #[must_use]
    pub fn new(sequence: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            sequence,
            payload: payload.into(),
        }
    }

    /// Whether the payload is maximal, meaning the message continues.
    #[must_use]
    pub fn continues(&self) -> bool { self.payload.len() == MAX_PAYLOAD_LEN }
}

/// Stateless encoder and decoder for [`PhysicalPacket`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct PacketCodec;

impl PacketCodec {
    /// Construct a new codec.
    #[must_use]
    pub const fn new() -> Self { Self }
}

impl Decoder for PacketCodec {
    type Item = PhysicalPacket;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(header) = src
            .get(..HEADER_LEN)
            .and_then(|slice| <[u8; HEADER_LEN]>::try_from(slice).ok())
            .map(PacketHeader::decode)
        else {
            return Ok(None);
        };

        let total = HEADER_LEN + header.payload_len();
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        let mut frame = src.split_to(total);
        frame.advance(HEADER_LEN);
        Ok(Some(PhysicalPacket {
            sequence: header.sequence(),
            payload: frame.freeze(),
        }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(packet) = self.decode(src)? {
            return Ok(Some(packet));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let err = match src
            .get(..HEADER_LEN)
            .and_then(|slice| <[u8; HEADER_LEN]>::try_from(slice).ok())
        {
            Some(bytes) => EofError::MidBody {
                bytes_received: src.len() - HEADER_LEN,
                expected: PacketHeader::decode(bytes).payload_len(),
            },
            None => EofError::MidHeader {
                bytes_received: src.len(),
                header_size: HEADER_LEN,
            },
        };
        Err(err.into())
    }
}

impl Encoder<PhysicalPacket> for PacketCodec {
    type Error = io::Error;

    fn encode(&mut self, item: PhysicalPacket, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let header = PacketHeader::new(item.payload.len(), item.sequence).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "payload of {} bytes exceeds max packet length {MAX_PAYLOAD_LEN}",
                    item.payload.len()
                ),
            )
        })?;
        dst.reserve(HEADER_LEN + item.payload.len());
        dst.put_slice(&header.encode());
        dst.put_slice(&item.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
