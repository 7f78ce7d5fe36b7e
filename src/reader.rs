//! Inbound half of the framing layer.
//!
//! [`read_packet_into`] reads consecutive packets from a buffered stream,
//! validates each header against the expected [`Sequence`], and copies the
//! payloads into a sink until a packet shorter than
//! [`MAX_PAYLOAD_LEN`](crate::MAX_PAYLOAD_LEN) ends the logical message.

use std::{io, num::NonZeroUsize};

use log::warn;
use tokio::io::{
    AsyncBufRead,
    AsyncBufReadExt,
    AsyncRead,
    AsyncReadExt,
    AsyncWrite,
    AsyncWriteExt,
};

use crate::{
    Sequence,
    codec::{EofError, PacketError, ProtocolError, TransportStage},
    header::{HEADER_LEN, PacketHeader},
    metrics::{self, Direction},
};

/// Read one logical message from `reader` into `sink`, returning the number of
/// payload bytes copied.
///
/// `sequence` advances once per packet consumed. A packet whose sequence
/// number does not match leaves the counter untouched. When `max_message_size`
/// is set, a message that would grow beyond it is rejected before its next
/// payload is read.
///
/// An empty packet is accepted only as the terminator directly after a
/// maximal packet; as the first packet of a message it is a protocol error.
///
/// # Errors
///
/// Returns [`PacketError::Transport`] when the stream fails or ends early, or
/// when `sink` rejects a write, and [`PacketError::Protocol`] for invalid
/// headers.
///
/// # Examples
///
/// ```
/// use seqframe::{Sequence, read_packet_into};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), seqframe::PacketError> {
/// let wire: &[u8] = &[0x02, 0x00, 0x00, 0x00, b'o', b'k'];
/// let mut reader = tokio::io::BufReader::new(wire);
/// let mut sequence = Sequence::default();
/// let mut message = Vec::new();
/// let copied = read_packet_into(&mut reader, &mut sequence, &mut message, None).await?;
/// assert_eq!(copied, 2);
/// assert_eq!(message, b"ok");
/// assert_eq!(sequence.get(), 1);
/// # Ok(())
/// # }
/// ```
pub async fn read_packet_into<R, W>(
    reader: &mut R,
    sequence: &mut Sequence,
    sink: &mut W,
    max_message_size: Option<NonZeroUsize>,
) -> Result<usize, PacketError>
where
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let result = read_message(reader, sequence, sink, max_message_size).await;
    match &result {
        Ok(_) => metrics::inc_messages(Direction::Inbound),
        Err(err) => metrics::inc_errors(err.error_type()),
    }
    result
}

async fn read_message<R, W>(
    reader: &mut R,
    sequence: &mut Sequence,
    sink: &mut W,
    max_message_size: Option<NonZeroUsize>,
) -> Result<usize, PacketError>
where
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut total = 0usize;
    let mut after_maximal = false;

    loop {
        let header = read_header(reader, !after_maximal).await?;
        let len = header.payload_len();

        if len == 0 && !after_maximal {
            warn!("rejecting empty packet: sequence={}", header.sequence());
            return Err(ProtocolError::InvalidPayloadLength { length: len }.into());
        }
        if !sequence.matches(header.sequence()) {
            warn!(
                "packet sequence mismatch: expected={}, actual={}",
                sequence,
                header.sequence()
            );
            return Err(ProtocolError::SequenceMismatch {
                expected: sequence.get(),
                actual: header.sequence(),
            }
            .into());
        }
        let size = total.saturating_add(len);
        if let Some(max) = max_message_size.filter(|max| size > max.get()) {
            warn!("message exceeds limit: size={size}, max={max}");
            return Err(ProtocolError::MessageTooLarge {
                size,
                max: max.get(),
            }
            .into());
        }
        sequence.advance();

        copy_body(reader, sink, len).await?;
        total = size;
        metrics::inc_packets(Direction::Inbound);
        tracing::trace!(sequence = header.sequence(), len, "read packet");

        if !header.continues() {
            break;
        }
        after_maximal = true;
    }

    sink.flush()
        .await
        .map_err(|err| PacketError::transport(TransportStage::SinkWrite, err))?;
    tracing::debug!(len = total, "read message");
    Ok(total)
}

/// Read a complete header, classifying EOF by how many bytes arrived first.
///
/// EOF before the first byte is a clean close only at a message boundary.
async fn read_header<R>(reader: &mut R, at_boundary: bool) -> Result<PacketHeader, PacketError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => {
                let eof = if filled == 0 && at_boundary {
                    EofError::CleanClose
                } else {
                    EofError::MidHeader {
                        bytes_received: filled,
                        header_size: HEADER_LEN,
                    }
                };
                return Err(PacketError::transport(TransportStage::HeaderRead, eof.into()));
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(PacketError::transport(TransportStage::HeaderRead, err)),
        }
    }
    Ok(PacketHeader::decode(buf))
}

/// Copy exactly `len` payload bytes from the read buffer into `sink`.
async fn copy_body<R, W>(reader: &mut R, sink: &mut W, len: usize) -> Result<(), PacketError>
where
    R: AsyncBufRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut remaining = len;
    while remaining > 0 {
        let available = match reader.fill_buf().await {
            Ok(available) => available,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(PacketError::transport(TransportStage::BodyRead, err)),
        };
        if available.is_empty() {
            let eof = EofError::MidBody {
                bytes_received: len - remaining,
                expected: len,
            };
            return Err(PacketError::transport(TransportStage::BodyRead, eof.into()));
        }

        let n = available.len().min(remaining);
        sink.write_all(&available[..n])
            .await
            .map_err(|err| PacketError::transport(TransportStage::SinkWrite, err))?;
        reader.consume(n);
        remaining -= n;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use tokio::io::BufReader;

    use super::*;

    fn packet(len_bytes: [u8; 3], sequence: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = len_bytes.to_vec();
        out.push(sequence);
        out.extend_from_slice(payload);
        out
    }

    #[tokio::test]
    async fn reads_single_packet_message() {
        let wire = packet([3, 0, 0], 0, b"abc");
        let mut reader = BufReader::new(wire.as_slice());
        let mut sequence = Sequence::default();
        let mut sink = Vec::new();

        let copied = read_packet_into(&mut reader, &mut sequence, &mut sink, None)
            .await
            .expect("read should succeed");

        assert_eq!(copied, 3);
        assert_eq!(sink, b"abc");
        assert_eq!(sequence.get(), 1);
    }

    #[tokio::test]
    async fn limit_rejects_before_body_is_copied() {
        let wire = packet([8, 0, 0], 0, &[7; 8]);
        let mut reader = BufReader::new(wire.as_slice());
        let mut sequence = Sequence::default();
        let mut sink = Vec::new();

        let err = read_packet_into(&mut reader, &mut sequence, &mut sink, NonZeroUsize::new(4))
            .await
            .expect_err("message over limit must fail");

        assert!(matches!(
            err,
            PacketError::Protocol(ProtocolError::MessageTooLarge { size: 8, max: 4 })
        ));
        assert!(sink.is_empty());
        assert_eq!(sequence.get(), 0);
    }

    #[tokio::test]
    async fn truncated_body_reports_counts() {
        let mut wire = packet([5, 0, 0], 0, b"ab");
        wire.truncate(6);
        let mut reader = BufReader::new(wire.as_slice());
        let mut sequence = Sequence::default();
        let mut sink = Vec::new();

        let err = read_packet_into(&mut reader, &mut sequence, &mut sink, None)
            .await
            .expect_err("truncated body must fail");

        assert_eq!(err.stage(), Some(TransportStage::BodyRead));
        assert_eq!(
            err.eof(),
            Some(&EofError::MidBody {
                bytes_received: 2,
                expected: 5,
            })
        );
    }
}
