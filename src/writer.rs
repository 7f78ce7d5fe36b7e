//! Outbound half of the framing layer.
//!
//! Both writers split a logical message into packets of at most
//! [`MAX_PAYLOAD_LEN`] bytes. A message whose length is a multiple of the
//! maximum (including zero) always ends with a shorter, possibly empty, packet
//! so the peer can tell where it stops.

use bytes::Buf;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    Sequence,
    codec::{PacketError, ProtocolError, TransportStage},
    header::{HEADER_LEN, MAX_PAYLOAD_LEN, PacketHeader},
    metrics::{self, Direction},
};

/// Write `payload` as one logical message, returning the number of packets
/// sent.
///
/// Headers are built in scratch space, so `payload` is left untouched.
///
/// # Errors
///
/// Returns [`PacketError::Transport`] when a write or the final flush fails.
/// Packets sent before the failure stay on the wire and the counter reflects
/// them; the connection should be discarded.
///
/// # Examples
///
/// ```
/// use seqframe::{Sequence, write_message};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), seqframe::PacketError> {
/// let mut wire = Vec::new();
/// let mut sequence = Sequence::new(3);
/// let packets = write_message(&mut wire, &mut sequence, b"ping").await?;
/// assert_eq!(packets, 1);
/// assert_eq!(wire, [0x04, 0x00, 0x00, 0x03, b'p', b'i', b'n', b'g']);
/// assert_eq!(sequence.get(), 4);
/// # Ok(())
/// # }
/// ```
pub async fn write_message<W>(
    writer: &mut W,
    sequence: &mut Sequence,
    payload: &[u8],
) -> Result<usize, PacketError>
where
    W: AsyncWrite + Unpin,
{
    record(send_chunks(writer, sequence, payload).await)
}

/// Write a message whose first [`HEADER_LEN`] bytes are reserved for the
/// header, returning the number of packets sent.
///
/// Headers are stamped into `buf` in place: the first at offset zero and each
/// following one over the last four bytes of the chunk already sent. The
/// contents of `buf` are therefore unspecified after the call.
///
/// # Errors
///
/// Returns [`ProtocolError::MissingHeaderSpace`] without writing anything when
/// `buf` is shorter than [`HEADER_LEN`], and [`PacketError::Transport`] when a
/// write or the final flush fails.
///
/// # Examples
///
/// ```
/// use seqframe::{Sequence, write_packet};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), seqframe::PacketError> {
/// let mut buf = vec![0, 0, 0, 0, b'h', b'i'];
/// let mut wire = Vec::new();
/// let mut sequence = Sequence::default();
/// write_packet(&mut wire, &mut sequence, &mut buf).await?;
/// assert_eq!(wire, [0x02, 0x00, 0x00, 0x00, b'h', b'i']);
/// # Ok(())
/// # }
/// ```
pub async fn write_packet<W>(
    writer: &mut W,
    sequence: &mut Sequence,
    buf: &mut [u8],
) -> Result<usize, PacketError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    record(send_in_place(writer, sequence, buf).await)
}

fn record(result: Result<usize, PacketError>) -> Result<usize, PacketError> {
    match &result {
        Ok(packets) => {
            metrics::inc_messages(Direction::Outbound);
            tracing::debug!(packets, "wrote message");
        }
        Err(err) => metrics::inc_errors(err.error_type()),
    }
    result
}

async fn send_chunks<W>(
    writer: &mut W,
    sequence: &mut Sequence,
    payload: &[u8],
) -> Result<usize, PacketError>
where
    W: AsyncWrite + Unpin,
{
    let mut rest = payload;
    let mut packets = 0;

    loop {
        let (chunk, tail) = rest.split_at(rest.len().min(MAX_PAYLOAD_LEN));
        let header = PacketHeader::for_chunk(chunk.len(), sequence.get());
        let stage = stage_for(header);

        let encoded = header.encode();
        let mut frame = encoded.as_slice().chain(chunk);
        writer
            .write_all_buf(&mut frame)
            .await
            .map_err(|err| PacketError::transport(stage, err))?;
        sent(sequence, header);
        packets += 1;

        if !header.continues() {
            break;
        }
        rest = tail;
    }

    flush(writer).await?;
    Ok(packets)
}

async fn send_in_place<W>(
    writer: &mut W,
    sequence: &mut Sequence,
    buf: &mut [u8],
) -> Result<usize, PacketError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    if buf.len() < HEADER_LEN {
        return Err(ProtocolError::MissingHeaderSpace { len: buf.len() }.into());
    }

    let mut offset = 0;
    let mut remaining = buf.len() - HEADER_LEN;
    let mut packets = 0;

    loop {
        let chunk_len = remaining.min(MAX_PAYLOAD_LEN);
        let header = PacketHeader::for_chunk(chunk_len, sequence.get());
        let stage = stage_for(header);

        let frame = &mut buf[offset..offset + HEADER_LEN + chunk_len];
        header.stamp(frame);
        writer
            .write_all(frame)
            .await
            .map_err(|err| PacketError::transport(stage, err))?;
        sent(sequence, header);
        packets += 1;

        if !header.continues() {
            break;
        }
        offset += MAX_PAYLOAD_LEN;
        remaining -= MAX_PAYLOAD_LEN;
    }

    flush(writer).await?;
    Ok(packets)
}

/// Continuation packets report as header writes, the final one as a body write.
fn stage_for(header: PacketHeader) -> TransportStage {
    if header.continues() {
        TransportStage::HeaderWrite
    } else {
        TransportStage::BodyWrite
    }
}

fn sent(sequence: &mut Sequence, header: PacketHeader) {
    sequence.advance();
    metrics::inc_packets(Direction::Outbound);
    tracing::trace!(
        sequence = header.sequence(),
        len = header.payload_len(),
        "wrote packet"
    );
}

async fn flush<W>(writer: &mut W) -> Result<(), PacketError>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer
        .flush()
        .await
        .map_err(|err| PacketError::transport(TransportStage::Flush, err))
}
