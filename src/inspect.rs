//! Capture inspection routines backing the `seqframe` binary.

use std::{io, num::NonZeroUsize};

use futures::StreamExt;
use seqframe::{PacketCodec, PacketError, Sequence, TransportStage, read_packet_into};
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;

/// Write one line per physical packet to `out`, returning the packet count.
pub async fn list_packets<R, W>(input: R, out: &mut W) -> io::Result<usize>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut packets = FramedRead::new(input, PacketCodec::new());
    let mut count = 0;
    while let Some(packet) = packets.next().await {
        let packet = packet?;
        let marker = if packet.continues() { " +" } else { "" };
        out.write_all(
            format!(
                "packet {count}: sequence={} len={}{marker}\n",
                packet.sequence,
                packet.payload.len()
            )
            .as_bytes(),
        )
        .await?;
        count += 1;
    }
    out.flush().await?;
    Ok(count)
}

/// Reassemble messages from `input` until a clean close, writing one line per
/// message to `out` and returning the message count.
pub async fn list_messages<R, W>(
    input: &mut R,
    out: &mut W,
    max_message_size: Option<NonZeroUsize>,
    reset_sequence: bool,
) -> Result<usize, PacketError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut sequence = Sequence::default();
    let mut count = 0;
    loop {
        if reset_sequence {
            sequence.reset();
        }
        let first = sequence;
        let mut sink = tokio::io::sink();
        let len = match read_packet_into(input, &mut sequence, &mut sink, max_message_size).await {
            Ok(len) => len,
            Err(err) if err.is_clean_close() => break,
            Err(err) => return Err(err),
        };
        let line = format!("message {count}: sequence={first} len={len}\n");
        out.write_all(line.as_bytes())
            .await
            .map_err(|err| PacketError::transport(TransportStage::SinkWrite, err))?;
        count += 1;
    }
    tracing::info!(messages = count, "capture fully reassembled");
    Ok(count)
}
