//! Sequenced packet connection over a duplex byte stream.
//!
//! [`PacketConn`] owns the stream, a read buffer wrapped around it, and the
//! [`Sequence`] counter shared by both directions. Methods take `&mut self`,
//! so two reads or two writes can never race on the counter.

use std::{io, num::NonZeroUsize};

use bytes::Bytes;
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::{
    PacketConfig,
    Sequence,
    codec::{PacketError, TransportStage},
    reader,
    writer,
};

/// Framing state for one logical session.
///
/// # Examples
///
/// ```
/// use seqframe::PacketConn;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), seqframe::PacketError> {
/// let (client, server) = tokio::io::duplex(1024);
/// let mut client = PacketConn::new(client);
/// let mut server = PacketConn::new(server);
///
/// client.write_message(b"hello").await?;
/// assert_eq!(server.read_packet().await?.as_ref(), b"hello");
/// assert_eq!(client.sequence().get(), 1);
/// assert_eq!(server.sequence().get(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PacketConn<S> {
    stream: Option<BufReader<S>>,
    sequence: Sequence,
    max_message_size: Option<NonZeroUsize>,
}

impl<S> PacketConn<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap `stream` using the default [`PacketConfig`].
    #[must_use]
    pub fn new(stream: S) -> Self { Self::with_config(stream, PacketConfig::default()) }

    /// Wrap `stream` with explicit settings.
    #[must_use]
    pub fn with_config(stream: S, config: PacketConfig) -> Self {
        Self {
            stream: Some(BufReader::with_capacity(config.read_buffer_capacity(), stream)),
            sequence: Sequence::default(),
            max_message_size: config.max_message_size(),
        }
    }

    /// Read one logical message into memory.
    ///
    /// # Errors
    ///
    /// See [`read_packet_into`](Self::read_packet_into).
    pub async fn read_packet(&mut self) -> Result<Bytes, PacketError> {
        let mut buf = Vec::new();
        self.read_packet_into(&mut buf).await?;
        Ok(Bytes::from(buf))
    }

    /// Read one logical message, copying its payload into `sink`.
    ///
    /// Returns the number of payload bytes copied.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the stream fails, ends early or is closed,
    /// and a protocol error for an empty first packet, a sequence mismatch, or
    /// a message above the configured size limit. Either way the connection is
    /// no longer usable.
    pub async fn read_packet_into<W>(&mut self, sink: &mut W) -> Result<usize, PacketError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let stream = self.stream.as_mut().ok_or_else(closed)?;
        reader::read_packet_into(stream, &mut self.sequence, sink, self.max_message_size).await
    }

    /// Send `payload` as one logical message, returning the number of packets
    /// written.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the stream fails or is closed. Packets sent
    /// before a failure are not rolled back.
    pub async fn write_message(&mut self, payload: &[u8]) -> Result<usize, PacketError> {
        let stream = self.stream.as_mut().ok_or_else(closed)?;
        writer::write_message(stream.get_mut(), &mut self.sequence, payload).await
    }

    /// Send a message whose first four bytes are reserved for the header.
    ///
    /// `buf` is overwritten in place while packets are stamped.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if `buf` is shorter than four bytes, and a
    /// transport error if the stream fails or is closed.
    pub async fn write_packet(&mut self, buf: &mut [u8]) -> Result<usize, PacketError> {
        let stream = self.stream.as_mut().ok_or_else(closed)?;
        writer::write_packet(stream.get_mut(), &mut self.sequence, buf).await
    }

    /// Restart packet numbering at zero.
    pub fn reset_sequence(&mut self) {
        debug!("resetting packet sequence: previous={}", self.sequence);
        self.sequence.reset();
    }

    /// Sequence number expected on the next packet in either direction.
    #[must_use]
    pub fn sequence(&self) -> Sequence { self.sequence }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.stream.is_none() }

    /// Reset the sequence and shut the stream down.
    ///
    /// Calling this on an already closed connection is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a transport error if shutting the stream down fails. The stream
    /// is dropped regardless.
    pub async fn close(&mut self) -> Result<(), PacketError> {
        self.sequence.reset();
        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };
        info!("closing packet connection");
        stream
            .shutdown()
            .await
            .map_err(|err| PacketError::transport(TransportStage::Close, err))
    }

    /// Borrow the underlying stream, e.g. to inspect socket options.
    #[must_use]
    pub fn get_ref(&self) -> Option<&S> { self.stream.as_ref().map(BufReader::get_ref) }

    /// Mutably borrow the underlying stream.
    ///
    /// Reading from it directly bypasses buffered bytes and desynchronises the
    /// connection.
    #[must_use]
    pub fn get_mut(&mut self) -> Option<&mut S> { self.stream.as_mut().map(BufReader::get_mut) }

    /// Consume the connection, returning the stream unless it was closed.
    ///
    /// Bytes already buffered for reading are discarded.
    #[must_use]
    pub fn into_inner(self) -> Option<S> { self.stream.map(BufReader::into_inner) }
}

fn closed() -> PacketError {
    PacketError::transport(
        TransportStage::Closed,
        io::Error::new(io::ErrorKind::NotConnected, "connection closed"),
    )
}
