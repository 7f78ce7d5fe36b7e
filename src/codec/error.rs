//! Error types for the packet framing layer.
//!
//! Failures fall into two categories:
//!
//! - Transport errors: the underlying stream failed, returned short, or was closed. These carry
//!   the original [`io::Error`] together with the [`TransportStage`] that was in progress.
//! - [`ProtocolError`]: a structurally invalid packet (bad length, sequence mismatch) or a caller
//!   contract violation. The connection is desynchronised and must not be reused.
//!
//! Premature end-of-stream is reported as a transport error whose source is an
//! [`io::Error`] of kind [`io::ErrorKind::UnexpectedEof`] wrapping an
//! [`EofError`], so callers can tell a clean close at a packet boundary from a
//! truncated packet.
//!
//! Neither category is retried at this layer.

use std::{error::Error as StdError, fmt, io};

use thiserror::Error;

/// Operation that was in progress when the transport failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransportStage {
    /// Reading the 4-byte packet header.
    HeaderRead,
    /// Reading the packet payload.
    BodyRead,
    /// Copying payload bytes into the caller's sink.
    SinkWrite,
    /// Writing a packet header together with its payload.
    HeaderWrite,
    /// Writing the final packet of a message.
    BodyWrite,
    /// Flushing the stream after the final packet.
    Flush,
    /// Shutting the stream down.
    Close,
    /// The connection was already closed.
    Closed,
}

impl TransportStage {
    fn description(self) -> &'static str {
        match self {
            Self::HeaderRead => "failed to read packet header",
            Self::BodyRead => "failed to read packet body",
            Self::SinkWrite => "failed to copy packet body into sink",
            Self::HeaderWrite => "failed to write packet header",
            Self::BodyWrite => "failed to write packet body",
            Self::Flush => "failed to flush packet stream",
            Self::Close => "failed to close packet stream",
            Self::Closed => "packet stream is closed",
        }
    }
}

impl fmt::Display for TransportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.description()) }
}

/// End-of-stream conditions observed while reading a packet.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EofError {
    /// The peer closed the stream at a packet boundary.
    #[error("connection closed cleanly at packet boundary")]
    CleanClose,

    /// The peer closed the stream part-way through a header.
    #[error("premature EOF during header: {bytes_received} of {header_size} header bytes")]
    MidHeader {
        /// Header bytes received before EOF.
        bytes_received: usize,
        /// Size of a complete header.
        header_size: usize,
    },

    /// The peer closed the stream part-way through a payload.
    #[error("packet body length mismatch: expected {expected}, got {bytes_received}")]
    MidBody {
        /// Payload bytes received before EOF.
        bytes_received: usize,
        /// Payload length announced by the header.
        expected: usize,
    },
}

impl From<EofError> for io::Error {
    fn from(err: EofError) -> Self { io::Error::new(io::ErrorKind::UnexpectedEof, err) }
}

/// Structural violations of the packet protocol.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A header announced an empty payload where one is not permitted.
    #[error("invalid payload length {length}")]
    InvalidPayloadLength {
        /// Length carried by the offending header.
        length: usize,
    },

    /// A header carried an unexpected sequence number.
    #[error("invalid sequence {actual} != {expected}")]
    SequenceMismatch {
        /// Sequence number the connection expected.
        expected: u8,
        /// Sequence number found in the header.
        actual: u8,
    },

    /// The reassembled message would exceed the configured limit.
    #[error("message exceeds max size: {size} > {max}")]
    MessageTooLarge {
        /// Size the message would reach.
        size: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The buffer handed to the writer lacks the reserved header bytes.
    #[error("packet buffer of {len} bytes lacks the reserved 4-byte header")]
    MissingHeaderSpace {
        /// Length of the buffer supplied.
        len: usize,
    },
}

/// Top-level error returned by packet reads and writes.
#[derive(Debug, Error)]
pub enum PacketError {
    /// The underlying stream failed.
    #[error("{stage}: {source}")]
    Transport {
        /// Operation in progress when the failure occurred.
        stage: TransportStage,
        /// Original I/O error.
        #[source]
        source: io::Error,
    },

    /// The stream carried a structurally invalid packet.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl PacketError {
    /// Wrap an I/O failure observed during `stage`.
    #[must_use]
    pub fn transport(stage: TransportStage, source: io::Error) -> Self {
        Self::Transport { stage, source }
    }

    /// Returns true when the underlying stream failed.
    ///
    /// # Examples
    ///
    /// ```
    /// use seqframe::{PacketError, ProtocolError, TransportStage};
    ///
    /// let err = PacketError::transport(
    ///     TransportStage::HeaderRead,
    ///     std::io::Error::other("reset"),
    /// );
    /// assert!(err.is_transport());
    ///
    /// let err = PacketError::from(ProtocolError::InvalidPayloadLength { length: 0 });
    /// assert!(!err.is_transport());
    /// ```
    #[must_use]
    pub fn is_transport(&self) -> bool { matches!(self, Self::Transport { .. }) }

    /// Returns true when the stream carried an invalid packet.
    #[must_use]
    pub fn is_protocol(&self) -> bool { matches!(self, Self::Protocol(_)) }

    /// Returns true when the peer closed the stream at a packet boundary.
    #[must_use]
    pub fn is_clean_close(&self) -> bool { self.eof() == Some(&EofError::CleanClose) }

    /// The end-of-stream condition behind a transport error, if any.
    #[must_use]
    pub fn eof(&self) -> Option<&EofError> {
        match self {
            Self::Transport { source, .. } => source.get_ref()?.downcast_ref::<EofError>(),
            Self::Protocol(_) => None,
        }
    }

    /// Stage reported by a transport error.
    #[must_use]
    pub fn stage(&self) -> Option<TransportStage> {
        match self {
            Self::Transport { stage, .. } => Some(*stage),
            Self::Protocol(_) => None,
        }
    }

    /// Returns the error category as a string for logging and metrics.
    ///
    /// One of `"transport"` or `"protocol"`.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Protocol(_) => "protocol",
        }
    }
}

impl From<PacketError> for io::Error {
    fn from(err: PacketError) -> Self {
        let kind = match &err {
            PacketError::Transport { source, .. } => source.kind(),
            PacketError::Protocol(_) => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

/// Returns true if `err`, or any error in its source chain, is a transport
/// [`PacketError`].
///
/// Higher layers typically wrap packet errors in their own types; this walks
/// the chain so the classification survives wrapping. I/O errors created with
/// a payload are inspected through [`io::Error::get_ref`] as well.
///
/// # Examples
///
/// ```
/// use seqframe::{PacketError, TransportStage, is_transport_error};
///
/// let err = PacketError::transport(TransportStage::BodyRead, std::io::Error::other("reset"));
/// let wrapped: std::io::Error = err.into();
/// assert!(is_transport_error(&wrapped));
/// ```
#[must_use]
pub fn is_transport_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(packet) = err.downcast_ref::<PacketError>() {
            return packet.is_transport();
        }
        if let Some(inner) = err.downcast_ref::<io::Error>().and_then(io::Error::get_ref) {
            current = Some(inner as &(dyn StdError + 'static));
            continue;
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
