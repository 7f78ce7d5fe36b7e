#![doc(html_root_url = "https://docs.rs/seqframe/latest")]
//! Sequenced, length-prefixed packet framing over a duplex byte stream.
//!
//! Each physical packet carries a 4-byte header (24-bit little-endian payload
//! length and an 8-bit sequence number) followed by its payload. Logical
//! messages larger than [`MAX_PAYLOAD_LEN`] are split across consecutive
//! packets and reassembled on read; the sequence counter detects loss,
//! reordering, and desynchronisation. This is the packet layer of the `MySQL`
//! client/server protocol. Payload semantics, connection setup, and
//! authentication live above it.
//!
//! [`PacketConn`] is the main entry point. The free functions
//! [`read_packet_into`], [`write_message`] and [`write_packet`] expose the
//! same algorithms over split stream halves.

pub mod byte_order;
pub mod codec;
pub mod config;
pub mod connection;
pub mod header;
pub mod metrics;
pub mod reader;
pub mod sequence;
pub mod writer;

pub use codec::{
    EofError,
    PacketCodec,
    PacketError,
    PhysicalPacket,
    ProtocolError,
    TransportStage,
    is_transport_error,
};
pub use config::PacketConfig;
pub use connection::PacketConn;
pub use header::{HEADER_LEN, MAX_PAYLOAD_LEN, PacketHeader};
pub use reader::read_packet_into;
pub use sequence::Sequence;
pub use writer::{write_message, write_packet};
