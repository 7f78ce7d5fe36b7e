//! Shared helpers for testing `seqframe` connections.
//!
//! Provides loopback connection pairs, streams that fail on demand, raw wire
//! builders for forging packets, and a serialised log-capture fixture.
//!
//! ```rust
//! use seqframe_testing::loopback;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), seqframe::PacketError> {
//! let (mut client, mut server) = loopback();
//! client.write_message(b"ping").await?;
//! assert_eq!(server.read_packet().await?.as_ref(), b"ping");
//! # Ok(())
//! # }
//! ```

pub mod logging;
pub mod streams;
pub mod wire;

pub use logging::{LoggerHandle, logger};
pub use streams::{
    ChunkedReader,
    Exhaustion,
    LOOPBACK_CAPACITY,
    LimitedWriter,
    loopback,
    loopback_with_config,
    tcp_pair,
};
pub use wire::{decode_packets, packet, patterned_payload, raw_packet};
