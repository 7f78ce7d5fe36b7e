//! Metric helpers for `seqframe`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. When the `metrics` feature is
//! disabled the helpers compile to no-ops.

/// Name of the counter tracking physical packets.
pub const PACKETS_TOTAL: &str = "seqframe_packets_total";
/// Name of the counter tracking logical messages.
pub const MESSAGES_TOTAL: &str = "seqframe_messages_total";
/// Name of the counter tracking framing errors.
pub const ERRORS_TOTAL: &str = "seqframe_errors_total";

/// Direction of packet flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Packets read from the stream.
    Inbound,
    /// Packets written to the stream.
    Outbound,
}

impl Direction {
    /// Label value used when recording metrics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record a physical packet for the given direction.
pub fn inc_packets(direction: Direction) {
    #[cfg(feature = "metrics")]
    metrics::counter!(PACKETS_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a completed logical message for the given direction.
pub fn inc_messages(direction: Direction) {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a framing error labelled with its category.
pub fn inc_errors(kind: &'static str) {
    #[cfg(feature = "metrics")]
    metrics::counter!(ERRORS_TOTAL, "kind" => kind).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = kind;
}
