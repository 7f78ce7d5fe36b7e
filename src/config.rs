//! Connection configuration.
//!
//! [`PacketConfig`] controls the read buffering applied to the underlying
//! stream and an optional cap on reassembled message size.

use std::num::NonZeroUsize;

/// Default capacity of the read buffer wrapped around the stream.
pub const DEFAULT_READ_BUFFER_CAPACITY: usize = 4096;

/// Settings applied when a [`PacketConn`](crate::PacketConn) is constructed.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use seqframe::PacketConfig;
///
/// let config = PacketConfig::default()
///     .with_read_buffer_capacity(8192)
///     .with_max_message_size(NonZeroUsize::new(64 * 1024 * 1024));
/// assert_eq!(config.read_buffer_capacity(), 8192);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketConfig {
    read_buffer_capacity: usize,
    max_message_size: Option<NonZeroUsize>,
}

impl PacketConfig {
    /// Set the capacity of the read buffer. Zero is raised to one byte.
    #[must_use]
    pub fn with_read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity.max(1);
        self
    }

    /// Cap the size of a reassembled message. `None` disables the cap.
    #[must_use]
    pub fn with_max_message_size(mut self, max: Option<NonZeroUsize>) -> Self {
        self.max_message_size = max;
        self
    }

    /// Capacity of the read buffer in bytes.
    #[must_use]
    pub const fn read_buffer_capacity(&self) -> usize { self.read_buffer_capacity }

    /// Largest reassembled message accepted, if capped.
    #[must_use]
    pub const fn max_message_size(&self) -> Option<NonZeroUsize> { self.max_message_size }
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            read_buffer_capacity: DEFAULT_READ_BUFFER_CAPACITY,
            max_message_size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::*;

    #[test]
    fn defaults_match_buffered_reader_size() {
        let config = PacketConfig::default();
        assert_eq!(config.read_buffer_capacity(), DEFAULT_READ_BUFFER_CAPACITY);
        assert_eq!(config.max_message_size(), None);
    }

    #[test]
    fn zero_capacity_is_raised() {
        let config = PacketConfig::default().with_read_buffer_capacity(0);
        assert_eq!(config.read_buffer_capacity(), 1);
    }

    #[test]
    fn max_message_size_round_trips() {
        let max = NonZeroUsize::new(1024);
        let config = PacketConfig::default().with_max_message_size(max);
        assert_eq!(config.max_message_size(), max);
    }
}
