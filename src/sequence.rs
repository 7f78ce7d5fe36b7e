//! Per-connection packet sequence counter.
//!
//! Provides [`Sequence`], a wrapping 8-bit counter that advances once per
//! physical packet read or written and is reset to zero when the higher-level
//! protocol restarts numbering.

use derive_more::{Display, From};

/// Wrapping sequence number stamped into every packet header.
///
/// # Examples
///
/// ```
/// use seqframe::Sequence;
///
/// let mut seq = Sequence::new(255);
/// seq.advance();
/// assert_eq!(seq.get(), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, From)]
#[display("{_0}")]
pub struct Sequence(u8);

impl Sequence {
    /// Construct a counter positioned at `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value) }

    /// Return the sequence number the next packet must carry.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Move to the next sequence number, wrapping from 255 to 0.
    pub fn advance(&mut self) { self.0 = self.0.wrapping_add(1); }

    /// Restart numbering at zero.
    pub fn reset(&mut self) { self.0 = 0; }

    /// Whether `actual` matches the expected sequence number.
    #[must_use]
    pub const fn matches(self, actual: u8) -> bool { self.0 == actual }
}

impl From<Sequence> for u8 {
    fn from(value: Sequence) -> Self { value.0 }
}

#[cfg(test)]
mod tests {
    use super::Sequence;

    #[test]
    fn advance_wraps_at_u8_max() {
        let mut seq = Sequence::new(254);
        seq.advance();
        assert_eq!(seq.get(), 255);
        seq.advance();
        assert_eq!(seq.get(), 0);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut seq = Sequence::new(17);
        seq.reset();
        assert_eq!(seq, Sequence::default());
    }

    #[test]
    fn displays_numeric_value() {
        assert_eq!(Sequence::new(42).to_string(), "42");
    }
}
