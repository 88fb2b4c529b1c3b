//! Reading frame arithmetic.

use std::fmt;

use crate::error::Error;

/// Reading frame offset of an exon's first coding base (0, 1 or 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Frame(u8);

impl Frame {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Advances the frame by `amount` bases. Negative amounts step backwards.
    #[must_use]
    pub fn increment(self, amount: i64) -> Self {
        Self((i64::from(self.0) + amount).rem_euclid(3) as u8)
    }

    /// Number of single-base increments (0..=2) that take `self` to `target`.
    #[must_use]
    pub fn steps_to(self, target: Self) -> u8 {
        (i64::from(target.0) - i64::from(self.0)).rem_euclid(3) as u8
    }
}

impl TryFrom<i64> for Frame {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0..=2 => Ok(Self(value as u8)),
            _ => Err(Error::Parse(format!("invalid reading frame: {value}"))),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(v: i64) -> Frame {
        Frame::try_from(v).unwrap()
    }

    #[test]
    fn increment_wraps() {
        assert_eq!(frame(2).increment(1), frame(0));
        assert_eq!(frame(0).increment(-1), frame(2));
        assert_eq!(frame(1).increment(-5), frame(2));
        assert_eq!(frame(1).increment(300), frame(1));
    }

    #[test]
    fn increment_composes() {
        for f in 0..3 {
            for a in -7..=7 {
                for b in -7..=7 {
                    assert_eq!(
                        frame(f).increment(a).increment(b),
                        frame(f).increment(a + b),
                        "frame {f}, a {a}, b {b}"
                    );
                }
            }
        }
    }

    #[test]
    fn steps_to_is_bounded() {
        for from in 0..3 {
            for to in 0..3 {
                let steps = frame(from).steps_to(frame(to));
                assert!(steps <= 2);
                assert_eq!(frame(from).increment(i64::from(steps)), frame(to));
            }
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Frame::try_from(3).is_err());
        assert!(Frame::try_from(-1).is_err());
    }
}
