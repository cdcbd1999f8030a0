use core::ops::{Add, AddAssign, Sub};

/// Unsigned Microseconds
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    #[inline]
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// Returns the microseconds as a u64
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// ms -> us
    #[inline]
    pub const fn from_ms(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Returns milliseconds, truncated
    #[inline]
    pub const fn as_ms(&self) -> u64 {
        self.0 / 1_000
    }

    /// Returns seconds
    #[inline]
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }

    /// Returns no time if I am less than other.
    pub const fn saturating_sub(&self, other: Self) -> UMicros {
        UMicros(self.0.saturating_sub(other.0))
    }
}

impl Add for UMicros {
    type Output = UMicros;
    fn add(self, rhs: Self) -> Self::Output {
        UMicros(self.0 + rhs.0)
    }
}

impl AddAssign for UMicros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for UMicros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        UMicros(self.0 - rhs.0)
    }
}

#[test]
fn micros_conversions() {
    let t = UMicros::from_ms(1_500);
    assert_eq!(t.us(), 1_500_000);
    assert_eq!(t.as_ms(), 1_500);
    assert_eq!(t.as_secs_f64(), 1.5);
    assert_eq!(UMicros::new(3).saturating_sub(UMicros::new(5)), UMicros::ZERO);
}
