//! Time structures.
//!
//! - [`Instant`] is a point in time, as given by the caller.
//! - [`Duration`] is a span of time.
//!
//! Both count microseconds. The stack never reads a clock itself.

use crate::mac::constants::SYMBOL_PERIOD_US;

/// A point in time, in microseconds since an arbitrary epoch.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant {
    us: i64,
}

impl Instant {
    /// Create a new `Instant` from microseconds since the epoch.
    pub const fn from_us(us: i64) -> Self {
        Self { us }
    }

    /// Returns the point in time as microseconds since the epoch.
    pub const fn as_us(&self) -> i64 {
        self.us
    }

    /// Returns the time elapsed between `earlier` and `self`, zero when
    /// `earlier` is later.
    pub fn saturating_duration_since(&self, earlier: Instant) -> Duration {
        Duration::from_us(self.us.saturating_sub(earlier.us).max(0))
    }
}

/// A span of time in microseconds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Self = Self(0);

    /// Create a new `Duration` from microseconds.
    pub const fn from_us(us: i64) -> Self {
        Self(us)
    }

    /// Create a new `Duration` from a number of PHY symbol periods.
    pub const fn from_symbols(symbols: u32) -> Self {
        Self(symbols as i64 * SYMBOL_PERIOD_US as i64)
    }

    /// Returns the duration as microseconds.
    pub const fn as_us(&self) -> i64 {
        self.0
    }
}

impl core::ops::Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Self::Output {
        Duration::from_us(self.us - rhs.us)
    }
}

impl core::ops::Add<Duration> for Instant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::from_us(self.us + rhs.as_us())
    }
}

impl core::ops::Sub<Duration> for Instant {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self::from_us(self.us - rhs.as_us())
    }
}

impl core::ops::Mul<u32> for Duration {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self::from_us(self.as_us() * rhs as i64)
    }
}

impl core::ops::Add for Duration {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::from_us(self.as_us() + rhs.as_us())
    }
}

impl core::fmt::Display for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}ms", self.as_us() as f32 / 1000.0)
    }
}

impl core::fmt::Display for Duration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}ms", self.as_us() as f32 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_operations() {
        let a = Instant::from_us(100);
        let b = Instant::from_us(50);
        assert_eq!(a - b, Duration::from_us(50));
        assert_eq!((a - Duration::from_us(50)).as_us(), 50);
        assert_eq!((a + Duration::from_us(50)).as_us(), 150);
    }

    #[test]
    fn elapsed_never_negative() {
        let a = Instant::from_us(100);
        let b = Instant::from_us(250);
        assert_eq!(b.saturating_duration_since(a), Duration::from_us(150));
        assert_eq!(a.saturating_duration_since(b), Duration::ZERO);
    }

    #[test]
    fn symbols() {
        assert_eq!(Duration::from_symbols(1), Duration::from_us(16));
        assert_eq!(Duration::from_symbols(960).as_us(), 15_360);
        assert_eq!((Duration::from_symbols(20) * 3).as_us(), 960);
    }

    #[test]
    fn formatting() {
        let a = Instant::from_us(100);
        let b = Duration::from_us(1500);
        assert_eq!(format!("{}", a), "0.10ms");
        assert_eq!(format!("{}", b), "1.50ms");
    }
}
