//! Monotonic time source
//!
//! Deadlines and refresh cadences are computed from an injected clock so the
//! timing contract can be exercised without real hardware.

/// Monotonic microsecond clock
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed epoch (usually boot)
    fn now_us(&self) -> u64;

    /// Milliseconds since the same epoch
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}
