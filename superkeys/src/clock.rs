//! Millisecond time source.
//!
//! Super keys only need whole milliseconds and compare timestamps with wrapping
//! arithmetic, so a 16-bit counter is enough.

use embassy_time::Instant;

/// A monotonic millisecond clock.
///
/// Implementations should return the time captured at the start of the current
/// scan cycle, so every decision made in one cycle sees the same timestamp.
pub trait Clock {
    fn now(&self) -> u16;
}

/// Clock backed by the embassy time driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&self) -> u16 {
        // Truncation is intended, timestamps wrap
        Instant::now().as_millis() as u16
    }
}

impl<C: Clock> Clock for &C {
    fn now(&self) -> u16 {
        (**self).now()
    }
}

/// Returns true if strictly more than `ttl` ms passed between `start` and `now`.
///
/// Safe across the 16-bit wrap as long as the real elapsed time is below 65536 ms.
pub const fn has_elapsed(start: u16, now: u16, ttl: u16) -> bool {
    now.wrapping_sub(start) > ttl
}
