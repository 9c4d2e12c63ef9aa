/*!
 * Simulation Clocks
 *
 * Substitutable time source for workers and the dispatch loop. Workers pace
 * every executed chunk through `sleep_ms`; the engine timestamps samples with
 * `now_ms`.
 */

use super::types::Millis;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Time source shared by an engine and its workers
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since the clock was created
    fn now_ms(&self) -> Millis;

    /// Let `ms` milliseconds pass
    fn sleep_ms(&self, ms: Millis);
}

/// Wall-clock time with real sleeps, for observable runs
#[derive(Debug)]
pub struct RealClock {
    origin: Instant,
}

impl RealClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RealClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }

    fn sleep_ms(&self, ms: Millis) {
        if ms > 0 {
            std::thread::sleep(Duration::from_millis(ms));
        }
    }
}

/// Virtual time: sleeping advances a counter instantly
///
/// Runs driven by a virtual clock are deterministic and finish as fast as the
/// dispatch loop can go.
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: AtomicU64,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at a given instant
    pub fn starting_at(ms: Millis) -> Self {
        Self {
            now: AtomicU64::new(ms),
        }
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep_ms(&self, ms: Millis) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_virtual_clock_advances_on_sleep() {
        let clock = VirtualClock::new();
        assert_eq!(clock.now_ms(), 0);
        clock.sleep_ms(15);
        clock.sleep_ms(0);
        clock.sleep_ms(5);
        assert_eq!(clock.now_ms(), 20);
    }

    #[test]
    fn test_virtual_clock_offset() {
        let clock = VirtualClock::starting_at(100);
        clock.sleep_ms(1);
        assert_eq!(clock.now_ms(), 101);
    }

    #[test]
    fn test_real_clock_sleeps_at_least_requested() {
        let clock = RealClock::new();
        clock.sleep_ms(5);
        assert!(clock.now_ms() >= 5);
    }
}
