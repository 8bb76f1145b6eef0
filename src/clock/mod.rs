use std::sync::atomic::{AtomicU64, Ordering};

/// Source of "now", in seconds as `f64`.
///
/// Axes never advance on their own; every position is a function of the
/// time read from a clock at query time.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-clock time, seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            bits: AtomicU64::new(start.to_bits()),
        }
    }

    pub fn set(&self, now: f64) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: f64) {
        let _ = self
            .bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + seconds).to_bits())
            });
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_set_and_advance() {
        let clock = ManualClock::new(1.5);
        assert_eq!(clock.now(), 1.5);

        clock.advance(2.0);
        assert_eq!(clock.now(), 3.5);

        clock.set(10.0);
        assert_eq!(clock.now(), 10.0);
    }

    #[test]
    fn test_system_clock_is_non_decreasing() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(first > 0.0);
        assert!(second >= first);
    }
}
