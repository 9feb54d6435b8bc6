//! Polling delays built on the scheduler tick counter
//!
//! These run inside task callbacks and need no table slot. All arithmetic is
//! wrapping, so a counter rollover between two samples is harmless as long as
//! the real interval is shorter than 2^32 ticks.

/// Ticks from `earlier` to `now`, across counter wrap
#[inline]
pub const fn ticks_between(earlier: u32, now: u32) -> u32 {
    now.wrapping_sub(earlier)
}

/// True once at least `ticks` have passed since `last_tick`.
///
/// Does not touch any state: the caller decides when to restart the interval.
#[inline]
pub const fn elapsed_since(now: u32, last_tick: u32, ticks: u32) -> bool {
    ticks_between(last_tick, now) >= ticks
}

/// Fixed-phase periodic wake-up.
///
/// On a due result `last_wake` moves forward by exactly `period`, not to
/// `now`, so dispatch jitter does not accumulate into drift.
#[inline]
pub fn periodic_due(now: u32, last_wake: &mut u32, period: u32) -> bool {
    if elapsed_since(now, *last_wake, period) {
        *last_wake = last_wake.wrapping_add(period);
        true
    } else {
        false
    }
}

/// Relative delay that restarts from the moment it fires
#[derive(Debug, Default, Clone, Copy)]
pub struct Delay {
    last_tick: u32,
}

impl Delay {
    pub const fn new(start: u32) -> Self {
        Self { last_tick: start }
    }

    pub fn poll(&mut self, now: u32, ticks: u32) -> bool {
        if elapsed_since(now, self.last_tick, ticks) {
            self.last_tick = now;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self, now: u32) {
        self.last_tick = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_respects_threshold() {
        assert!(!elapsed_since(109, 10, 100));
        assert!(elapsed_since(110, 10, 100));
        assert!(elapsed_since(500, 10, 100));
    }

    #[test]
    fn elapsed_survives_counter_wrap() {
        let last = u32::MAX - 5;
        assert!(!elapsed_since(3, last, 10));
        assert!(elapsed_since(4, last, 10));
        assert_eq!(ticks_between(last, 4), 10);
    }

    #[test]
    fn periodic_keeps_phase_under_jitter() {
        let mut wake = 0;
        assert!(!periodic_due(99, &mut wake, 100));
        // polled late
        assert!(periodic_due(103, &mut wake, 100));
        assert_eq!(wake, 100);
        assert!(!periodic_due(199, &mut wake, 100));
        assert!(periodic_due(200, &mut wake, 100));
        assert_eq!(wake, 200);
    }

    #[test]
    fn periodic_catches_up_one_period_per_call() {
        let mut wake = 0;
        assert!(periodic_due(350, &mut wake, 100));
        assert!(periodic_due(350, &mut wake, 100));
        assert!(periodic_due(350, &mut wake, 100));
        assert!(!periodic_due(350, &mut wake, 100));
        assert_eq!(wake, 300);
    }

    #[test]
    fn periodic_across_wrap() {
        let mut wake = u32::MAX - 49;
        assert!(periodic_due(50, &mut wake, 100));
        assert_eq!(wake, 50);
    }

    #[test]
    fn delay_restarts_from_fire_time() {
        let mut delay = Delay::new(0);
        assert!(!delay.poll(40, 50));
        assert!(delay.poll(57, 50));
        assert!(!delay.poll(100, 50));
        assert!(delay.poll(107, 50));

        delay.restart(200);
        assert!(!delay.poll(249, 50));
    }
}
