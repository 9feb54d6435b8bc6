//! 8-bit timer as the scheduler tick source
//!
//! Timer0 runs in CTC mode and raises a compare-match interrupt every tick.
//! The interrupt handler ticks whichever scheduler was attached at start-up.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

impl Prescaler {
    const RUNNING: [Prescaler; 5] = [
        Prescaler::Direct,
        Prescaler::Div8,
        Prescaler::Div64,
        Prescaler::Div256,
        Prescaler::Div1024,
    ];

    /// Clock-select bits (CSx2:0)
    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Stop => 0,
            Prescaler::Direct => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }
}

/// Output-compare value giving `tick_hz` interrupts from `cpu_hz`, or `None`
/// if it does not fit the 8-bit counter.
pub const fn compare_value(cpu_hz: u32, prescaler: Prescaler, tick_hz: u32) -> Option<u8> {
    let divisor = prescaler.divisor();
    if divisor == 0 || tick_hz == 0 {
        return None;
    }
    let counts = cpu_hz / divisor / tick_hz;
    if counts == 0 || counts > 256 {
        None
    } else {
        Some((counts - 1) as u8)
    }
}

/// Finest prescaler that reaches `tick_hz`, with its compare value
pub const fn select_prescaler(cpu_hz: u32, tick_hz: u32) -> Option<(Prescaler, u8)> {
    let mut i = 0;
    while i < Prescaler::RUNNING.len() {
        let prescaler = Prescaler::RUNNING[i];
        if let Some(ocr) = compare_value(cpu_hz, prescaler, tick_hz) {
            return Some((prescaler, ocr));
        }
        i += 1;
    }
    None
}

#[cfg(target_arch = "avr")]
pub use self::avr::TickSource;

#[cfg(target_arch = "avr")]
mod avr {
    use core::cell::Cell;

    use avr_device::atmega2560::TC0;
    use critical_section::Mutex;

    use super::{select_prescaler, Prescaler};
    use crate::config::{CPU_FREQ_HZ, TICK_HZ};
    use crate::rtos::Scheduler;

    const WGM01: u8 = 1 << 1;
    const OCIE0A: u8 = 1 << 1;

    // 16 MHz / 64 / 1000 - 1 = 249
    const TIMING: (Prescaler, u8) = match select_prescaler(CPU_FREQ_HZ, TICK_HZ) {
        Some(timing) => timing,
        None => panic!("tick rate out of range for Timer0"),
    };

    // Registration point for the compare-match handler
    static TICK_SINK: Mutex<Cell<Option<&'static Scheduler>>> = Mutex::new(Cell::new(None));

    /// Owns Timer0 for as long as it drives the scheduler
    pub struct TickSource {
        _timer: TC0,
    }

    impl TickSource {
        /// Program Timer0 for one compare match per tick and route the
        /// interrupt to `scheduler`. Global interrupts stay as they are.
        pub fn start(timer: TC0, scheduler: &'static Scheduler) -> Self {
            critical_section::with(|cs| TICK_SINK.borrow(cs).set(Some(scheduler)));

            let (prescaler, ocr) = TIMING;

            unsafe {
                timer.tccr0a.write(|w| w.bits(WGM01));
                timer.tcnt0.write(|w| w.bits(0));
                timer.ocr0a.write(|w| w.bits(ocr));
                timer.tccr0b.write(|w| w.bits(prescaler.bits()));
                timer.timsk0.modify(|r, w| w.bits(r.bits() | OCIE0A));
            }

            Self { _timer: timer }
        }
    }

    #[avr_device::interrupt(atmega2560)]
    fn TIMER0_COMPA() {
        if let Some(scheduler) = critical_section::with(|cs| TICK_SINK.borrow(cs).get()) {
            scheduler.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CPU_FREQ_HZ, TICK_HZ};

    #[test]
    fn one_millisecond_at_16mhz() {
        assert_eq!(compare_value(CPU_FREQ_HZ, Prescaler::Div64, TICK_HZ), Some(249));
        assert_eq!(select_prescaler(CPU_FREQ_HZ, TICK_HZ), Some((Prescaler::Div64, 249)));
    }

    #[test]
    fn rejects_counts_beyond_eight_bits() {
        assert_eq!(compare_value(CPU_FREQ_HZ, Prescaler::Div8, TICK_HZ), None);
        assert_eq!(compare_value(CPU_FREQ_HZ, Prescaler::Stop, TICK_HZ), None);
        assert_eq!(select_prescaler(CPU_FREQ_HZ, 1), None);
    }

    #[test]
    fn picks_finest_prescaler() {
        assert_eq!(select_prescaler(8_000_000, 1_000), Some((Prescaler::Div64, 124)));
        assert_eq!(select_prescaler(1_000_000, 10_000), Some((Prescaler::Direct, 99)));
    }
}
