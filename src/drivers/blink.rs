//! Non-blocking LED drivers timed by the scheduler tick counter

use embedded_hal::digital::v2::OutputPin;

use crate::rtos::delay;

/// Electrical level that lights the LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

fn drive<P: OutputPin>(pin: &mut P, polarity: Polarity, lit: bool) -> Result<(), P::Error> {
    match (polarity, lit) {
        (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => pin.set_high(),
        (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => pin.set_low(),
    }
}

/// Blinker with independent on and off durations, in ticks.
///
/// Call [`Blink::update`] from the main loop or a task with the current tick
/// count; any number of blinkers can run side by side.
pub struct Blink<P> {
    pin: P,
    polarity: Polarity,
    on_ticks: u32,
    off_ticks: u32,
    last_toggle: u32,
    lit: bool,
}

impl<P: OutputPin> Blink<P> {
    /// Starts dark at tick `now`
    pub fn new(
        mut pin: P,
        polarity: Polarity,
        on_ticks: u32,
        off_ticks: u32,
        now: u32,
    ) -> Result<Self, P::Error> {
        drive(&mut pin, polarity, false)?;
        Ok(Self {
            pin,
            polarity,
            on_ticks,
            off_ticks,
            last_toggle: now,
            lit: false,
        })
    }

    /// Toggle if the current phase has run out. Returns true on a toggle.
    pub fn update(&mut self, now: u32) -> Result<bool, P::Error> {
        let phase = if self.lit { self.on_ticks } else { self.off_ticks };
        if !delay::elapsed_since(now, self.last_toggle, phase) {
            return Ok(false);
        }

        drive(&mut self.pin, self.polarity, !self.lit)?;
        self.lit = !self.lit;
        self.last_toggle = now;
        Ok(true)
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn release(self) -> P {
        self.pin
    }
}

/// Step-driven 1-of-N pattern: lit on the first step of every cycle, dark
/// for the remaining `steps - 1`.
pub struct Heartbeat<P> {
    pin: P,
    polarity: Polarity,
    steps: u8,
    step: u8,
}

impl<P: OutputPin> Heartbeat<P> {
    pub fn new(mut pin: P, polarity: Polarity, steps: u8) -> Result<Self, P::Error> {
        drive(&mut pin, polarity, false)?;
        Ok(Self {
            pin,
            polarity,
            steps: steps.max(1),
            step: 0,
        })
    }

    /// Drive the LED for the current step and move to the next one
    pub fn step(&mut self) -> Result<(), P::Error> {
        drive(&mut self.pin, self.polarity, self.step == 0)?;
        self.step = (self.step + 1) % self.steps;
        Ok(())
    }

    pub fn release(self) -> P {
        self.pin
    }
}
