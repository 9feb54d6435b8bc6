#![cfg_attr(target_arch = "avr", no_std, no_main)]

#[cfg(target_arch = "avr")]
use panic_halt as _;

#[cfg(target_arch = "avr")]
mod application;

#[cfg(target_arch = "avr")]
use bsb_adapter_firmware::{hal::TickSource, Scheduler};

// The one scheduler instance; the tick interrupt, the board tasks and the
// main loop each receive a reference to it at start-up.
#[cfg(target_arch = "avr")]
static SCHEDULER: Scheduler = Scheduler::new();

#[cfg(target_arch = "avr")]
#[avr_device::entry]
fn main() -> ! {
    let dp = avr_device::atmega2560::Peripherals::take().unwrap();

    application::init(dp.PORTB, dp.USART3, &SCHEDULER);
    application::install(&SCHEDULER);

    let _tick_source = TickSource::start(dp.TC0, &SCHEDULER);

    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    loop {
        SCHEDULER.run();
    }
}

// Host builds only need the library; the firmware image is AVR-only.
#[cfg(not(target_arch = "avr"))]
fn main() {}
