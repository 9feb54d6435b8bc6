//! Board application: the tasks the scheduler runs on the adapter board
//!
//! Task callbacks take no arguments, so the peripherals they drive and the
//! scheduler they report on live in `BOARD`. A task moves the board out for
//! the duration of its work, which keeps the critical section short while it
//! talks to slow hardware.

use core::cell::RefCell;
use core::convert::Infallible;

use avr_device::atmega2560::{PORTB, USART3};
use critical_section::Mutex;
use ufmt::uwriteln;

use bsb_adapter_firmware::config::*;
use bsb_adapter_firmware::drivers::{Heartbeat, Polarity, SerialConsole};
use bsb_adapter_firmware::hal::{board::StatusLed, Usart3};
use bsb_adapter_firmware::{Error, Scheduler, TaskEntry};

pub struct Board {
    led: Heartbeat<StatusLed>,
    console: SerialConsole<Usart3>,
    scheduler: &'static Scheduler,
    uart_counter: u8,
}

static BOARD: Mutex<RefCell<Option<Board>>> = Mutex::new(RefCell::new(None));

fn with_board(f: impl FnOnce(&mut Board)) {
    let Some(mut board) = critical_section::with(|cs| BOARD.borrow(cs).take()) else {
        return;
    };
    f(&mut board);
    critical_section::with(|cs| BOARD.borrow(cs).replace(Some(board)));
}

fn infallible<T>(result: Result<T, Infallible>) -> T {
    result.unwrap_or_else(|never| match never {})
}

/// Bring up the LED and console and print the greeting
pub fn init(portb: PORTB, usart: USART3, scheduler: &'static Scheduler) {
    let led = infallible(Heartbeat::new(
        StatusLed::into_output(&portb),
        Polarity::ActiveLow,
        HEARTBEAT_STEPS,
    ));
    let mut console = SerialConsole::new(Usart3::new(usart));
    console.write_line("BSB adapter board says hello").ok();

    critical_section::with(|cs| {
        BOARD.borrow(cs).replace(Some(Board {
            led,
            console,
            scheduler,
            uart_counter: 0,
        }));
    });
}

/// Register the board tasks. Failures are reported on the console and
/// otherwise ignored.
pub fn install(scheduler: &Scheduler) {
    report(&HEARTBEAT, scheduler.add_task(&HEARTBEAT, HEARTBEAT_PRIORITY, HEARTBEAT_PERIOD_TICKS));
    report(&UART, scheduler.add_task(&UART, UART_TASK_PRIORITY, UART_TASK_PERIOD_TICKS));
    report(&BANNER, scheduler.set_timeout(&BANNER, BANNER_DELAY_TICKS));

    #[cfg(feature = "debug")]
    report(&MONITOR, scheduler.add_task(&MONITOR, MONITOR_PRIORITY, MONITOR_PERIOD_TICKS));
}

fn report(task: &TaskEntry, result: Result<usize, Error>) {
    if let Err(err) = result {
        with_board(|board| {
            uwriteln!(board.console, "[ERR] {}: {}\r", task.name(), err).ok();
        });
    }
}

static HEARTBEAT: TaskEntry = TaskEntry::new("heartbeat", heartbeat_task);
static UART: TaskEntry = TaskEntry::new("uart", uart_task);
static BANNER: TaskEntry = TaskEntry::new("banner", banner_task);
#[cfg(feature = "debug")]
static MONITOR: TaskEntry = TaskEntry::new("monitor", monitor_task);

fn heartbeat_task() {
    with_board(|board| infallible(board.led.step()));
}

fn uart_task() {
    with_board(|board| {
        board.uart_counter = board.uart_counter.wrapping_add(1);
        uwriteln!(board.console, " | uartCounter = {}\r", board.uart_counter).ok();
    });
}

fn banner_task() {
    with_board(|board| {
        let now = board.scheduler.now();
        uwriteln!(board.console, "Scheduler running, tick {}\r", now).ok();
    });
}

#[cfg(feature = "debug")]
fn monitor_task() {
    use bsb_adapter_firmware::diagnostics::TaskMonitor;

    with_board(|board| {
        TaskMonitor::report(board.scheduler, &mut board.console).ok();
    });
}
