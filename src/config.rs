//! Configuration constants for the BSB adapter board firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Scheduler tick rate in Hz (1 tick = 1 ms)
pub const TICK_HZ: u32 = 1_000;

/// Number of task slots in the scheduler table
pub const MAX_TASKS: usize = 8;

/// Number of priority levels, 0 is the highest
pub const MAX_PRIORITY: u8 = 10;

/// Console UART baud rate
pub const UART_BAUD: u32 = 9600;

/// LED heartbeat task
pub const HEARTBEAT_PRIORITY: u8 = 2;
pub const HEARTBEAT_PERIOD_TICKS: u16 = 150;
/// Heartbeat pattern length in steps, LED lit for one of them
pub const HEARTBEAT_STEPS: u8 = 5;

/// Serial heartbeat counter task
pub const UART_TASK_PRIORITY: u8 = 1;
pub const UART_TASK_PERIOD_TICKS: u16 = 1000;

/// Delay before the one-shot startup banner
pub const BANNER_DELAY_TICKS: u16 = 500;

/// Task monitor dump, `debug` builds only
pub const MONITOR_PRIORITY: u8 = MAX_PRIORITY - 1;
pub const MONITOR_PERIOD_TICKS: u16 = 5000;
