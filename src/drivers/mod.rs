pub mod blink;
pub mod serial_console;

pub use blink::{Blink, Heartbeat, Polarity};
pub use serial_console::SerialConsole;
