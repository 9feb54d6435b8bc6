pub mod timer;
pub mod uart;
#[cfg(target_arch = "avr")]
pub mod gpio;

// Re-export commonly used types
pub use timer::{compare_value, select_prescaler, Prescaler};
pub use uart::{clear_tx_complete, ubrr_for};

#[cfg(target_arch = "avr")]
pub use gpio::{board, PortBPin};
#[cfg(target_arch = "avr")]
pub use timer::TickSource;
#[cfg(target_arch = "avr")]
pub use uart::Usart3;
