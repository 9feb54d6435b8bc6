//! Polled USART transmitter for the console

/// UBRR divisor for normal-speed asynchronous mode, rounded to nearest
pub const fn ubrr_for(cpu_hz: u32, baud: u32) -> u16 {
    let divisor = 16 * baud;
    ((cpu_hz + divisor / 2) / divisor - 1) as u16
}

const TXC: u8 = 1 << 6;
const U2X: u8 = 1 << 1;
const MPCM: u8 = 1 << 0;

/// UCSRnA value that clears TXC and keeps the configuration bits.
///
/// FE, DOR and UPE must be written as zero, and UDRE and RXC are read-only.
pub const fn clear_tx_complete(status: u8) -> u8 {
    (status & (U2X | MPCM)) | TXC
}

#[cfg(target_arch = "avr")]
pub use self::avr::Usart3;

#[cfg(target_arch = "avr")]
mod avr {
    use core::convert::Infallible;

    use avr_device::atmega2560::USART3;
    use embedded_hal::serial;

    use super::{clear_tx_complete, ubrr_for, TXC};
    use crate::config::{CPU_FREQ_HZ, UART_BAUD};

    const UDRE: u8 = 1 << 5;
    const TXEN: u8 = 1 << 3;
    const RXEN: u8 = 1 << 4;
    // 8 data bits, no parity, 1 stop bit
    const UCSZ_8N1: u8 = (1 << 2) | (1 << 1);

    pub struct Usart3 {
        usart: USART3,
    }

    impl Usart3 {
        pub fn new(usart: USART3) -> Self {
            unsafe {
                usart.ubrr3.write(|w| w.bits(ubrr_for(CPU_FREQ_HZ, UART_BAUD)));
                usart.ucsr3a.write(|w| w.bits(0));
                usart.ucsr3c.write(|w| w.bits(UCSZ_8N1));
                usart.ucsr3b.write(|w| w.bits(TXEN | RXEN));
            }
            Self { usart }
        }
    }

    impl serial::Write<u8> for Usart3 {
        type Error = Infallible;

        fn write(&mut self, word: u8) -> nb::Result<(), Infallible> {
            if self.usart.ucsr3a.read().bits() & UDRE == 0 {
                return Err(nb::Error::WouldBlock);
            }
            // writing TXC clears it, so flush tracks this byte
            unsafe {
                self.usart
                    .ucsr3a
                    .modify(|r, w| w.bits(clear_tx_complete(r.bits())));
                self.usart.udr3.write(|w| w.bits(word));
            }
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Infallible> {
            let status = self.usart.ucsr3a.read().bits();
            if status & UDRE != 0 && status & TXC != 0 {
                Ok(())
            } else {
                Err(nb::Error::WouldBlock)
            }
        }
    }
}
