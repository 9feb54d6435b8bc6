use avr_device::atmega2560::PORTB;
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

/// Output pin `P` of port B
pub struct PortBPin<const P: u8> {
    _port: PhantomData<PORTB>,
}

impl<const P: u8> PortBPin<P> {
    /// Configure the pin as an output, driven low
    pub fn into_output(port: &PORTB) -> Self {
        unsafe {
            port.portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
            port.ddrb.modify(|r, w| w.bits(r.bits() | (1 << P)));
        }
        Self { _port: PhantomData }
    }

    #[inline]
    fn port(&self) -> &avr_device::atmega2560::portb::RegisterBlock {
        unsafe { &*PORTB::ptr() }
    }
}

impl<const P: u8> OutputPin for PortBPin<P> {
    type Error = Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        critical_section::with(|_| unsafe {
            self.port().portb.modify(|r, w| w.bits(r.bits() | (1 << P)));
        });
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        critical_section::with(|_| unsafe {
            self.port().portb.modify(|r, w| w.bits(r.bits() & !(1 << P)));
        });
        Ok(())
    }
}

// BSB adapter board pin definitions
pub mod board {
    use super::PortBPin;

    /// Status LED on PB7, lit when driven low
    pub type StatusLed = PortBPin<7>;
}
