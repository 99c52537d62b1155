//! The transport between the driver and the panel: the SPI link, the D/C and chip-select framing,
//! the reset and busy lines, and a millisecond delay.

use crate::error::Error;

/// The capabilities the panel controller needs from its bus.
///
/// Control bytes and bulk data are framed differently on this panel: every byte sent through
/// `send_command` or `send_data` gets its own chip-select pulse, while `send_data_burst` and
/// `send_data_fill` hold chip-select low for the whole sequence.
pub trait DisplayInterface {
    /// Send one command byte, with D/C low, in its own chip-select frame.
    fn send_command(&mut self, cmd: u8) -> Result<(), Error>;
    /// Send one data byte, with D/C high, in its own chip-select frame.
    fn send_data(&mut self, byte: u8) -> Result<(), Error>;
    /// Send a run of data bytes inside a single chip-select frame.
    fn send_data_burst(&mut self, buf: &[u8]) -> Result<(), Error>;
    /// Send `value` repeated `count` times inside a single chip-select frame.
    fn send_data_fill(&mut self, value: u8, count: usize) -> Result<(), Error>;
    /// Drive the reset line.
    fn set_reset(&mut self, high: bool) -> Result<(), Error>;
    /// Sample the busy line. The panel holds it high while an internal operation runs.
    fn is_busy(&mut self) -> Result<bool, Error>;
    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

pub mod spi {
    //! The SPI interface supports the "4-wire" mode of the panel, with 8-bit words on the bus and
    //! a separate D/C GPIO. Chip-select is driven by the driver rather than by an `SpiDevice`,
    //! because the panel expects control bytes to be framed one at a time.

    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{InputPin, OutputPin};
    use embedded_hal::spi::SpiBus;

    use super::DisplayInterface;
    use crate::error::Error;

    /// Fill writes are staged through a buffer of this many bytes.
    const FILL_CHUNK: usize = 32;

    pub struct SpiInterface<SPI, CS, DC, RST, BUSY, D> {
        /// The SPI master connected to the panel. Only MOSI and SCK are used.
        spi: SPI,
        /// Chip-select output, active low.
        cs: CS,
        /// Data/command select output: low for commands, high for data.
        dc: DC,
        /// Reset output, active low.
        rst: RST,
        /// Busy input, high while the panel is working.
        busy: BUSY,
        delay: D,
    }

    impl<SPI, CS, DC, RST, BUSY, D> SpiInterface<SPI, CS, DC, RST, BUSY, D>
    where
        SPI: SpiBus<u8>,
        CS: OutputPin,
        DC: OutputPin,
        RST: OutputPin,
        BUSY: InputPin,
        D: DelayNs,
    {
        /// Create a new SPI interface. The bus is expected to be configured already (mode 0,
        /// MSB first, 4 MHz on the reference board).
        pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST, busy: BUSY, delay: D) -> Self {
            Self {
                spi,
                cs,
                dc,
                rst,
                busy,
                delay,
            }
        }

        /// Give back the bus, the pins and the delay.
        pub fn release(self) -> (SPI, CS, DC, RST, BUSY, D) {
            (self.spi, self.cs, self.dc, self.rst, self.busy, self.delay)
        }

        /// Run `f` with chip-select asserted, releasing it afterwards even if the write failed.
        fn framed<F>(&mut self, data: bool, f: F) -> Result<(), Error>
        where
            F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
        {
            if data {
                self.dc.set_high().map_err(Error::pin)?;
            } else {
                self.dc.set_low().map_err(Error::pin)?;
            }
            self.cs.set_low().map_err(Error::pin)?;
            let written = f(&mut self.spi).and_then(|_| self.spi.flush());
            self.cs.set_high().map_err(Error::pin)?;
            written.map_err(Error::spi)
        }
    }

    impl<SPI, CS, DC, RST, BUSY, D> DisplayInterface for SpiInterface<SPI, CS, DC, RST, BUSY, D>
    where
        SPI: SpiBus<u8>,
        CS: OutputPin,
        DC: OutputPin,
        RST: OutputPin,
        BUSY: InputPin,
        D: DelayNs,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), Error> {
            self.framed(false, |spi| spi.write(&[cmd]))
        }

        fn send_data(&mut self, byte: u8) -> Result<(), Error> {
            self.framed(true, |spi| spi.write(&[byte]))
        }

        fn send_data_burst(&mut self, buf: &[u8]) -> Result<(), Error> {
            self.framed(true, |spi| spi.write(buf))
        }

        fn send_data_fill(&mut self, value: u8, count: usize) -> Result<(), Error> {
            let chunk = [value; FILL_CHUNK];
            self.framed(true, |spi| {
                let mut remaining = count;
                while remaining > 0 {
                    let n = remaining.min(FILL_CHUNK);
                    spi.write(&chunk[..n])?;
                    remaining -= n;
                }
                Ok(())
            })
        }

        fn set_reset(&mut self, high: bool) -> Result<(), Error> {
            if high {
                self.rst.set_high().map_err(Error::pin)
            } else {
                self.rst.set_low().map_err(Error::pin)
            }
        }

        fn is_busy(&mut self) -> Result<bool, Error> {
            self.busy.is_high().map_err(Error::pin)
        }

        fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms);
        }
    }
}
