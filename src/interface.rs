use crate::{
    config::Config,
    error::ErrorKind,
    traits::{Command, PanelInterface},
};
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};
use log::{error, trace, warn};

/// The Connection Interface of the panel
///
/// Owns the SPI device (which handles chip select), the three control lines and the
/// delay provider. Nothing else touches the physical lines.
pub struct DisplayInterface<SPI, BUSY, DC, RST, DELAY> {
    /// SPI
    spi: SPI,
    /// High for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// The concrete Delay implementation
    delay: DELAY,
    /// Busy handshake timing
    config: Config,
}

impl<SPI, BUSY, DC, RST, DELAY> DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// The SPI device should run in [`SPI_MODE`](crate::SPI_MODE), 4MHz is known to work.
    pub fn new(spi: SPI, busy: BUSY, dc: DC, rst: RST, delay: DELAY, config: Config) -> Self {
        DisplayInterface {
            spi,
            busy,
            dc,
            rst,
            delay,
            config,
        }
    }

    /// Gives the SPI device and the pins back
    pub fn release(self) -> (SPI, BUSY, DC, RST, DELAY) {
        (self.spi, self.busy, self.dc, self.rst, self.delay)
    }

    // spi write helper/abstraction function
    fn write(&mut self, data: &[u8]) {
        // one transaction per byte, chip select toggles around each of them
        if let Err(err) = self.spi.write(data) {
            warn!("spi transfer of {} byte(s) failed: {:?}", data.len(), err);
        }
    }

    /// Checks if device is still busy
    ///
    /// A busy line that can't be read counts as busy, so a broken pin ends in a timeout
    /// instead of racing the panel.
    pub fn is_busy(&mut self) -> bool {
        match self.busy.is_high() {
            Ok(busy) => busy,
            Err(err) => {
                warn!("reading busy line failed: {:?}", err);
                true
            }
        }
    }

    fn set_rst(&mut self, high: bool) {
        let res = if high {
            self.rst.set_high()
        } else {
            self.rst.set_low()
        };
        if let Err(err) = res {
            warn!("driving reset line failed: {:?}", err);
        }
    }
}

impl<SPI, BUSY, DC, RST, DELAY> PanelInterface for DisplayInterface<SPI, BUSY, DC, RST, DELAY>
where
    SPI: SpiDevice,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn send_command<T: Command>(&mut self, command: T) {
        // low for commands
        if let Err(err) = self.dc.set_low() {
            warn!("driving dc line low failed: {:?}", err);
        }

        // Transfer the command over spi
        self.write(&[command.address()]);
    }

    fn send_data(&mut self, data: u8) {
        // high for data
        if let Err(err) = self.dc.set_high() {
            warn!("driving dc line high failed: {:?}", err);
        }

        self.write(&[data]);
    }

    fn reset(&mut self) {
        self.set_rst(true);
        self.delay.delay_ms(10);
        self.set_rst(false);
        self.delay.delay_ms(2);
        self.set_rst(true);
        self.delay.delay_ms(10);
    }

    fn short_reset(&mut self) {
        self.set_rst(false);
        self.delay.delay_ms(1);
        self.set_rst(true);
        self.delay.delay_ms(2);
    }

    fn read_busy(&mut self) -> Result<(), ErrorKind> {
        let mut waited_ms: u32 = 0;
        while self.is_busy() {
            if let Some(timeout) = self.config.busy_timeout_ms {
                if waited_ms >= timeout {
                    error!("busy line still active after {}ms", waited_ms);
                    return Err(ErrorKind::PanelUnresponsive);
                }
            }
            self.delay.delay_ms(self.config.busy_poll_ms);
            waited_ms = waited_ms.saturating_add(self.config.busy_poll_ms);
        }
        trace!("panel idle after {}ms", waited_ms);
        self.delay.delay_ms(self.config.busy_settle_ms);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
