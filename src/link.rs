//! Serial link to the absolute angle sensor

use embedded_hal::spi::{MODE_0, Mode, SpiDevice};

use crate::error::LinkError;

/// Serial interface settings required by the sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkConfig {
    /// Clock polarity and phase
    pub mode: Mode,
    /// Serial clock frequency
    pub frequency_hz: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            mode: MODE_0,
            frequency_hz: 10_000_000,
        }
    }
}

/// Synchronous serial peripheral the absolute encoder talks through
///
/// The sensor answers each command with the result of the previous one, so
/// a frame becomes available only after a [`SensorLink::write`].
pub trait SensorLink {
    /// Peripheral error
    type Error;

    /// Apply clock and transfer mode settings
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral rejects the settings
    fn configure(&mut self, config: &LinkConfig) -> Result<(), Self::Error>;

    /// Transmit one command word
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails
    fn write(&mut self, command: u16) -> Result<(), Self::Error>;

    /// Check whether the receive buffer holds a completed frame
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be read
    fn data_ready(&mut self) -> Result<bool, Self::Error>;

    /// Take the completed frame out of the receive buffer
    ///
    /// # Errors
    ///
    /// Returns an error if no frame can be read
    fn read_frame(&mut self) -> Result<u16, Self::Error>;
}

/// [`SensorLink`] over an embedded-hal SPI device
///
/// Every command is a full-duplex 16-bit big-endian transfer. The word
/// clocked in during that transfer is latched and handed out by the next
/// [`SensorLink::read_frame`].
///
/// A frame is latched only by [`SensorLink::write`]. Reading a position
/// before any request therefore never becomes ready: with
/// [`ReadyWait::Unbounded`](crate::ReadyWait::Unbounded) it spins forever,
/// with a poll limit it fails with [`Error::NotReady`](crate::Error::NotReady).
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiLink<SPI> {
    spi: SPI,
    settings: LinkConfig,
    latched: Option<u16>,
}

impl<SPI, E> SpiLink<SPI>
where
    SPI: SpiDevice<u8, Error = E>,
{
    /// Wrap an SPI device
    ///
    /// `settings` are the mode and clock the device was built with
    pub fn new(spi: SPI, settings: LinkConfig) -> Self {
        Self {
            spi,
            settings,
            latched: None,
        }
    }

    /// Mode and clock of the wrapped device
    pub fn settings(&self) -> &LinkConfig {
        &self.settings
    }

    /// Release the SPI device, consuming the link
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> SensorLink for SpiLink<SPI>
where
    SPI: SpiDevice<u8, Error = E>,
{
    type Error = LinkError<E>;

    /// The device's mode and clock are fixed when it is built, so this only
    /// checks them against the request and drops any latched frame
    fn configure(&mut self, config: &LinkConfig) -> Result<(), Self::Error> {
        if *config != self.settings {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "SPI device built with {} but sensor requires {}",
                self.settings,
                config
            );
            return Err(LinkError::ModeMismatch);
        }

        self.latched = None;
        Ok(())
    }

    fn write(&mut self, command: u16) -> Result<(), Self::Error> {
        let tx = command.to_be_bytes();
        let mut rx = [0u8; 2];
        self.spi.transfer(&mut rx, &tx).map_err(LinkError::Spi)?;

        self.latched = Some(u16::from_be_bytes(rx));
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(self.latched.is_some())
    }

    fn read_frame(&mut self) -> Result<u16, Self::Error> {
        self.latched.take().ok_or(LinkError::NoFrame)
    }
}
