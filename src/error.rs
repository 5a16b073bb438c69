/// Error type for encoder operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the sensor or counter peripheral
    Communication(E),
    /// The sensor did not signal a completed frame within the configured
    /// number of polls
    NotReady,
    /// Rejected configuration
    Config(ConfigError),
}

/// Error type for [`SpiLink`](crate::SpiLink)
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError<E> {
    /// Underlying SPI transfer failed
    Spi(E),
    /// A frame was read while none was latched
    NoFrame,
    /// The SPI device was built with a different mode or clock than the
    /// sensor requires
    ModeMismatch,
}

/// Rejected encoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frame shift leaves fewer than one position bit
    FrameShiftOutOfRange,
    /// Output resolution of zero ticks per revolution
    ZeroTicksPerRev,
    /// Stability tolerance of half a revolution or more accepts every sample
    DeltaExceedsHalfRevolution,
}
