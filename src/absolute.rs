//! Absolute angle sensor on a pipelined serial link

use embedded_hal::delay::DelayNs;

use crate::{
    error::{ConfigError, Error},
    fault::{Fault, FaultSink},
    link::{LinkConfig, SensorLink},
    utils,
};

/// Read angle command (MagAlpha: all zero bits)
pub const ANGLE_COMMAND: u16 = 0x0000;

/// Sensor power-up time before the first trusted sample
pub const STARTUP_DELAY_US: u32 = 16_000;

const FRAME_BITS: u8 = 16;

/// How long [`AbsoluteEncoder::read_position`] spins on `data_ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadyWait {
    /// Spin until the sensor answers
    #[default]
    Unbounded,
    /// Give up with [`Error::NotReady`] after this many polls
    Polls(u32),
}

/// Absolute encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteConfig {
    /// Serial link settings
    pub link: LinkConfig,
    /// Command word requesting the next angle
    pub angle_command: u16,
    /// Delay between link configuration and the first sample
    pub startup_delay_us: u32,
    /// Low frame bits dropped to form the position
    pub frame_shift: u8,
    /// Largest accepted change between consecutive samples, in ticks
    pub max_allowed_delta: u16,
    /// Receive wait policy
    pub ready_wait: ReadyWait,
}

impl Default for AbsoluteConfig {
    fn default() -> Self {
        let frame_shift = 3;
        Self {
            link: LinkConfig::default(),
            angle_command: ANGLE_COMMAND,
            startup_delay_us: STARTUP_DELAY_US,
            frame_shift,
            max_allowed_delta: default_max_delta(frame_shift),
            ready_wait: ReadyWait::Unbounded,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn default_max_delta(frame_shift: u8) -> u16 {
    (revolution_ticks(frame_shift) / 6) as u16
}

/// A shift of the whole frame or more leaves a single tick
const fn revolution_ticks(frame_shift: u8) -> u32 {
    1u32 << FRAME_BITS.saturating_sub(frame_shift)
}

impl AbsoluteConfig {
    /// Set the dropped low frame bits
    ///
    /// Also resets the stability tolerance to one sixth of the new
    /// revolution. Call [`Self::with_max_allowed_delta`] afterwards to
    /// override it.
    #[must_use]
    pub const fn with_frame_shift(mut self, frame_shift: u8) -> Self {
        self.frame_shift = frame_shift;
        self.max_allowed_delta = default_max_delta(frame_shift);
        self
    }

    /// Set the stability tolerance
    #[must_use]
    pub const fn with_max_allowed_delta(mut self, max_allowed_delta: u16) -> Self {
        self.max_allowed_delta = max_allowed_delta;
        self
    }

    /// Set the receive wait policy
    #[must_use]
    pub const fn with_ready_wait(mut self, ready_wait: ReadyWait) -> Self {
        self.ready_wait = ready_wait;
        self
    }

    /// Ticks in one revolution for this frame layout
    ///
    /// Out-of-range shifts report a single tick; [`Self::validate`] rejects
    /// them.
    #[must_use]
    pub const fn ticks_per_rev(&self) -> u32 {
        revolution_ticks(self.frame_shift)
    }

    /// Check the settings for consistency
    ///
    /// # Errors
    ///
    /// Returns an error if the frame shift leaves no position bits or the
    /// tolerance spans half a revolution or more
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_shift >= FRAME_BITS {
            return Err(ConfigError::FrameShiftOutOfRange);
        }
        if u32::from(self.max_allowed_delta) >= self.ticks_per_rev() / 2 {
            return Err(ConfigError::DeltaExceedsHalfRevolution);
        }
        Ok(())
    }
}

/// Persistent state of the absolute encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderState {
    position: i16,
}

impl EncoderState {
    /// Last adopted position
    #[must_use]
    pub const fn position(&self) -> i16 {
        self.position
    }

    /// Adopt `position` and report whether it is a plausible continuation
    /// of the previous one
    ///
    /// The sample is adopted either way
    pub fn adopt(&mut self, position: i16, ticks_per_rev: u32, max_allowed_delta: u16) -> bool {
        let delta = i32::from(self.position) - i32::from(position);
        self.position = position;
        !utils::exceeds_circular_tolerance(delta, ticks_per_rev, max_allowed_delta)
    }
}

/// Absolute encoder instance
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AbsoluteEncoder<L> {
    link: L,
    config: AbsoluteConfig,
    state: EncoderState,
}

impl<L, E> AbsoluteEncoder<L>
where
    L: SensorLink<Error = E>,
{
    /// Create a new absolute encoder instance
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is inconsistent
    pub fn new(link: L, config: AbsoluteConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            link,
            config,
            state: EncoderState::default(),
        })
    }

    /// Release the serial link, consuming the encoder
    pub fn release(self) -> L {
        self.link
    }

    /// Active settings
    pub fn config(&self) -> &AbsoluteConfig {
        &self.config
    }

    /// Ticks in one revolution
    pub fn ticks_per_rev(&self) -> u32 {
        self.config.ticks_per_rev()
    }

    /// Last adopted position
    pub fn position(&self) -> i16 {
        self.state.position()
    }

    /// Bring up the link and seed the position
    ///
    /// - Configure the serial link
    /// - Wait for the sensor start-up time
    /// - Request an angle and adopt it without a stability check
    ///
    /// # Errors
    ///
    /// Returns an error if link communication fails or no frame arrives
    /// within the configured wait
    pub fn initialize(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        self.link
            .configure(&self.config.link)
            .map_err(Error::Communication)?;

        delay.delay_us(self.config.startup_delay_us);

        self.request_next_sample()?;
        let position = self.sample()?;
        self.state.position = position;

        #[cfg(feature = "defmt")]
        defmt::debug!("Absolute encoder seeded at {}", position);

        Ok(())
    }

    /// Send the angle command
    ///
    /// The answer is available to the next [`Self::read_position`], one
    /// cycle later
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails
    #[inline]
    pub fn request_next_sample(&mut self) -> Result<(), Error<E>> {
        self.link
            .write(self.config.angle_command)
            .map_err(Error::Communication)
    }

    /// Wait for the pending frame and adopt it as the new position
    ///
    /// With `check_stability`, a sample that is not a plausible
    /// continuation of the previous one raises
    /// [`Fault::EncoderReadingUnstable`] on `faults`. The sample is adopted
    /// regardless.
    ///
    /// # Errors
    ///
    /// Returns an error if link communication fails or no frame arrives
    /// within the configured wait
    #[inline]
    pub fn read_position(
        &mut self,
        check_stability: bool,
        faults: &mut impl FaultSink,
    ) -> Result<i16, Error<E>> {
        let position = self.sample()?;
        let stable = self.state.adopt(
            position,
            self.config.ticks_per_rev(),
            self.config.max_allowed_delta,
        );

        if check_stability && !stable {
            faults.raise(Fault::EncoderReadingUnstable);
        }

        Ok(position)
    }

    fn sample(&mut self) -> Result<i16, Error<E>> {
        self.wait_ready()?;
        let frame = self.link.read_frame().map_err(Error::Communication)?;
        Ok(frame_to_position(frame, self.config.frame_shift))
    }

    fn wait_ready(&mut self) -> Result<(), Error<E>> {
        match self.config.ready_wait {
            ReadyWait::Unbounded => {
                while !self.link.data_ready().map_err(Error::Communication)? {}
                Ok(())
            }
            ReadyWait::Polls(limit) => {
                for _ in 0..limit {
                    if self.link.data_ready().map_err(Error::Communication)? {
                        return Ok(());
                    }
                }

                #[cfg(feature = "defmt")]
                defmt::warn!("No frame from absolute encoder after {} polls", limit);

                Err(Error::NotReady)
            }
        }
    }
}

/// Signed position carried in the high bits of a sensor frame
///
/// Shifts past the last frame bit saturate to the sign of the frame.
#[allow(clippy::cast_possible_wrap)]
#[must_use]
pub fn frame_to_position(frame: u16, frame_shift: u8) -> i16 {
    (frame as i16) >> frame_shift.min(FRAME_BITS - 1)
}
