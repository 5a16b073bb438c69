//! Multi-turn position from a wrapping quadrature tick counter

use crate::{
    counter::{CounterConfig, CounterSource},
    error::{ConfigError, Error},
    fault::{Fault, FaultSink},
    utils,
};

/// Span of the native 16-bit counter
pub const COUNTER_RANGE: i64 = 1 << 16;

/// Quadrature encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureConfig {
    /// Counter settings applied at start-up
    pub counter: CounterConfig,
    /// Output resolution, ticks in one revolution
    pub ticks_per_rev: u32,
    /// Largest plausible counter change between two samples
    pub max_step: Option<u16>,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            counter: CounterConfig::default(),
            ticks_per_rev: 8192,
            max_step: None,
        }
    }
}

impl QuadratureConfig {
    /// Set the output resolution
    #[must_use]
    pub const fn with_ticks_per_rev(mut self, ticks_per_rev: u32) -> Self {
        self.ticks_per_rev = ticks_per_rev;
        self
    }

    /// Set the per-sample step bound
    #[must_use]
    pub const fn with_max_step(mut self, max_step: u16) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Check the settings for consistency
    ///
    /// # Errors
    ///
    /// Returns an error if the output resolution is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_rev == 0 {
            return Err(ConfigError::ZeroTicksPerRev);
        }
        Ok(())
    }
}

/// Persistent delta-tracking state of the quadrature encoder
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QepState {
    prev_raw_val: u16,
    overflows: i32,
}

impl QepState {
    /// Counter value seen by the last update
    #[must_use]
    pub const fn prev_raw_val(&self) -> u16 {
        self.prev_raw_val
    }

    /// Net counter wraps since start-up
    #[must_use]
    pub const fn overflows(&self) -> i32 {
        self.overflows
    }

    /// Unwrapped position at the last update
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn continuous_position(&self) -> i64 {
        self.prev_raw_val as i64 + self.overflows as i64 * COUNTER_RANGE
    }

    /// Take a new counter value and return the shortest signed
    /// displacement since the previous one
    #[allow(clippy::cast_possible_wrap)]
    pub fn update(&mut self, raw: u16) -> i16 {
        let diff = raw.wrapping_sub(self.prev_raw_val) as i16;

        if diff > 0 && raw < self.prev_raw_val {
            self.overflows = self.overflows.wrapping_add(1);
        } else if diff < 0 && raw > self.prev_raw_val {
            self.overflows = self.overflows.wrapping_sub(1);
        }

        self.prev_raw_val = raw;
        diff
    }
}

/// Quadrature encoder instance
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureEncoder<C> {
    counter: C,
    config: QuadratureConfig,
    state: QepState,
}

impl<C, E> QuadratureEncoder<C>
where
    C: CounterSource<Error = E>,
{
    /// Configure `counter` and start tracking from zero
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is inconsistent or the counter rejects
    /// its settings
    pub fn new(mut counter: C, config: QuadratureConfig) -> Result<Self, Error<E>> {
        config.validate().map_err(Error::Config)?;

        counter
            .configure(&config.counter)
            .map_err(Error::Communication)?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Quadrature counter configured, {} ticks per revolution",
            config.ticks_per_rev
        );

        Ok(Self {
            counter,
            config,
            state: QepState::default(),
        })
    }

    /// Release the counter, consuming the encoder
    pub fn release(self) -> C {
        self.counter
    }

    /// Active settings
    pub fn config(&self) -> &QuadratureConfig {
        &self.config
    }

    /// Output resolution
    pub fn ticks_per_rev(&self) -> u32 {
        self.config.ticks_per_rev
    }

    /// Unwrapped position at the last sample, `0` before the first one
    pub fn continuous_position(&self) -> i64 {
        self.state.continuous_position()
    }

    /// Net counter wraps since start-up
    pub fn overflows(&self) -> i32 {
        self.state.overflows()
    }

    /// Read the counter and return the position within one revolution
    ///
    /// The result lies in `[-ticks_per_rev / 2, ticks_per_rev / 2)`. A
    /// counter step beyond the configured bound raises
    /// [`Fault::QuadratureStepTooLarge`] on `faults` and is still adopted.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be read
    #[inline]
    pub fn sample_position(&mut self, faults: &mut impl FaultSink) -> Result<i32, Error<E>> {
        let raw = self.counter.read_counter().map_err(Error::Communication)?;
        let diff = self.state.update(raw);

        if self
            .config
            .max_step
            .is_some_and(|max_step| diff.unsigned_abs() > max_step)
        {
            faults.raise(Fault::QuadratureStepTooLarge);
        }

        Ok(utils::wrap_to_revolution(
            self.state.continuous_position(),
            self.config.ticks_per_rev,
        ))
    }
}
