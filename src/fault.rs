//! Sticky fault register shared with the supervising control loop

/// Faults raised by the position decoders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum Fault {
    /// Consecutive absolute samples disagree by more than the allowed delta,
    /// even after wraparound adjustment
    EncoderReadingUnstable = 0x01,
    /// Quadrature counter moved further between two samples than the
    /// configured step bound
    QuadratureStepTooLarge = 0x02,
}

impl Fault {
    const ALL: [Fault; 2] = [Fault::EncoderReadingUnstable, Fault::QuadratureStepTooLarge];

    /// Bit of this fault inside [`FaultFlags`]
    #[must_use]
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

/// Receiver of fault conditions
///
/// Raising never fails and never blocks
pub trait FaultSink {
    /// Record `fault`
    fn raise(&mut self, fault: Fault);
}

impl<F: FaultSink + ?Sized> FaultSink for &mut F {
    fn raise(&mut self, fault: Fault) {
        (**self).raise(fault);
    }
}

/// Sticky fault register
///
/// Flags stay set until [`FaultFlags::clear`] is called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultFlags {
    raw: u8,
}

impl FaultFlags {
    /// Create an empty register
    #[must_use]
    pub const fn new() -> Self {
        Self { raw: 0 }
    }

    /// Get the raw register value
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.raw
    }

    /// Check if `fault` has been raised since the last clear
    #[must_use]
    pub const fn contains(&self, fault: Fault) -> bool {
        self.raw & fault.mask() != 0
    }

    /// Check if no fault has been raised since the last clear
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw == 0
    }

    /// Reset every flag
    pub fn clear(&mut self) {
        self.raw = 0;
    }

    /// Iterate over the raised faults
    pub fn iter(&self) -> impl Iterator<Item = Fault> + '_ {
        Fault::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl FaultSink for FaultFlags {
    fn raise(&mut self, fault: Fault) {
        self.raw |= fault.mask();
    }
}

impl From<u8> for FaultFlags {
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}
