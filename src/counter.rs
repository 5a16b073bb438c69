//! Hardware tick counters driven by quadrature decoding logic

use crate::register::{QepControlRegister, TimerControlRegister};

/// Timer clock source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ClockSource {
    /// Peripheral bus clock
    #[default]
    Pclk = 0,
    /// Auxiliary clock
    Aclk = 1,
}

/// Timer clock prescaler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Prescaler {
    #[default]
    Div1 = 0,
    Div2 = 1,
    Div4 = 2,
    Div8 = 3,
    Div16 = 4,
    Div32 = 5,
    Div64 = 6,
    Div128 = 7,
}

/// Signal edges that advance the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeMode {
    Rising,
    #[default]
    Both,
}

/// Quadrature phases that advance the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseMode {
    PhaseA,
    #[default]
    Both,
}

/// Counter settings
///
/// The default counts every edge of both phases (x4 decoding), ignores the
/// index pulse for counter reset and leaves every interrupt off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CounterConfig {
    pub clock_source: ClockSource,
    pub prescaler: Prescaler,
    pub edge_mode: EdgeMode,
    pub phase_mode: PhaseMode,
    /// Reset the counter on each index pulse
    pub reset_on_index: bool,
    /// Enable index, direction and phase interrupts
    pub interrupts: bool,
}

impl CounterConfig {
    /// Timer control register image for these settings
    #[must_use]
    pub fn timer_control(&self) -> TimerControlRegister {
        let mut reg = TimerControlRegister::from_bits(0);
        reg.set_cs(self.clock_source as u8);
        reg.set_ps(self.prescaler as u8);
        reg
    }

    /// QEP control register image for these settings, decoder enabled
    #[must_use]
    pub fn qep_control(&self) -> QepControlRegister {
        let mut reg = QepControlRegister::from_bits(0);
        reg.set_cntedge(self.edge_mode == EdgeMode::Both);
        reg.set_cntab(self.phase_mode == PhaseMode::Both);
        reg.set_idxrst(self.reset_on_index);
        reg.set_idxevie(self.interrupts);
        reg.set_dirie(self.interrupts);
        reg.set_phaie(self.interrupts);
        reg.set_phbie(self.interrupts);
        reg.set_qepen(true);
        reg
    }
}

/// Free-running tick counter
///
/// Backends differ in register layout only; they all report the same
/// native-width count
pub trait CounterSource {
    /// Peripheral error
    type Error;

    /// Apply clock and decoding settings and start counting
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral rejects the settings
    fn configure(&mut self, config: &CounterConfig) -> Result<(), Self::Error>;

    /// Current 16-bit count
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be read
    fn read_counter(&mut self) -> Result<u16, Self::Error>;
}

impl<C: CounterSource + ?Sized> CounterSource for &mut C {
    type Error = C::Error;

    fn configure(&mut self, config: &CounterConfig) -> Result<(), Self::Error> {
        (**self).configure(config)
    }

    fn read_counter(&mut self) -> Result<u16, Self::Error> {
        (**self).read_counter()
    }
}

/// Register block of a timer with a quadrature decoder
pub trait QepRegisters {
    /// Write the timer control register
    fn write_timer_control(&mut self, value: TimerControlRegister);

    /// Write the QEP control register
    fn write_qep_control(&mut self, value: QepControlRegister);

    /// Read the QEP control register, tick counter included
    fn read_qep_control(&mut self) -> QepControlRegister;
}

/// Counter backed by a timer's quadrature decoder registers
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QepTimer<R> {
    regs: R,
}

impl<R: QepRegisters> QepTimer<R> {
    /// Wrap a register block
    pub fn new(regs: R) -> Self {
        Self { regs }
    }

    /// Release the register block
    pub fn release(self) -> R {
        self.regs
    }
}

impl<R: QepRegisters> CounterSource for QepTimer<R> {
    type Error = core::convert::Infallible;

    fn configure(&mut self, config: &CounterConfig) -> Result<(), Self::Error> {
        self.regs.write_timer_control(config.timer_control());
        self.regs.write_qep_control(config.qep_control());
        Ok(())
    }

    #[inline]
    fn read_counter(&mut self) -> Result<u16, Self::Error> {
        Ok(self.regs.read_qep_control().ticks())
    }
}
