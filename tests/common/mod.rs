//! Scripted peripherals shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use rotor_position::{
    CounterConfig, CounterSource, Fault, FaultSink, LinkConfig, QepControlRegister, QepRegisters,
    SensorLink, TimerControlRegister,
};

/// Link whose sensor answers each command with the next scripted frame.
#[derive(Debug, Default)]
pub struct ScriptedLink {
    frames: VecDeque<u16>,
    pending: Option<u16>,
    /// Polls that report "not ready" before a pending frame is visible
    pub polls_before_ready: u32,
    polls: u32,
    pub configured: Option<LinkConfig>,
    pub commands: Vec<u16>,
}

impl ScriptedLink {
    pub fn new(frames: &[u16]) -> Self {
        Self {
            frames: frames.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, frame: u16) {
        self.frames.push_back(frame);
    }
}

impl SensorLink for ScriptedLink {
    type Error = ();

    fn configure(&mut self, config: &LinkConfig) -> Result<(), ()> {
        self.configured = Some(*config);
        Ok(())
    }

    fn write(&mut self, command: u16) -> Result<(), ()> {
        self.commands.push(command);
        self.pending = self.frames.pop_front();
        self.polls = 0;
        Ok(())
    }

    fn data_ready(&mut self) -> Result<bool, ()> {
        if self.pending.is_none() {
            return Ok(false);
        }
        if self.polls < self.polls_before_ready {
            self.polls += 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn read_frame(&mut self) -> Result<u16, ()> {
        self.pending.take().ok_or(())
    }
}

/// SPI device answering transfers from a script, failing once it runs dry.
#[derive(Debug, Default)]
pub struct FlakySpi {
    responses: VecDeque<u16>,
    pub transfers: usize,
}

impl FlakySpi {
    pub fn new(responses: &[u16]) -> Self {
        Self {
            responses: responses.iter().copied().collect(),
            transfers: 0,
        }
    }
}

impl ErrorType for FlakySpi {
    type Error = ErrorKind;
}

impl SpiDevice<u8> for FlakySpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        for operation in operations {
            if let Operation::Transfer(read, _) = operation {
                self.transfers += 1;
                let response = self.responses.pop_front().ok_or(ErrorKind::Other)?;
                read.copy_from_slice(&response.to_be_bytes());
            }
        }
        Ok(())
    }
}

/// Counter replaying scripted raw values.
#[derive(Debug, Default)]
pub struct ScriptedCounter {
    values: VecDeque<u16>,
    pub configured: Option<CounterConfig>,
}

impl ScriptedCounter {
    pub fn new(values: &[u16]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            configured: None,
        }
    }

    pub fn push(&mut self, value: u16) {
        self.values.push_back(value);
    }
}

impl CounterSource for ScriptedCounter {
    type Error = ();

    fn configure(&mut self, config: &CounterConfig) -> Result<(), ()> {
        self.configured = Some(*config);
        Ok(())
    }

    fn read_counter(&mut self) -> Result<u16, ()> {
        self.values.pop_front().ok_or(())
    }
}

/// In-memory register block of a quadrature timer.
///
/// The tick counter lives in its own cell so a test can move it while the
/// encoder owns the block.
#[derive(Debug, Default)]
pub struct FakeRegisters {
    pub timer_control: u32,
    pub qep_control: u32,
    pub ticks: Rc<Cell<u16>>,
}

impl QepRegisters for FakeRegisters {
    fn write_timer_control(&mut self, value: TimerControlRegister) {
        self.timer_control = value.bits();
    }

    fn write_qep_control(&mut self, value: QepControlRegister) {
        self.qep_control = value.bits() & 0xFFFF;
    }

    fn read_qep_control(&mut self) -> QepControlRegister {
        QepControlRegister::from_bits((u32::from(self.ticks.get()) << 16) | self.qep_control)
    }
}

/// Delay that only accumulates the requested time.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Fault sink counting every raise.
#[derive(Debug, Default)]
pub struct FaultLog {
    pub raised: Vec<Fault>,
}

impl FaultLog {
    pub fn count(&self, fault: Fault) -> usize {
        self.raised.iter().filter(|f| **f == fault).count()
    }
}

impl FaultSink for FaultLog {
    fn raise(&mut self, fault: Fault) {
        self.raised.push(fault);
    }
}

/// Sensor frame carrying `position` above `shift` padding bits.
#[allow(clippy::cast_sign_loss)]
pub fn frame(position: i16, shift: u8) -> u16 {
    (position << shift) as u16
}
