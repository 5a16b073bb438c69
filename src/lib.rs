#![no_std]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod absolute;
mod counter;
mod error;
mod fault;
mod link;
mod quadrature;
mod register;
mod utils;

pub use absolute::{
    ANGLE_COMMAND, AbsoluteConfig, AbsoluteEncoder, EncoderState, ReadyWait, STARTUP_DELAY_US,
    frame_to_position,
};
pub use counter::{
    ClockSource, CounterConfig, CounterSource, EdgeMode, PhaseMode, Prescaler, QepRegisters,
    QepTimer,
};
pub use error::{ConfigError, Error, LinkError};
pub use fault::{Fault, FaultFlags, FaultSink};
pub use link::{LinkConfig, SensorLink, SpiLink};
pub use quadrature::{COUNTER_RANGE, QepState, QuadratureConfig, QuadratureEncoder};
pub use register::{QepControlRegister, TimerControlRegister};
pub use utils::{exceeds_circular_tolerance, wrap_to_revolution};
