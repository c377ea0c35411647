use thiserror::Error;

use crate::gate::GateId;
use crate::port::PortId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum Error {
    #[error("Invalid bit value {0}, expected 0 or 1")]
    InvalidValue(u8),

    #[error("A gate needs at least one input, got {0}")]
    InvalidArity(usize),

    #[error("Input index {index} out of range for a gate with {len} inputs")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("All {inputs} input ports have already been handed out")]
    NoPortsRemaining { inputs: usize },

    #[error("Unknown port {0}")]
    UnknownPort(PortId),

    #[error("Unknown gate {0}")]
    UnknownGate(GateId),

    #[error("Cannot wire the output of {gate} into its own input {index}")]
    SelfLoop { gate: GateId, index: usize },

    #[error("Propagation did not settle within {limit} events")]
    CyclicTopology { limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
