//! Reactive propagation of single-bit signals through combinational gates.
//!
//! A [`Circuit`] owns ports and gates. Writing a port with
//! [`Circuit::set_value`] makes every gate observing it recompute its output,
//! which in turn may feed further gates. Wiring is done by aliasing: a gate
//! input connected with [`Circuit::connect`] *is* the upstream port.
//!
//! ```
//! use bitgate::{Bit, Circuit, GateConfig, GateKind};
//!
//! let mut circuit = Circuit::new();
//! let nand = circuit.add_gate(GateConfig::new(GateKind::And).inverted(true))?;
//! let not = circuit.add_gate(GateConfig::new(GateKind::Buffer).with_inputs(1).inverted(true))?;
//! circuit.connect(circuit.output(nand)?, not, 0)?;
//!
//! circuit.input(nand, &[Bit::High, Bit::High])?;
//! assert_eq!(circuit.value(circuit.output(not)?)?, Bit::High);
//! # Ok::<(), bitgate::Error>(())
//! ```

pub mod bit;
pub mod circuit;
pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod port;

pub use bit::Bit;
pub use circuit::Circuit;
pub use clock::Instant;
pub use config::{CircuitConfig, DelayMode};
pub use error::{Error, Result};
pub use gate::{Gate, GateConfig, GateId, GateKind, LogicFn};
pub use port::{Callback, PortEvent, PortId};
