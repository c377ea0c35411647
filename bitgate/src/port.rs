use std::fmt;

use crate::bit::Bit;
use crate::clock::Instant;
use crate::gate::GateId;

/// Handle to a port owned by a [`Circuit`](crate::Circuit).
///
/// Two gates holding the same `PortId` share the same signal: this is how
/// wires are modeled.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, serde::Serialize, serde::Deserialize,
)]
pub struct PortId {
    pub(crate) circuit: u64,
    pub(crate) index: usize,
}

impl PortId {
    pub(crate) fn new(circuit: u64, index: usize) -> Self {
        Self { circuit, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "port#{}", self.index)
    }
}

/// Delivered to observers every time a port is written with notification.
#[derive(Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct PortEvent {
    pub port: PortId,
    pub value: Bit,
    pub time: Instant,
}

pub type Callback = Box<dyn FnMut(&PortEvent)>;

pub(crate) enum Observer {
    Gate(GateId),
    Callback(Callback),
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observer::Gate(gate) => f.debug_tuple("Gate").field(gate).finish(),
            Observer::Callback(_) => f.write_str("Callback"),
        }
    }
}

#[derive(Default, Debug)]
pub(crate) struct Port {
    pub value: Bit,
    pub observers: Vec<Observer>,
}

impl Port {
    pub fn is_observed_by(&self, gate: GateId) -> bool {
        self.observers
            .iter()
            .any(|x| matches!(x, Observer::Gate(g) if *g == gate))
    }

    pub fn unobserve(&mut self, gate: GateId) {
        self.observers
            .retain(|x| !matches!(x, Observer::Gate(g) if *g == gate));
    }
}
