use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::bit::Bit;
use crate::clock::{Instant, Scheduler};
use crate::config::{CircuitConfig, DelayMode};
use crate::error::{Error, Result};
use crate::gate::{Gate, GateConfig, GateId};
use crate::port::{Observer, Port, PortEvent, PortId};

static NEXT_CIRCUIT_ID: AtomicU64 = AtomicU64::new(0);

/// Owns ports and gates, and propagates writes between them.
///
/// Every write made with notification is queued and processed breadth-first
/// before the outermost call returns. Gates with a delay either push their
/// write onto the logical clock or block the calling thread, depending on
/// [`DelayMode`].
#[derive(Debug)]
pub struct Circuit {
    // Stamped into every handle, so handles from another circuit are rejected
    id: u64,
    config: CircuitConfig,
    ports: Vec<Port>,
    gates: Vec<Gate>,
    pending: VecDeque<PortEvent>,
    scheduler: Scheduler,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::with_config(CircuitConfig::default())
    }
}

impl Circuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CircuitConfig) -> Self {
        Self {
            id: NEXT_CIRCUIT_ID.fetch_add(1, Ordering::Relaxed),
            config,
            ports: Vec::new(),
            gates: Vec::new(),
            pending: VecDeque::new(),
            scheduler: Scheduler::default(),
        }
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    pub fn now(&self) -> Instant {
        self.scheduler.now()
    }

    pub fn is_idle(&self) -> bool {
        self.scheduler.is_empty()
    }

    /// Allocates a free-standing port, e.g. a primary input of the circuit.
    pub fn add_port(&mut self) -> PortId {
        self.ports.push(Port::default());
        PortId::new(self.id, self.ports.len() - 1)
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn value(&self, port: PortId) -> Result<Bit> {
        Ok(self.port(port)?.value)
    }

    pub fn add_observer<F>(&mut self, port: PortId, f: F) -> Result<()>
    where
        F: FnMut(&PortEvent) + 'static,
    {
        self.port_mut(port)?
            .observers
            .push(Observer::Callback(Box::new(f)));
        Ok(())
    }

    /// Writes `value` and runs every reaction it triggers.
    pub fn set_value(&mut self, port: PortId, value: Bit) -> Result<()> {
        self.write(port, value)?;
        self.propagate()
    }

    pub fn set_value_quiet(&mut self, port: PortId, value: Bit) -> Result<()> {
        self.port_mut(port)?.value = value;
        Ok(())
    }

    pub fn add_gate(&mut self, config: GateConfig) -> Result<GateId> {
        if config.inputs == 0 {
            return Err(Error::InvalidArity(config.inputs));
        }

        let id = GateId::new(self.id, self.gates.len());
        let inputs = self.add_observed_ports(id, config.inputs);
        let output = self.add_port();
        self.gates.push(Gate::new(&config, inputs, output));

        log::debug!("{id}: {:?} with {} inputs", config.kind, config.inputs);
        Ok(id)
    }

    pub fn gate(&self, gate: GateId) -> Result<&Gate> {
        self.gates
            .get(gate.index)
            .filter(|_| gate.circuit == self.id)
            .ok_or(Error::UnknownGate(gate))
    }

    pub fn output(&self, gate: GateId) -> Result<PortId> {
        Ok(self.gate(gate)?.output())
    }

    pub fn react(&mut self, gate: GateId) -> Result<()> {
        self.gate(gate)?;
        self.react_gate(gate);
        self.propagate()
    }

    /// Writes the first `values` into the inputs of `gate` at once, then
    /// reacts a single time. Values beyond the gate's arity are dropped.
    pub fn input(&mut self, gate: GateId, values: &[Bit]) -> Result<()> {
        let inputs = self.gate(gate)?.inputs().to_vec();

        if values.len() > inputs.len() {
            log::warn!(
                "{gate}: ignoring {} values beyond its {} inputs",
                values.len() - inputs.len(),
                inputs.len()
            );
        }

        for (&port, &value) in inputs.iter().zip(values) {
            self.set_value_quiet(port, value)?;
        }

        self.react(gate)
    }

    pub fn set(&mut self, gate: GateId, index: usize, value: Bit) -> Result<()> {
        let port = self.input_at(gate, index)?;
        self.set_value(port, value)
    }

    /// Returns input `index` of `gate`. The next call to
    /// [`next_input_port`](Self::next_input_port) continues after it.
    pub fn input_port(&mut self, gate: GateId, index: usize) -> Result<PortId> {
        let port = self.input_at(gate, index)?;
        self.gate_mut(gate)?.set_cursor(index + 1);
        Ok(port)
    }

    /// Returns the next input of `gate` not yet handed out.
    pub fn next_input_port(&mut self, gate: GateId) -> Result<PortId> {
        let g = self.gate_mut(gate)?;
        let cursor = g.cursor();
        let port = *g.inputs().get(cursor).ok_or(Error::NoPortsRemaining {
            inputs: g.arity(),
        })?;
        g.set_cursor(cursor + 1);
        Ok(port)
    }

    /// Wires `source` into input `index` of `gate`. The gate stops reacting to
    /// the port previously in that slot.
    pub fn connect(&mut self, source: PortId, gate: GateId, index: usize) -> Result<()> {
        self.port(source)?;
        let g = self.gate_mut(gate)?;
        if g.output() == source {
            return Err(Error::SelfLoop { gate, index });
        }

        let len = g.arity();
        let slot = g
            .input_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(slot, source);
        let still_used = g.inputs().contains(&previous);

        if !still_used {
            self.ports[previous.index].unobserve(gate);
        }
        if !self.ports[source.index].is_observed_by(gate) {
            self.ports[source.index].observers.push(Observer::Gate(gate));
        }

        log::debug!("{source} -> {gate}[{index}]");
        Ok(())
    }

    /// Wires `source` into the next input of `gate` not yet handed out and
    /// returns the index it used.
    pub fn connect_next(&mut self, source: PortId, gate: GateId) -> Result<usize> {
        let g = self.gate(gate)?;
        let index = g.cursor();
        if index >= g.arity() {
            return Err(Error::NoPortsRemaining { inputs: g.arity() });
        }
        self.connect(source, gate, index)?;
        self.gates[gate.index].set_cursor(index + 1);
        Ok(index)
    }

    /// Detaches `gate` from its ports and gives it fresh inputs and a fresh
    /// output. Port handles obtained before the reset no longer reach the gate.
    ///
    /// The detached ports are not reclaimed: each reset grows the circuit by
    /// `arity + 1` ports for as long as it lives.
    pub fn reset(&mut self, gate: GateId) -> Result<()> {
        let arity = self.gate(gate)?.arity();
        let inputs = self.add_observed_ports(gate, arity);
        let output = self.add_port();

        let previous = self.gates[gate.index].replace_ports(inputs, output);
        for port in previous {
            self.ports[port.index].unobserve(gate);
        }

        log::debug!("{gate}: reset, output is now {output}");
        Ok(())
    }

    /// Moves the logical clock forward by `d`, applying delayed writes as they
    /// fall due.
    pub fn advance(&mut self, d: Duration) -> Result<()> {
        let until = self.now().saturating_add(d);
        self.run_scheduled(Some(until))?;
        self.scheduler.advance_to(until);
        Ok(())
    }

    pub fn settle(&mut self) -> Result<()> {
        self.run_scheduled(None)
    }

    fn run_scheduled(&mut self, until: Option<Instant>) -> Result<()> {
        let mut count = 0;
        loop {
            let Some(due) = self.scheduler.next_due() else {
                return Ok(());
            };
            let Some(write) = self.scheduler.pop_due(until.unwrap_or(due)) else {
                return Ok(());
            };

            count += 1;
            if count > self.config.max_events {
                return Err(self.abort());
            }

            self.write(write.port, write.value)?;
            self.propagate()?;
        }
    }

    fn propagate(&mut self) -> Result<()> {
        let mut count = 0;
        while let Some(event) = self.pending.pop_front() {
            count += 1;
            if count > self.config.max_events {
                return Err(self.abort());
            }

            log::trace!("{} {} <- {}", event.time, event.port, event.value);

            let mut observers = std::mem::take(&mut self.ports[event.port.index].observers);
            for observer in observers.iter_mut() {
                match observer {
                    Observer::Gate(gate) => self.react_gate(*gate),
                    Observer::Callback(f) => f(&event),
                }
            }
            let port = &mut self.ports[event.port.index];
            observers.append(&mut port.observers);
            port.observers = observers;
        }
        Ok(())
    }

    fn react_gate(&mut self, gate: GateId) {
        let g = &self.gates[gate.index];
        let inputs: Vec<Bit> = g.inputs().iter().map(|x| self.ports[x.index].value).collect();
        let result = g.evaluate(&inputs);
        let output = g.output();
        let delay = g.delay();

        // Logical time has millisecond resolution
        if delay.as_millis() == 0 {
            self.enqueue(output, result);
            return;
        }

        match self.config.delay_mode {
            DelayMode::Scheduled => {
                let due = self.scheduler.schedule(delay, output, result);
                log::trace!("{gate}: {output} <- {result} at {due}");
            }
            DelayMode::Blocking => {
                std::thread::sleep(delay);
                self.enqueue(output, result);
            }
        }
    }

    fn write(&mut self, port: PortId, value: Bit) -> Result<()> {
        self.port_mut(port)?;
        self.enqueue(port, value);
        Ok(())
    }

    fn enqueue(&mut self, port: PortId, value: Bit) {
        self.ports[port.index].value = value;
        self.pending.push_back(PortEvent {
            port,
            value,
            time: self.now(),
        });
    }

    fn abort(&mut self) -> Error {
        let limit = self.config.max_events;
        log::warn!("propagation exceeded {limit} events, dropping pending writes");
        self.pending.clear();
        self.scheduler.clear();
        Error::CyclicTopology { limit }
    }

    fn add_observed_ports(&mut self, gate: GateId, n: usize) -> Vec<PortId> {
        (0..n)
            .map(|_| {
                let port = self.add_port();
                self.ports[port.index].observers.push(Observer::Gate(gate));
                port
            })
            .collect()
    }

    fn input_at(&self, gate: GateId, index: usize) -> Result<PortId> {
        let g = self.gate(gate)?;
        g.inputs()
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: g.arity(),
            })
    }

    fn port(&self, port: PortId) -> Result<&Port> {
        self.ports
            .get(port.index)
            .filter(|_| port.circuit == self.id)
            .ok_or(Error::UnknownPort(port))
    }

    fn port_mut(&mut self, port: PortId) -> Result<&mut Port> {
        if port.circuit != self.id {
            return Err(Error::UnknownPort(port));
        }
        self.ports.get_mut(port.index).ok_or(Error::UnknownPort(port))
    }

    fn gate_mut(&mut self, gate: GateId) -> Result<&mut Gate> {
        if gate.circuit != self.id {
            return Err(Error::UnknownGate(gate));
        }
        self.gates.get_mut(gate.index).ok_or(Error::UnknownGate(gate))
    }
}
