use std::time::Duration;

use bitgate::{Bit, Circuit, GateConfig, GateId, GateKind, PortId};

const XOR_DELAY: Duration = Duration::from_millis(5);

/// One-bit full adder: two delayed XOR gates for the sum, two AND gates and
/// an OR gate for the carry.
pub struct FullAdder {
    pub a: PortId,
    pub b: PortId,
    pub carry_in: PortId,
    sum: GateId,
    carry_out: GateId,
}

impl FullAdder {
    pub fn new(circuit: &mut Circuit) -> bitgate::Result<Self> {
        let a = circuit.add_port();
        let b = circuit.add_port();
        let carry_in = circuit.add_port();

        let xor = GateConfig::new(GateKind::Xor).with_delay(XOR_DELAY);
        let half_sum = circuit.add_gate(xor)?;
        let sum = circuit.add_gate(xor)?;
        let generate = circuit.add_gate(GateConfig::new(GateKind::And))?;
        let propagate = circuit.add_gate(GateConfig::new(GateKind::And))?;
        let carry_out = circuit.add_gate(GateConfig::new(GateKind::Or))?;

        circuit.connect_next(a, half_sum)?;
        circuit.connect_next(b, half_sum)?;
        circuit.connect_next(a, generate)?;
        circuit.connect_next(b, generate)?;

        let half = circuit.output(half_sum)?;
        circuit.connect_next(half, sum)?;
        circuit.connect_next(carry_in, sum)?;
        circuit.connect_next(half, propagate)?;
        circuit.connect_next(carry_in, propagate)?;

        circuit.connect_next(circuit.output(generate)?, carry_out)?;
        circuit.connect_next(circuit.output(propagate)?, carry_out)?;

        Ok(FullAdder {
            a,
            b,
            carry_in,
            sum,
            carry_out,
        })
    }

    pub fn sum_port(&self, circuit: &Circuit) -> bitgate::Result<PortId> {
        circuit.output(self.sum)
    }

    pub fn sum(&self, circuit: &Circuit) -> bitgate::Result<Bit> {
        circuit.value(circuit.output(self.sum)?)
    }

    pub fn carry_out(&self, circuit: &Circuit) -> bitgate::Result<Bit> {
        circuit.value(circuit.output(self.carry_out)?)
    }

    /// Drives the three inputs and waits for the outputs to settle.
    pub fn add(
        &self,
        circuit: &mut Circuit,
        a: Bit,
        b: Bit,
        carry_in: Bit,
    ) -> bitgate::Result<()> {
        circuit.set_value(self.a, a)?;
        circuit.set_value(self.b, b)?;
        circuit.set_value(self.carry_in, carry_in)?;
        circuit.settle()
    }
}
