use std::fmt;
use std::time::Duration;

use crate::bit::Bit;
use crate::port::PortId;

pub type LogicFn = fn(&[Bit]) -> Bit;

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, serde::Serialize, serde::Deserialize,
)]
pub struct GateId {
    pub(crate) circuit: u64,
    pub(crate) index: usize,
}

impl GateId {
    pub(crate) fn new(circuit: u64, index: usize) -> Self {
        Self { circuit, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gate#{}", self.index)
    }
}

/// The logic function of a gate, before inversion.
#[derive(Copy, Clone, Debug)]
pub enum GateKind {
    /// High when every input is high.
    And,
    /// High when any input is high.
    Or,
    /// High when an odd number of inputs are high.
    Xor,
    /// Follows the first input. Inverted, this is a NOT gate.
    Buffer,
    Custom(LogicFn),
}

impl GateKind {
    pub fn eval(&self, inputs: &[Bit]) -> Bit {
        match self {
            GateKind::And => inputs.iter().all(Bit::is_high).into(),
            GateKind::Or => inputs.iter().any(Bit::is_high).into(),
            GateKind::Xor => (inputs.iter().filter(|x| x.is_high()).count() % 2 == 1).into(),
            GateKind::Buffer => inputs.first().copied().unwrap_or_default(),
            GateKind::Custom(f) => f(inputs),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct GateConfig {
    pub kind: GateKind,
    pub inputs: usize,
    pub invert: bool,
    pub delay: Duration,
}

impl GateConfig {
    pub fn new(kind: GateKind) -> Self {
        Self {
            kind,
            inputs: 2,
            invert: false,
            delay: Duration::ZERO,
        }
    }

    pub fn with_inputs(mut self, inputs: usize) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug)]
pub struct Gate {
    kind: GateKind,
    inputs: Vec<PortId>,
    output: PortId,
    invert: bool,
    delay: Duration,
    cursor: usize,
}

impl Gate {
    pub(crate) fn new(config: &GateConfig, inputs: Vec<PortId>, output: PortId) -> Self {
        Self {
            kind: config.kind,
            inputs,
            output,
            invert: config.invert,
            delay: config.delay,
            cursor: 0,
        }
    }

    pub fn kind(&self) -> GateKind {
        self.kind
    }

    pub fn arity(&self) -> usize {
        self.inputs.len()
    }

    pub fn inputs(&self) -> &[PortId] {
        &self.inputs
    }

    pub fn output(&self) -> PortId {
        self.output
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Result of the logic function over `inputs`, after inversion.
    pub fn evaluate(&self, inputs: &[Bit]) -> Bit {
        let result = self.kind.eval(inputs);
        if self.invert {
            !result
        } else {
            result
        }
    }

    pub(crate) fn input_mut(&mut self, index: usize) -> Option<&mut PortId> {
        self.inputs.get_mut(index)
    }

    pub(crate) fn replace_ports(&mut self, inputs: Vec<PortId>, output: PortId) -> Vec<PortId> {
        self.output = output;
        self.cursor = 0;
        std::mem::replace(&mut self.inputs, inputs)
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use crate::bit::Bit::{High, Low};

    use super::*;

    fn truth_table(kind: GateKind) -> Vec<Bit> {
        [[Low, Low], [Low, High], [High, Low], [High, High]]
            .iter()
            .map(|x| kind.eval(x))
            .collect()
    }

    #[test]
    fn test_builtin_truth_tables() {
        assert_eq!(truth_table(GateKind::And), vec![Low, Low, Low, High]);
        assert_eq!(truth_table(GateKind::Or), vec![Low, High, High, High]);
        assert_eq!(truth_table(GateKind::Xor), vec![Low, High, High, Low]);
        assert_eq!(truth_table(GateKind::Buffer), vec![Low, Low, High, High]);
    }

    #[test]
    fn test_wide_gates() {
        assert_eq!(GateKind::And.eval(&[High, High, Low]), Low);
        assert_eq!(GateKind::Or.eval(&[Low, Low, High]), High);
        assert_eq!(GateKind::Xor.eval(&[High, High, High]), High);
    }

    #[test]
    fn test_custom_logic() {
        fn majority(inputs: &[Bit]) -> Bit {
            (inputs.iter().filter(|x| x.is_high()).count() * 2 > inputs.len()).into()
        }

        let kind = GateKind::Custom(majority);
        assert_eq!(kind.eval(&[High, Low, High]), High);
        assert_eq!(kind.eval(&[High, Low, Low]), Low);
    }

    #[test]
    fn test_config_defaults_to_two_inputs() {
        let config = GateConfig::new(GateKind::And);
        assert_eq!(config.inputs, 2);
        assert!(!config.invert);
        assert_eq!(config.delay, Duration::ZERO);

        let config = config
            .with_inputs(3)
            .inverted(true)
            .with_delay(Duration::from_millis(5));
        assert_eq!(config.inputs, 3);
        assert!(config.invert);
        assert_eq!(config.delay, Duration::from_millis(5));
    }

    #[test]
    fn test_evaluate_applies_inversion() {
        let config = GateConfig::new(GateKind::And).inverted(true);
        let inputs = vec![PortId::new(0, 0), PortId::new(0, 1)];
        let gate = Gate::new(&config, inputs, PortId::new(0, 2));
        assert_eq!(gate.evaluate(&[High, High]), Low);
        assert_eq!(gate.evaluate(&[Low, High]), High);
    }
}
