use std::time::Instant;

use bitgate::{Bit, Circuit, CircuitConfig};
use bitgate_demo::adder::FullAdder;

#[derive(serde::Serialize)]
struct Row {
    a: Bit,
    b: Bit,
    carry_in: Bit,
    sum: Bit,
    carry_out: Bit,
    settled_at_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = CircuitConfig::from_env_var().unwrap_or_else(|e| {
        log::debug!("{e}, using defaults");
        CircuitConfig::default()
    });

    log::info!("Create circuit {:?}", config);
    let mut circuit = Circuit::with_config(config);

    log::info!("Create full adder");
    let adder = FullAdder::new(&mut circuit)?;

    circuit.add_observer(adder.sum_port(&circuit)?, |e| {
        log::debug!("sum <- {} at {}", e.value, e.time);
    })?;

    log::info!("Start truth table");
    for row in 0..8u8 {
        let a = Bit::try_from((row >> 2) & 1)?;
        let b = Bit::try_from((row >> 1) & 1)?;
        let carry_in = Bit::try_from(row & 1)?;

        let start = Instant::now();
        adder.add(&mut circuit, a, b, carry_in)?;
        log::trace!("row {row} took {}us", start.elapsed().as_micros());

        let row = Row {
            a,
            b,
            carry_in,
            sum: adder.sum(&circuit)?,
            carry_out: adder.carry_out(&circuit)?,
            settled_at_ms: circuit.now().as_millis(),
        };
        println!("{}", serde_json::to_string(&row)?);
    }

    Ok(())
}
