use crate::error::{Error, Result};

/// How a gate with a non-zero delay makes its output visible.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum DelayMode {
    /// The write is queued on the logical clock and applied by
    /// [`Circuit::advance`](crate::Circuit::advance) or
    /// [`Circuit::settle`](crate::Circuit::settle).
    #[default]
    Scheduled,
    /// The reacting thread sleeps for the delay, then writes.
    Blocking,
}

impl std::str::FromStr for DelayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(DelayMode::Scheduled),
            "blocking" => Ok(DelayMode::Blocking),
            x => Err(Error::InvalidConfig(format!("unknown delay mode {x:?}"))),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct CircuitConfig {
    /// Upper bound on the events a single propagation may process.
    pub max_events: usize,
    pub delay_mode: DelayMode,
}

impl CircuitConfig {
    pub const ENV_VAR: &'static str = "BITGATE_CONFIG";

    /// Parses `<max_events>:<delay_mode>`, e.g. `10000:scheduled`.
    pub fn try_from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidConfig(s.to_owned());

        let mut iter = s.split_terminator(':');
        let max_events: usize = iter
            .next()
            .ok_or_else(invalid)?
            .trim()
            .parse()
            .map_err(|_| invalid())?;
        let delay_mode: DelayMode = iter.next().ok_or_else(invalid)?.trim().parse()?;

        if iter.next().is_some() || max_events == 0 {
            return Err(invalid());
        }

        Ok(CircuitConfig {
            max_events,
            delay_mode,
        })
    }

    pub fn from_env_var() -> Result<Self> {
        let s = std::env::var(Self::ENV_VAR)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", Self::ENV_VAR)))?;
        CircuitConfig::try_from_str(&s)
    }
}

impl Default for CircuitConfig {
    fn default() -> Self {
        CircuitConfig {
            max_events: 10_000,
            delay_mode: DelayMode::Scheduled,
        }
    }
}
