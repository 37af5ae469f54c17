use sim::SimulationConfig;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Host settings, read from the environment at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub tick_interval: Duration,
    pub simulation: SimulationConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            tick_interval: Duration::from_millis(16),
            simulation: SimulationConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build from `BIND_ADDR`, `TICK_MILLIS`, `POPULATION`, `MUTATION_RATE`
    /// and `ELITISM_BIAS`; anything unset keeps its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = parse(&lookup, "BIND_ADDR")? {
            config.bind_addr = addr;
        }
        if let Some(millis) = parse::<u64, _>(&lookup, "TICK_MILLIS")? {
            config.tick_interval = Duration::from_millis(millis.max(1));
        }
        if let Some(population) = parse(&lookup, "POPULATION")? {
            config.simulation.population = population;
        }
        if let Some(rate) = parse(&lookup, "MUTATION_RATE")? {
            config.simulation.mutation_rate = rate;
        }
        if let Some(bias) = parse(&lookup, "ELITISM_BIAS")? {
            config.simulation.elitism_bias = bias;
        }

        Ok(config)
    }
}

fn parse<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
