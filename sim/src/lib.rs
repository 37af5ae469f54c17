pub mod agent;
pub mod arena;
pub mod error;
pub mod fitness;
pub mod kinematics;
pub mod reproduction;
pub mod simulation;
pub mod tail;

pub use agent::Agent;
pub use arena::Arena;
pub use error::SimError;
pub use simulation::{Simulation, SimulationConfig, TickReport};

use shared::{RandomSource, SimulationStats};

/// Run a simulation for a fixed number of ticks without any host attached
pub fn run_headless<R: RandomSource>(
    config: SimulationConfig,
    ticks: u64,
    rng: R,
) -> Result<SimulationStats, SimError> {
    let mut sim = Simulation::new(config, rng)?;
    sim.run(ticks);
    Ok(sim.stats())
}
