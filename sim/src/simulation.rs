use crate::agent::Agent;
use crate::arena::Arena;
use crate::error::{Result, SimError};
use crate::kinematics::{self, Advance};
use crate::reproduction::{self, BreedingParams, ReproductionEvent};
use crate::tail;
use shared::{PopulationSnapshot, RandomSource, SimulationStats};
use tracing::{info, trace};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of agent slots, fixed until the next reconfigure
    pub population: usize,
    /// Scale of the multiplicative mutation jitter
    pub mutation_rate: f64,
    /// Chance each gene (and the birthplace) comes from the fitter parent
    pub elitism_bias: f64,
    /// Per-tick chance that a large enough death batch breeds
    pub reproduction_probability: f64,
    /// Smallest death batch that can breed
    pub min_death_batch: usize,
    pub arena: Arena,
    /// Update the cosmetic tail wave every tick
    pub animate_tail: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            population: 30,
            mutation_rate: 0.1,
            elitism_bias: 0.5,
            reproduction_probability: 0.05,
            min_death_batch: 4,
            arena: Arena::default(),
            animate_tail: true,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population == 0 {
            return Err(SimError::invalid("population", "must be greater than zero"));
        }
        if !(self.mutation_rate.is_finite() && self.mutation_rate >= 0.0) {
            return Err(SimError::invalid(
                "mutation_rate",
                "must be a finite, non-negative number",
            ));
        }
        if !(0.0..=1.0).contains(&self.elitism_bias) {
            return Err(SimError::invalid("elitism_bias", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.reproduction_probability) {
            return Err(SimError::invalid(
                "reproduction_probability",
                "must be within [0, 1]",
            ));
        }
        if self.min_death_batch < 3 {
            return Err(SimError::invalid(
                "min_death_batch",
                "must be at least 3 (two parents and a slot to recycle)",
            ));
        }
        self.arena.validate()
    }

    fn breeding(&self) -> BreedingParams {
        BreedingParams {
            mutation_rate: self.mutation_rate,
            elitism_bias: self.elitism_bias,
        }
    }
}

/// Summary of one executed tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Agents that were updated this tick
    pub alive: usize,
    /// Size of this tick's death batch
    pub dead: usize,
    /// Agents that reached the goal during this tick
    pub arrivals: usize,
    pub reproduction: Option<ReproductionEvent>,
}

/// The simulation clock: owns the population and advances it tick by tick.
///
/// The random source is owned too, so a seeded generator gives a fully
/// repeatable run.
pub struct Simulation<R: RandomSource> {
    pub config: SimulationConfig,
    pub agents: Vec<Agent>,
    rng: R,
    run_id: Uuid,
    tick: u64,
    paused: bool,
    births: u64,
    best_fitness: f64,
    best_fitness_ever: f64,
}

impl<R: RandomSource> Simulation<R> {
    /// Build a fresh random population
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let mut sim = Self {
            config,
            agents: Vec::new(),
            rng,
            run_id: Uuid::new_v4(),
            tick: 0,
            paused: false,
            births: 0,
            best_fitness: f64::INFINITY,
            best_fitness_ever: f64::INFINITY,
        };
        sim.populate();
        Ok(sim)
    }

    fn populate(&mut self) {
        let arena = self.config.arena;
        let rng = &mut self.rng;
        self.agents = (0..self.config.population)
            .map(|_| Agent::random(&arena, &mut *rng))
            .collect();

        self.run_id = Uuid::new_v4();
        self.tick = 0;
        self.births = 0;
        self.best_fitness = self.min_fitness();
        self.best_fitness_ever = self.best_fitness;

        info!(
            run_id = %self.run_id,
            population = self.config.population,
            mutation_rate = self.config.mutation_rate,
            elitism_bias = self.config.elitism_bias,
            "population built"
        );
    }

    /// Advance the simulation by one tick.
    ///
    /// Returns `None` without touching any state while paused.
    pub fn step(&mut self) -> Option<TickReport> {
        if self.paused {
            return None;
        }

        let arena = self.config.arena;
        let mut death_batch = Vec::new();
        let mut alive = 0;
        let mut arrivals = 0;
        let mut best = f64::INFINITY;

        for (slot, agent) in self.agents.iter_mut().enumerate() {
            match kinematics::advance(agent, &arena, &mut self.rng) {
                Advance::Skipped => {
                    death_batch.push(slot);
                    continue;
                }
                Advance::ReachedGoal => arrivals += 1,
                Advance::Moved => {}
            }

            alive += 1;
            if self.config.animate_tail {
                tail::follow_through(&mut agent.path, agent.displacement, &mut agent.wave_phase);
            }
            best = best.min(agent.fitness);
        }

        let reproduction = self.breed(&death_batch);

        self.tick += 1;
        self.best_fitness = if alive > 0 { best } else { self.min_fitness() };
        self.best_fitness_ever = self.best_fitness_ever.min(self.best_fitness);

        Some(TickReport {
            tick: self.tick,
            alive,
            dead: death_batch.len(),
            arrivals,
            reproduction,
        })
    }

    /// Run the gated reproduction step over this tick's death batch.
    ///
    /// A batch that is too small or loses the coin flip is dropped; its
    /// members stay dead and show up again in the next tick's batch.
    fn breed(&mut self, death_batch: &[usize]) -> Option<ReproductionEvent> {
        if death_batch.len() < self.config.min_death_batch {
            return None;
        }
        if self.rng.uniform() >= self.config.reproduction_probability {
            trace!(batch = death_batch.len(), "reproduction gate closed");
            return None;
        }

        let selection = reproduction::select(death_batch, &self.agents)?;
        let event = reproduction::reproduce(
            &mut self.agents,
            selection,
            self.config.breeding(),
            &self.config.arena,
            &mut self.rng,
        );
        self.births += 1;
        Some(event)
    }

    /// Run up to `ticks` ticks; returns how many actually ran.
    pub fn run(&mut self, ticks: u64) -> u64 {
        let mut ran = 0;
        for _ in 0..ticks {
            if self.step().is_none() {
                break;
            }
            ran += 1;
        }
        ran
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Throw the population away and rebuild it with new parameters.
    ///
    /// Invalid parameters are rejected and leave the running simulation
    /// exactly as it was. The pause flag is kept.
    pub fn reconfigure(
        &mut self,
        population: usize,
        mutation_rate: f64,
        elitism_bias: f64,
    ) -> Result<()> {
        let config = SimulationConfig {
            population,
            mutation_rate,
            elitism_bias,
            ..self.config.clone()
        };
        config.validate()?;

        self.config = config;
        self.populate();
        Ok(())
    }

    fn min_fitness(&self) -> f64 {
        self.agents
            .iter()
            .map(|a| a.fitness)
            .fold(f64::INFINITY, f64::min)
    }

    /// Get average fitness over every slot
    pub fn average_fitness(&self) -> f64 {
        if self.agents.is_empty() {
            return 0.0;
        }

        let total: f64 = self.agents.iter().map(|a| a.fitness).sum();
        total / self.agents.len() as f64
    }

    pub fn stats(&self) -> SimulationStats {
        let alive = self.agents.iter().filter(|a| a.is_alive()).count();
        SimulationStats {
            best_fitness: self.best_fitness,
            best_fitness_ever: self.best_fitness_ever,
            average_fitness: self.average_fitness(),
            alive,
            dead: self.agents.len() - alive,
            births: self.births,
            max_generation: self.agents.iter().map(|a| a.generation).max().unwrap_or(0),
            tick: self.tick,
        }
    }

    /// Immutable copy of everything a renderer may look at
    pub fn snapshot(&self) -> PopulationSnapshot {
        PopulationSnapshot {
            run_id: self.run_id,
            tick: self.tick,
            paused: self.paused,
            arena: self.config.arena.snapshot(),
            agents: self.agents.iter().map(Agent::snapshot).collect(),
            stats: self.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shared::random::ScriptedRandom;
    use shared::Point;

    fn seeded(config: SimulationConfig) -> Simulation<StdRng> {
        Simulation::new(config, StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn test_simulation_creation() {
        let sim = seeded(SimulationConfig::default());

        assert_eq!(sim.agents.len(), 30);
        assert_eq!(sim.tick(), 0);
        assert!(!sim.is_paused());
        assert!(sim.agents.iter().all(|a| a.generation == 0 && a.is_alive()));
    }

    #[test]
    fn test_invalid_configuration() {
        let bad = [
            SimulationConfig {
                population: 0,
                ..Default::default()
            },
            SimulationConfig {
                mutation_rate: -0.1,
                ..Default::default()
            },
            SimulationConfig {
                mutation_rate: f64::NAN,
                ..Default::default()
            },
            SimulationConfig {
                elitism_bias: 1.5,
                ..Default::default()
            },
            SimulationConfig {
                reproduction_probability: -0.5,
                ..Default::default()
            },
            SimulationConfig {
                min_death_batch: 2,
                ..Default::default()
            },
        ];

        for config in bad {
            let err = Simulation::new(config, StdRng::seed_from_u64(0)).err();
            assert!(matches!(err, Some(SimError::InvalidConfiguration { .. })));
        }
    }

    #[test]
    fn test_simulation_tick() {
        let mut sim = seeded(SimulationConfig::default());
        let report = sim.step().unwrap();

        assert_eq!(report.tick, 1);
        assert_eq!(report.alive, 30);
        assert_eq!(report.dead, 0);
        assert!(report.reproduction.is_none());
        assert_eq!(sim.tick(), 1);
    }

    #[test]
    fn test_population_size_is_invariant() {
        let mut sim = seeded(SimulationConfig {
            population: 12,
            reproduction_probability: 1.0,
            ..Default::default()
        });

        for _ in 0..2000 {
            sim.step();
            assert_eq!(sim.agents.len(), 12);
        }
        assert!(sim.stats().births > 0);
    }

    #[test]
    fn test_pause_freezes_state() {
        let mut sim = seeded(SimulationConfig::default());
        sim.run(5);

        sim.pause();
        let before: Vec<Point> = sim.agents.iter().map(|a| a.position()).collect();
        let energy: Vec<f64> = sim.agents.iter().map(|a| a.energy).collect();

        assert!(sim.step().is_none());
        assert_eq!(sim.run(10), 0);
        assert_eq!(sim.tick(), 5);
        assert_eq!(before, sim.agents.iter().map(|a| a.position()).collect::<Vec<_>>());
        assert_eq!(energy, sim.agents.iter().map(|a| a.energy).collect::<Vec<_>>());

        sim.resume();
        assert_eq!(sim.step().unwrap().tick, 6);
    }

    #[test]
    fn test_pause_resume_matches_uninterrupted_run() {
        let mut interrupted = seeded(SimulationConfig::default());
        let mut straight = seeded(SimulationConfig::default());

        interrupted.run(20);
        interrupted.pause();
        interrupted.run(20);
        interrupted.resume();
        interrupted.run(20);
        straight.run(40);

        for (a, b) in interrupted.agents.iter().zip(&straight.agents) {
            assert_eq!(a.path, b.path);
            assert_eq!(a.energy, b.energy);
            assert_eq!(a.generation, b.generation);
        }
    }

    #[test]
    fn test_dead_agents_form_the_batch() {
        let mut sim = seeded(SimulationConfig {
            population: 6,
            reproduction_probability: 0.0,
            ..Default::default()
        });
        for slot in [1, 3, 4] {
            sim.agents[slot].energy = 0.05;
        }

        let report = sim.step().unwrap();
        assert_eq!(report.dead, 3);
        assert_eq!(report.alive, 3);
        assert!(report.reproduction.is_none());
        assert_eq!(sim.agents[3].energy, 0.05);

        // Gate closed: they are still dead next tick.
        let report = sim.step().unwrap();
        assert_eq!(report.dead, 3);
    }

    #[test]
    fn test_small_batch_never_breeds() {
        let mut sim = seeded(SimulationConfig {
            population: 6,
            reproduction_probability: 1.0,
            ..Default::default()
        });
        for slot in [0, 2, 5] {
            sim.agents[slot].energy = 0.0;
        }

        for _ in 0..10 {
            let report = sim.step().unwrap();
            assert!(report.reproduction.is_none());
        }
    }

    #[test]
    fn test_open_gate_breeds_once_per_tick() {
        let mut sim = seeded(SimulationConfig {
            population: 8,
            reproduction_probability: 1.0,
            ..Default::default()
        });
        for (slot, fitness) in [(0, 0.3), (1, 0.1), (2, 0.9), (3, 0.2), (4, 0.5)] {
            sim.agents[slot].energy = 0.0;
            sim.agents[slot].fitness = fitness;
        }

        let report = sim.step().unwrap();
        let event = report.reproduction.unwrap();

        assert_eq!(report.dead, 5);
        assert_eq!(event.selection.parent1, 1);
        assert_eq!(event.selection.parent2, 3);
        assert_eq!(event.selection.child, 2);
        assert!(sim.agents[2].is_alive());
        assert_eq!(sim.agents[2].generation, 1);
        assert_eq!(sim.stats().dead, 4);
    }

    #[test]
    fn test_reconfigure_rebuilds_population() {
        let mut sim = seeded(SimulationConfig {
            reproduction_probability: 1.0,
            ..Default::default()
        });
        let first_run = sim.run_id();
        sim.run(3000);

        sim.reconfigure(50, 0.3, 0.8).unwrap();

        assert_eq!(sim.agents.len(), 50);
        assert_ne!(sim.run_id(), first_run);
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.stats().births, 0);
        assert_eq!(sim.config.mutation_rate, 0.3);
        assert_eq!(sim.config.elitism_bias, 0.8);
        for agent in &sim.agents {
            assert_eq!(agent.generation, 0);
            assert_eq!(agent.energy, agent.genome.initial_energy);
        }
    }

    #[test]
    fn test_invalid_reconfigure_keeps_state() {
        let mut sim = seeded(SimulationConfig::default());
        sim.run(10);
        let run_id = sim.run_id();

        assert!(sim.reconfigure(0, 0.1, 0.5).is_err());
        assert!(sim.reconfigure(10, -1.0, 0.5).is_err());
        assert!(sim.reconfigure(10, 0.1, 2.0).is_err());

        assert_eq!(sim.run_id(), run_id);
        assert_eq!(sim.agents.len(), 30);
        assert_eq!(sim.tick(), 10);
    }

    #[test]
    fn test_stats_and_snapshot() {
        let mut sim = seeded(SimulationConfig::default());
        sim.run(10);

        let snapshot = sim.snapshot();
        let best = sim
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.fitness)
            .fold(f64::INFINITY, f64::min);

        assert_eq!(snapshot.run_id, sim.run_id());
        assert_eq!(snapshot.tick, 10);
        assert_eq!(snapshot.agents.len(), 30);
        assert_eq!(snapshot.stats.alive + snapshot.stats.dead, 30);
        assert!(snapshot.stats.best_fitness <= best);
        assert!(snapshot.stats.best_fitness_ever <= snapshot.stats.best_fitness);
        assert!(snapshot.stats.average_fitness >= snapshot.stats.best_fitness_ever);
        for (agent, view) in sim.agents.iter().zip(&snapshot.agents) {
            assert_eq!(view.position, agent.position());
            assert_eq!(view.path[0], view.position);
        }
    }

    #[test]
    fn test_scripted_random_source() {
        // A constant draw never fires yaw (p <= 0.5) and never opens the gate.
        let mut sim = Simulation::new(SimulationConfig::default(), ScriptedRandom::constant(0.99)).unwrap();
        let report = sim.step().unwrap();
        assert_eq!(report.alive, 30);
        assert!(report.reproduction.is_none());
    }

    #[test]
    fn test_tail_animation_can_be_disabled() {
        let mut sim = seeded(SimulationConfig {
            animate_tail: false,
            ..Default::default()
        });
        let tails: Vec<_> = sim.agents.iter().map(|a| a.path[1..].to_vec()).collect();

        sim.run(5);

        for (agent, tail) in sim.agents.iter().zip(tails) {
            assert_eq!(agent.path[1..].to_vec(), tail);
            assert_eq!(agent.wave_phase, 0.0);
        }
    }
}
