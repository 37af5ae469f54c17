use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::{Point, PATH_LENGTH};
use sim::agent::DEATH_THRESHOLD;
use sim::fitness;
use sim::{Arena, Simulation, SimulationConfig};

fn busy_config(population: usize) -> SimulationConfig {
    SimulationConfig {
        population,
        mutation_rate: 0.4,
        elitism_bias: 0.5,
        reproduction_probability: 1.0,
        ..Default::default()
    }
}

#[test]
fn genomes_stay_in_bounds_over_a_long_run() {
    let mut sim = Simulation::new(busy_config(20), StdRng::seed_from_u64(17)).unwrap();

    for _ in 0..5000 {
        sim.step();
        for agent in &sim.agents {
            assert!(agent.genome.is_within_bounds(), "{:?}", agent.genome);
            assert_eq!(agent.path.len(), PATH_LENGTH);
        }
    }

    assert!(sim.stats().births > 0);
    assert!(sim.stats().max_generation > 0);
}

#[test]
fn population_size_survives_steps_and_reconfigure() {
    let mut sim = Simulation::new(busy_config(25), StdRng::seed_from_u64(5)).unwrap();

    sim.run(1500);
    assert_eq!(sim.agents.len(), 25);
    assert_eq!(sim.snapshot().agents.len(), 25);

    sim.reconfigure(50, 0.2, 0.6).unwrap();
    assert_eq!(sim.agents.len(), 50);
    assert!(sim
        .agents
        .iter()
        .all(|a| a.generation == 0 && a.energy == a.genome.initial_energy));

    sim.run(1500);
    assert_eq!(sim.agents.len(), 50);
}

#[test]
fn only_live_agents_move() {
    let mut sim = Simulation::new(busy_config(10), StdRng::seed_from_u64(8)).unwrap();
    sim.config.reproduction_probability = 0.0;

    for _ in 0..800 {
        let before: Vec<(bool, Point)> = sim
            .agents
            .iter()
            .map(|a| (a.energy > DEATH_THRESHOLD, a.position()))
            .collect();

        sim.step();

        for ((was_alive, position), agent) in before.into_iter().zip(&sim.agents) {
            if !was_alive {
                assert_eq!(agent.position(), position);
            }
        }
    }

    // Without reproduction everyone eventually runs dry.
    assert_eq!(sim.stats().alive, 0);
}

#[test]
fn live_fitness_tracks_head_position() {
    let mut sim = Simulation::new(SimulationConfig::default(), StdRng::seed_from_u64(3)).unwrap();
    let arena = Arena::default();

    for _ in 0..50 {
        sim.step();
        for agent in sim.agents.iter().filter(|a| a.is_alive()) {
            assert_eq!(agent.fitness, fitness::evaluate(&arena, agent.position()));
        }
    }
}

#[test]
fn snapshot_is_detached_from_state() {
    let mut sim = Simulation::new(SimulationConfig::default(), StdRng::seed_from_u64(21)).unwrap();
    sim.run(5);

    let snapshot = sim.snapshot();
    sim.run(5);

    assert_eq!(snapshot.tick, 5);
    assert_ne!(snapshot.agents[0].position, sim.agents[0].position());
    assert_eq!(snapshot.arena.width, 800.0);
    assert_eq!(snapshot.arena.corridor_y, 200.0);
}

#[test]
fn seeded_runs_are_repeatable() {
    let mut a = Simulation::new(busy_config(15), StdRng::seed_from_u64(99)).unwrap();
    let mut b = Simulation::new(busy_config(15), StdRng::seed_from_u64(99)).unwrap();

    a.run(1000);
    b.run(1000);

    assert_eq!(a.stats(), b.stats());
    for (x, y) in a.agents.iter().zip(&b.agents) {
        assert_eq!(x.genome, y.genome);
        assert_eq!(x.path, y.path);
    }
}
