use crate::arena::Arena;
use crate::fitness;
use shared::{AgentSnapshot, Genome, Point, RandomSource, PATH_LENGTH};

/// Agents at or below this much energy are dead.
pub const DEATH_THRESHOLD: f64 = 0.1;

/// Number of distinct cosmetic tags handed out to renderers.
pub const DISPLAY_TAGS: u32 = 20;

/// One slot in the population: a genome plus its kinematic state.
///
/// Slots are never removed. Reproduction overwrites a dead slot in place via
/// [`Agent::rebirth`].
#[derive(Debug, Clone)]
pub struct Agent {
    pub genome: Genome,
    pub velocity: Point,
    /// Head at index 0, trailing tail after it
    pub path: [Point; PATH_LENGTH],
    pub energy: f64,
    pub fitness: f64,
    pub generation: u32,
    pub display_tag: u32,
    /// Where this slot was last born
    pub birthplace: Point,
    /// Head movement applied in the latest tick
    pub displacement: Point,
    /// Running phase of the tail wave
    pub wave_phase: f64,
}

impl Agent {
    /// Create a new generation-zero agent at `position`
    pub fn new(genome: Genome, position: Point, arena: &Arena, display_tag: u32) -> Self {
        let mut agent = Self {
            velocity: Point::default(),
            path: [position; PATH_LENGTH],
            energy: genome.initial_energy,
            fitness: 0.0,
            generation: 0,
            display_tag,
            birthplace: position,
            displacement: Point::default(),
            wave_phase: 0.0,
            genome,
        };
        agent.reset_body(position, arena);
        agent
    }

    /// Create an agent with a random genome near the start edge
    pub fn random<R: RandomSource + ?Sized>(arena: &Arena, rng: &mut R) -> Self {
        let genome = Genome::random(rng);
        let position = arena.spawn_point(rng);
        let display_tag = random_display_tag(rng);
        Self::new(genome, position, arena, display_tag)
    }

    /// Replace this slot's contents with a newborn of the next generation
    pub fn rebirth(&mut self, genome: Genome, position: Point, arena: &Arena, display_tag: u32) {
        self.genome = genome;
        self.generation += 1;
        self.display_tag = display_tag;
        self.reset_body(position, arena);
    }

    fn reset_body(&mut self, position: Point, arena: &Arena) {
        self.path = [position; PATH_LENGTH];
        self.birthplace = position;
        self.velocity = Point::new(
            self.genome.initial_forward_velocity(),
            self.genome.initial_lateral_velocity,
        );
        self.energy = self.genome.initial_energy;
        self.displacement = Point::default();
        self.wave_phase = 0.0;
        self.fitness = fitness::evaluate(arena, position);
    }

    /// Head location
    pub fn position(&self) -> Point {
        self.path[0]
    }

    pub fn is_alive(&self) -> bool {
        self.energy > DEATH_THRESHOLD
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.position(),
            velocity: self.velocity,
            path: self.path.to_vec(),
            fitness: self.fitness,
            generation: self.generation,
            energy: self.energy,
            display_tag: self.display_tag,
            alive: self.is_alive(),
            genome: self.genome.clone(),
        }
    }
}

pub fn random_display_tag<R: RandomSource + ?Sized>(rng: &mut R) -> u32 {
    ((rng.uniform() * DISPLAY_TAGS as f64) as u32).min(DISPLAY_TAGS - 1)
}
