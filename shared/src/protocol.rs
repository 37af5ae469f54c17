use crate::Genome;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};
use uuid::Uuid;

/// A 2-D point or vector in arena coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Heading angle in radians, for orienting a glyph
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Rotate counter-clockwise by `theta` radians
    pub fn rotate(&self, theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

/// Read-only view of one agent slot, published after every tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Head location
    pub position: Point,

    pub velocity: Point,

    /// Head at index 0, trailing tail after it
    pub path: Vec<Point>,

    /// Normalized distance to the goal, lower is better
    pub fitness: f64,

    /// How many times this slot has been reborn
    pub generation: u32,

    pub energy: f64,

    /// Cosmetic color index, meaningless to the simulation
    pub display_tag: u32,

    pub alive: bool,

    pub genome: Genome,
}

/// Geometry a renderer needs to draw the walls and the goal opening
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub width: f64,
    pub height: f64,
    pub target_tunnel_width: f64,
    /// Height of the inner wall that funnels swimmers toward the goal
    pub corridor_y: f64,
}

/// Aggregate statistics about the population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    /// Best fitness among the agents updated in the latest tick
    pub best_fitness: f64,

    /// Best fitness seen since the population was built
    pub best_fitness_ever: f64,

    /// Mean fitness over every slot, dead or alive
    pub average_fitness: f64,

    pub alive: usize,

    pub dead: usize,

    /// Successful reproduction events since the population was built
    pub births: u64,

    pub max_generation: u32,

    pub tick: u64,
}

/// Everything the renderer gets to see after a tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// Changes whenever the population is rebuilt
    pub run_id: Uuid,

    pub tick: u64,

    pub paused: bool,

    pub arena: ArenaSnapshot,

    pub agents: Vec<AgentSnapshot>,

    pub stats: SimulationStats,
}

/// Host -> Simulation: rebuild the population with new parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconfigureRequest {
    pub population: usize,
    pub mutation_rate: f64,
    pub elitism_bias: f64,
}

/// Simulation -> Host: state after a control command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub run_id: Uuid,
    pub paused: bool,
    pub tick: u64,
}

/// Error body returned by the host API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl PopulationSnapshot {
    pub fn population(&self) -> usize {
        self.agents.len()
    }
}
