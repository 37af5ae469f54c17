use crate::RandomSource;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Closed interval a gene value is clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneBounds {
    pub lo: f64,
    pub hi: f64,
}

impl GeneBounds {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.lo {
            self.lo
        } else if value > self.hi {
            self.hi
        } else {
            value
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo && value <= self.hi
    }

    /// Uniform sample inside the interval.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.range(self.lo, self.hi)
    }
}

pub const TAIL_STRENGTH: GeneBounds = GeneBounds::new(1.0, 50.0);
pub const INITIAL_ENERGY: GeneBounds = GeneBounds::new(10.0, 25.0);
pub const YAW_PROBABILITY: GeneBounds = GeneBounds::new(0.0, 0.5);
pub const YAW_RANGE: GeneBounds = GeneBounds::new(0.01 / (2.0 * PI), 45.0 / (2.0 * PI));

/// Bounds for the lateral velocity gene, which depend on the yaw range.
pub fn lateral_velocity_bounds(yaw_range: f64) -> GeneBounds {
    GeneBounds::new(-yaw_range, yaw_range)
}

/// Multiplicative jitter proportional to the current value, then a hard clamp.
///
/// `v + v * (u - 0.5) * rate` with `u` uniform in `[0, 1)`. A value of zero
/// can therefore never drift away from zero on its own.
pub fn mutate_value<R: RandomSource + ?Sized>(
    value: f64,
    mutation_rate: f64,
    bounds: GeneBounds,
    rng: &mut R,
) -> f64 {
    bounds.clamp(value + value * (rng.uniform() - 0.5) * mutation_rate)
}

/// The heritable parameter set of one swimmer.
///
/// Fields only change through reproduction (crossover plus mutation); the
/// kinematics engine reads them but never writes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genome {
    /// Scales top speed and initial forward velocity
    pub tail_strength: f64,

    /// Energy budget assigned at birth
    pub initial_energy: f64,

    /// Per-tick probability of a random heading change
    pub yaw_probability: f64,

    /// Magnitude (radians) of a heading change
    pub yaw_range: f64,

    /// Lateral velocity at birth, within +/- yaw_range
    pub initial_lateral_velocity: f64,
}

impl Genome {
    /// Create a new random genome, uniform within every gene's bounds
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let tail_strength = TAIL_STRENGTH.sample(rng);
        let initial_energy = INITIAL_ENERGY.sample(rng);
        let yaw_probability = YAW_PROBABILITY.sample(rng);
        let yaw_range = YAW_RANGE.sample(rng);
        let initial_lateral_velocity = rng.uniform() * yaw_range * rng.sign();

        Self {
            tail_strength,
            initial_energy,
            yaw_probability,
            yaw_range,
            initial_lateral_velocity,
        }
    }

    /// Create a genome with specific values (clamped to each gene's bounds)
    pub fn new(
        tail_strength: f64,
        initial_energy: f64,
        yaw_probability: f64,
        yaw_range: f64,
        initial_lateral_velocity: f64,
    ) -> Self {
        let yaw_range = YAW_RANGE.clamp(yaw_range);
        Self {
            tail_strength: TAIL_STRENGTH.clamp(tail_strength),
            initial_energy: INITIAL_ENERGY.clamp(initial_energy),
            yaw_probability: YAW_PROBABILITY.clamp(yaw_probability),
            yaw_range,
            initial_lateral_velocity: lateral_velocity_bounds(yaw_range)
                .clamp(initial_lateral_velocity),
        }
    }

    /// Uniform crossover: every gene flips its own coin.
    ///
    /// A gene is copied from `self` when the draw is below `elitism_bias`,
    /// otherwise from `other`.
    pub fn crossover<R: RandomSource + ?Sized>(
        &self,
        other: &Genome,
        elitism_bias: f64,
        rng: &mut R,
    ) -> Genome {
        let mut pick = |a: f64, b: f64| if rng.uniform() < elitism_bias { a } else { b };

        Genome {
            tail_strength: pick(self.tail_strength, other.tail_strength),
            initial_energy: pick(self.initial_energy, other.initial_energy),
            yaw_probability: pick(self.yaw_probability, other.yaw_probability),
            yaw_range: pick(self.yaw_range, other.yaw_range),
            initial_lateral_velocity: pick(
                self.initial_lateral_velocity,
                other.initial_lateral_velocity,
            ),
        }
    }

    /// Jitter every gene and clamp it back into range.
    ///
    /// The lateral velocity is clamped against the already-mutated yaw range.
    pub fn mutate<R: RandomSource + ?Sized>(&mut self, mutation_rate: f64, rng: &mut R) {
        self.tail_strength = mutate_value(self.tail_strength, mutation_rate, TAIL_STRENGTH, rng);
        self.initial_energy =
            mutate_value(self.initial_energy, mutation_rate, INITIAL_ENERGY, rng);
        self.yaw_probability =
            mutate_value(self.yaw_probability, mutation_rate, YAW_PROBABILITY, rng);
        self.yaw_range = mutate_value(self.yaw_range, mutation_rate, YAW_RANGE, rng);
        self.initial_lateral_velocity = mutate_value(
            self.initial_lateral_velocity,
            mutation_rate,
            lateral_velocity_bounds(self.yaw_range),
            rng,
        );
    }

    /// Forward velocity a freshly born swimmer starts with
    pub fn initial_forward_velocity(&self) -> f64 {
        self.tail_strength * 0.2
    }

    pub fn is_within_bounds(&self) -> bool {
        TAIL_STRENGTH.contains(self.tail_strength)
            && INITIAL_ENERGY.contains(self.initial_energy)
            && YAW_PROBABILITY.contains(self.yaw_probability)
            && YAW_RANGE.contains(self.yaw_range)
            && lateral_velocity_bounds(self.yaw_range).contains(self.initial_lateral_velocity)
    }
}

impl Default for Genome {
    fn default() -> Self {
        Self {
            tail_strength: 3.0,
            initial_energy: 15.0,
            yaw_probability: 0.05,
            yaw_range: 1.0 / (2.0 * PI),
            initial_lateral_velocity: 0.0,
        }
    }
}
