use crate::agent::Agent;
use crate::arena::Arena;
use crate::fitness;
use shared::{Point, RandomSource};

/// Below this much energy a swimmer eases off instead of stopping dead.
pub const TIRED_ENERGY: f64 = 5.0;

/// What happened to an agent during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Already dead, nothing was touched
    Skipped,
    Moved,
    /// Reached the goal opening and was retired
    ReachedGoal,
}

/// Smoothstep `3r^2 - 2r^3` over `r = energy / TIRED_ENERGY`.
pub fn fatigue(energy: f64) -> f64 {
    if energy >= TIRED_ENERGY {
        return 1.0;
    }
    let r = (energy / TIRED_ENERGY).max(0.0);
    3.0 * r * r - 2.0 * r * r * r
}

/// Energy burned for moving `speed` units in one tick
pub fn energy_cost(speed: f64) -> f64 {
    speed.sqrt() * 0.05 + 0.01
}

/// Advance one agent by a single unit tick.
///
/// Only the head, velocity, energy and fitness change here. The trailing
/// path is left for [`crate::tail::follow_through`].
pub fn advance<R: RandomSource + ?Sized>(agent: &mut Agent, arena: &Arena, rng: &mut R) -> Advance {
    if !agent.is_alive() {
        return Advance::Skipped;
    }

    let genome = &agent.genome;

    // Speed comes from the genome, only the heading carries over.
    let length = agent.velocity.length();
    let heading = if length > 0.0 && length.is_finite() {
        agent.velocity * (1.0 / length)
    } else {
        Point::new(1.0, 0.0)
    };
    let mut velocity = heading * genome.tail_strength;

    if rng.uniform() < genome.yaw_probability {
        let theta = genome.yaw_range * rng.sign();
        velocity = velocity.rotate(theta);
    }

    let displacement = velocity * fatigue(agent.energy);
    let head = agent.path[0] + displacement;
    agent.path[0] = head;

    agent.energy -= energy_cost(displacement.length());

    arena.reflect_walls(head, &mut velocity);

    let mut outcome = Advance::Moved;
    if arena.is_in_goal(head) {
        agent.energy = 0.0;
        outcome = Advance::ReachedGoal;
    }

    arena.apply_corridor(head, &mut velocity);

    agent.velocity = velocity;
    agent.displacement = displacement;
    agent.fitness = fitness::evaluate(arena, head);

    outcome
}
