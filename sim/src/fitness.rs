use crate::arena::Arena;
use shared::Point;

/// Distances are divided by this so fitness stays around `[0, 1]`.
pub const FITNESS_SCALE: f64 = 800.0;

/// Normalized distance from the head to the goal point; lower is better.
pub fn evaluate(arena: &Arena, head: Point) -> f64 {
    head.distance(arena.goal()) / FITNESS_SCALE
}
