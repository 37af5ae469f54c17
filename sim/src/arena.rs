use crate::error::{Result, SimError};
use shared::{ArenaSnapshot, Point, RandomSource};

/// Swimmers whose head gets this close to the bottom edge inside the goal
/// opening are captured.
pub const GOAL_DEPTH: f64 = 10.0;

/// Vertical band of the inner wall, exclusive on both ends.
pub const CORRIDOR_TOP: f64 = 195.0;
pub const CORRIDOR_BOTTOM: f64 = 205.0;

/// Where the inner wall is drawn.
pub const CORRIDOR_Y: f64 = 200.0;

/// Rectangular arena with an inner wall that funnels swimmers along the top
/// half and into a goal opening at the bottom right.
///
/// ```text
/// (0,0) +------------------------------+ (width,0)
///       | start                        |
///       |--------- inner wall ---+     |
///       |                        |     |
///       +------------------------+-----+ (width,height)
///                                  goal
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    /// Width of the opening on the right that leads down to the goal
    pub target_tunnel_width: f64,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            target_tunnel_width: 100.0,
        }
    }
}

impl Arena {
    /// Create an arena with specified dimensions
    pub fn new(width: f64, height: f64, target_tunnel_width: f64) -> Result<Self> {
        let arena = Self {
            width,
            height,
            target_tunnel_width,
        };
        arena.validate()?;
        Ok(arena)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(SimError::invalid("arena.width", "must be positive"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(SimError::invalid("arena.height", "must be positive"));
        }
        if !(self.target_tunnel_width > 0.0 && self.target_tunnel_width < self.width) {
            return Err(SimError::invalid(
                "arena.target_tunnel_width",
                format!("must be in (0, {})", self.width),
            ));
        }
        Ok(())
    }

    /// Left edge of the goal opening; the inner wall ends here
    pub fn tunnel_left(&self) -> f64 {
        self.width - self.target_tunnel_width
    }

    /// The point fitness is measured against
    pub fn goal(&self) -> Point {
        Point::new(self.width - self.target_tunnel_width / 2.0, self.height)
    }

    pub fn is_in_goal(&self, head: Point) -> bool {
        head.y > self.height - GOAL_DEPTH && head.x > self.tunnel_left()
    }

    /// Point velocity back inside when the head has crossed an outer wall.
    pub fn reflect_walls(&self, head: Point, velocity: &mut Point) {
        if head.x < 0.0 {
            velocity.x = velocity.x.abs();
        } else if head.x > self.width {
            velocity.x = -velocity.x.abs();
        }

        if head.y < 0.0 {
            velocity.y = velocity.y.abs();
        } else if head.y > self.height {
            velocity.y = -velocity.y.abs();
        }
    }

    /// One-sided inner wall left of the tunnel.
    ///
    /// Inside the wall band the swimmer is pushed back up; anything that got
    /// below it is pushed right toward the tunnel.
    pub fn apply_corridor(&self, head: Point, velocity: &mut Point) {
        if head.x >= self.tunnel_left() {
            return;
        }
        if head.y > CORRIDOR_TOP && head.y < CORRIDOR_BOTTOM {
            velocity.y = -velocity.y.abs();
        } else if head.y >= CORRIDOR_BOTTOM {
            velocity.x = velocity.x.abs();
        }
    }

    /// Birthplace for a member of a freshly built population
    pub fn spawn_point<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Point {
        let x = rng.uniform() * 10.0 + 10.0;
        let y = rng.uniform() * 150.0 + 10.0;
        Point::new(x, y)
    }

    /// Birthplace for a reborn swimmer that does not inherit a parent's spot
    pub fn rebirth_point<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Point {
        let x = rng.uniform() * 10.0 + 1.0;
        let y = rng.uniform() * 50.0 + 10.0;
        Point::new(x, y)
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            width: self.width,
            height: self.height,
            target_tunnel_width: self.target_tunnel_width,
            corridor_y: CORRIDOR_Y,
        }
    }
}
