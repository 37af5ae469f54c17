pub mod genes;
pub mod protocol;
pub mod random;

pub use genes::*;
pub use protocol::*;
pub use random::RandomSource;

/// Number of points in every agent's path (head plus trailing tail).
pub const PATH_LENGTH: usize = 10;
