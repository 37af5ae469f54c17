use rand::Rng;

/// Source of randomness for everything the simulation decides by chance.
///
/// Every `rand::Rng` is a `RandomSource`, so production code can hand in
/// `StdRng::from_entropy()` while tests use a seeded generator or a scripted
/// sequence.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn uniform(&mut self) -> f64;

    /// `+1.0` or `-1.0` with equal probability.
    fn sign(&mut self) -> f64 {
        if self.uniform() >= 0.5 {
            1.0
        } else {
            -1.0
        }
    }

    /// Uniform sample in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.uniform() * (hi - lo)
    }
}

impl<R: Rng> RandomSource for R {
    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Handy for pinning down exactly which branch a coin flip takes.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "scripted sequence needs at least one value");
        Self { values, cursor: 0 }
    }

    /// A source that always returns the same sample.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// How many samples have been drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self) -> f64 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
