//! Pluggable randomness for level generation
//!
//! The generator only ever asks for uniform samples, so any `rand::Rng`
//! works and tests can replay exact sequences with [`ScriptedRandom`].

/// Source of uniform samples in [0, 1)
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// Uniform sample in [lo, hi)
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.unit()
    }

    /// Bernoulli trial with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of unit samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always returns the same sample
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 0.999_999)
    }
}
