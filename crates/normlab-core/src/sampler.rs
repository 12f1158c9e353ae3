//! Seeded normal variate generator.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::SimulationError;

/// Draws normal variates from a deterministic, seeded PRNG.
///
/// Two samplers built with the same seed and parameters produce the same
/// sequence regardless of how the draws are split into batches.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    normal: Normal<f64>,
}

impl Sampler {
    pub fn new(mean: f64, std_dev: f64, seed: u64) -> Result<Self, SimulationError> {
        let normal =
            Normal::new(mean, std_dev).map_err(|e| SimulationError::Sampling(e.to_string()))?;
        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            normal,
        })
    }

    /// Draw `count` variates.
    pub fn draw(&mut self, count: usize) -> Vec<f64> {
        let mut out = Vec::with_capacity(count);
        self.draw_into(&mut out, count);
        out
    }

    /// Append `count` variates to `out`.
    pub fn draw_into(&mut self, out: &mut Vec<f64>, count: usize) {
        out.reserve(count);
        for _ in 0..count {
            out.push(self.normal.sample(&mut self.rng));
        }
    }
}
