use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal};

/// Seeded Gaussian noise source. A fixed seed makes a generated trace
/// reproducible across runs, which the property tests rely on.
pub struct NoiseSource {
    rng: StdRng,
    distribution: Normal<f64>,
}

impl NoiseSource {
    pub fn gaussian(sd_mv: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            distribution: Normal::new(0.0, sd_mv)
                .expect("noise standard deviation must be finite and non-negative"),
        }
    }

    pub fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}
