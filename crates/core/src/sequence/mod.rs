use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::ArrayConfig;

/// Produces the unsorted sequences each run starts from.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    min_value: u32,
    max_value: u32,
    rng: StdRng,
}

impl SequenceGenerator {
    pub fn from_entropy(config: &ArrayConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible generator, used for scripted runs and tests.
    pub fn with_seed(config: &ArrayConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &ArrayConfig, rng: StdRng) -> Self {
        let min_value = config.min_value.min(config.max_value);
        Self {
            min_value,
            max_value: config.max_value.max(min_value),
            rng,
        }
    }

    /// Largest value the generator can produce.
    pub fn ceiling(&self) -> u32 {
        self.max_value
    }

    /// Draws `len` values uniformly from the inclusive value range.
    pub fn generate(&mut self, len: usize) -> Vec<u32> {
        (0..len)
            .map(|_| self.rng.gen_range(self.min_value..=self.max_value))
            .collect()
    }
}
