//! Configuration for a revolver.

use serde::{Deserialize, Serialize};

use crate::error::RevolverResult;
use crate::load::LoadRange;

/// Configuration for a revolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevolverConfig {
    /// Number of chambers in the cylinder.
    pub chambers: usize,
    /// Fewest live rounds a random load may contain.
    pub min_live: usize,
    /// Most live rounds a random load may contain.
    pub max_live: usize,
    /// RNG seed for reproducible loads and spins.
    pub seed: u64,
}

impl Default for RevolverConfig {
    fn default() -> Self {
        Self {
            chambers: 6,
            min_live: 1,
            max_live: 3,
            seed: 42,
        }
    }
}

impl RevolverConfig {
    /// Set the number of chambers.
    pub fn with_chambers(mut self, chambers: usize) -> Self {
        self.chambers = chambers;
        self
    }

    /// Set the live-round range used for random loads.
    pub fn with_live_range(mut self, min: usize, max: usize) -> Self {
        self.min_live = min;
        self.max_live = max;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration and return the validated load range.
    pub fn validate(&self) -> RevolverResult<LoadRange> {
        LoadRange::new(self.min_live, self.max_live, self.chambers)
    }
}
