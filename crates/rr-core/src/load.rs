//! Random load generation.
//!
//! A load picks how many live rounds go in (uniformly from a configured
//! range) and then which chambers hold them, rejecting repeated picks until
//! the set is full.

use std::collections::BTreeSet;

use rand::Rng;

use crate::error::{RevolverError, RevolverResult};

/// A validated range for the number of live rounds in a random load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRange {
    min: usize,
    max: usize,
    chambers: usize,
}

impl LoadRange {
    /// Validate a live-round range against a cylinder size.
    ///
    /// Both bounds must lie in `0..=chambers` and `min` must not exceed `max`.
    pub fn new(min: usize, max: usize, chambers: usize) -> RevolverResult<Self> {
        if chambers == 0 {
            return Err(RevolverError::InvalidChamberCount);
        }
        if min > max || max > chambers {
            return Err(RevolverError::InvalidLoadRange { min, max, chambers });
        }
        Ok(Self { min, max, chambers })
    }

    /// Fewest live rounds.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Most live rounds.
    pub fn max(&self) -> usize {
        self.max
    }

    /// Cylinder size the range was validated against.
    pub fn chambers(&self) -> usize {
        self.chambers
    }
}

/// Pick a random, duplicate-free set of live chamber positions.
pub fn generate_bullet_positions<R: Rng + ?Sized>(
    rng: &mut R,
    range: &LoadRange,
) -> BTreeSet<usize> {
    let count = rng.random_range(range.min..=range.max);
    let mut positions = BTreeSet::new();
    while positions.len() < count {
        positions.insert(rng.random_range(0..range.chambers));
    }
    positions
}
