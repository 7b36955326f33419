//! The chamber cylinder: a fixed ring of chambers with a firing pointer.
//!
//! The cylinder is pure data plus index arithmetic. Only the load and fire
//! paths of [`crate::Revolver`] mutate it; everything outside the crate sees
//! read-only accessors.

use std::collections::BTreeSet;

use crate::error::{RevolverError, RevolverResult};

/// A ring of chambers, the current firing position, and the live rounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cylinder {
    chambers: usize,
    current: usize,
    live: BTreeSet<usize>,
    fired_since_reload: usize,
}

impl Cylinder {
    /// Create an empty cylinder with the pointer at chamber 0.
    pub fn new(chambers: usize) -> RevolverResult<Self> {
        if chambers == 0 {
            return Err(RevolverError::InvalidChamberCount);
        }
        Ok(Self {
            chambers,
            current: 0,
            live: BTreeSet::new(),
            fired_since_reload: 0,
        })
    }

    /// The chamber that will be fired next.
    pub fn current_chamber(&self) -> usize {
        self.current
    }

    /// Number of chambers in the cylinder.
    pub fn max_chambers(&self) -> usize {
        self.chambers
    }

    /// Chambers currently holding a live round.
    pub fn bullet_positions(&self) -> &BTreeSet<usize> {
        &self.live
    }

    /// Number of live rounds still loaded.
    pub fn live_remaining(&self) -> usize {
        self.live.len()
    }

    /// Whether the given chamber holds a live round.
    pub fn is_live(&self, position: usize) -> bool {
        self.live.contains(&position)
    }

    /// Chambers not yet fired since the last reload.
    ///
    /// Both players can count this, which is what makes the game one of
    /// inferable information.
    pub fn chambers_left(&self) -> usize {
        self.chambers.saturating_sub(self.fired_since_reload)
    }

    /// Check a proposed load without applying it.
    pub fn validate_positions(
        &self,
        positions: impl IntoIterator<Item = usize>,
    ) -> RevolverResult<BTreeSet<usize>> {
        let mut live = BTreeSet::new();
        for position in positions {
            if position >= self.chambers {
                return Err(RevolverError::PositionOutOfRange {
                    position,
                    chambers: self.chambers,
                });
            }
            if !live.insert(position) {
                return Err(RevolverError::DuplicatePosition(position));
            }
        }
        Ok(live)
    }

    pub(crate) fn advance(&mut self) {
        self.current = (self.current + 1) % self.chambers;
        self.fired_since_reload += 1;
    }

    pub(crate) fn remove_live_at(&mut self, position: usize) {
        self.live.remove(&position);
    }

    pub(crate) fn set_current(&mut self, position: usize) {
        self.current = position % self.chambers;
    }

    /// Replace the live set and close the cylinder at chamber 0.
    pub(crate) fn install(&mut self, live: BTreeSet<usize>) {
        self.live = live;
        self.current = 0;
        self.fired_since_reload = 0;
    }
}
