//! Presentation hooks.
//!
//! Sound, muzzle flash, and haptics live outside the core. They subscribe to
//! a [`crate::Revolver`] through [`RevolverObserver`] and are
//! called after each state transition has completed. Hooks return nothing, so
//! a failing presentation layer cannot roll back or block a shot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::revolver::FireOutcome;

/// What happened on a single trigger pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireReport {
    /// The chamber that was fired.
    pub chamber: usize,
    /// Whether a live round went off.
    pub outcome: FireOutcome,
    /// Live rounds left in the cylinder after the shot.
    pub live_remaining: usize,
}

/// A listener for revolver events. All methods default to doing nothing.
pub trait RevolverObserver: std::fmt::Debug {
    /// Called after every trigger pull.
    fn on_fire(&mut self, _report: &FireReport) {}

    /// Called after the cylinder is spun.
    fn on_spin(&mut self, _chamber: usize) {}

    /// Called after the cylinder is reloaded.
    fn on_reload(&mut self, _positions: &BTreeSet<usize>) {}
}
