//! Revolver state machine for Revolver Roulette.
//!
//! Provides the chamber cylinder, random load generation, and the firing
//! engine that resolves trigger pulls, spins, and reloads. Randomness comes
//! from a seeded generator owned by each [`Revolver`], so a game is fully
//! reproducible from its seed.

pub mod config;
pub mod cylinder;
pub mod error;
pub mod load;
pub mod observer;
pub mod revolver;

pub use config::RevolverConfig;
pub use cylinder::Cylinder;
pub use error::{RevolverError, RevolverResult};
pub use load::{LoadRange, generate_bullet_positions};
pub use observer::{FireReport, RevolverObserver};
pub use revolver::{FireOutcome, Revolver};
