//! Configuration for a game session.

use chrono::TimeDelta;
use rr_core::RevolverConfig;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Revolver size, load range, and RNG seed.
    pub revolver: RevolverConfig,
    /// Health each player starts with.
    pub starting_health: u32,
    /// Health lost to a live round.
    pub damage_per_round: u32,
    /// Seconds each turn may take before the timeout policy applies.
    pub turn_budget_secs: Option<u32>,
    /// Reload with a fresh random load once every live round is spent.
    pub reload_when_empty: bool,
    /// A player who survives a blank aimed at themselves goes again.
    pub blank_self_shot_keeps_turn: bool,
    /// Maximum event log size (0 = unlimited).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            revolver: RevolverConfig::default(),
            starting_health: 1,
            damage_per_round: 1,
            turn_budget_secs: None,
            reload_when_empty: true,
            blank_self_shot_keeps_turn: true,
            max_events: 0,
        }
    }
}

impl GameConfig {
    /// Set the revolver configuration.
    pub fn with_revolver(mut self, revolver: RevolverConfig) -> Self {
        self.revolver = revolver;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.revolver.seed = seed;
        self
    }

    /// Set the starting health (at least 1).
    pub fn with_starting_health(mut self, health: u32) -> Self {
        self.starting_health = health.max(1);
        self
    }

    /// Set the damage dealt by a live round (at least 1).
    pub fn with_damage_per_round(mut self, damage: u32) -> Self {
        self.damage_per_round = damage.max(1);
        self
    }

    /// Set the per-turn time budget in seconds.
    pub fn with_turn_budget_secs(mut self, secs: u32) -> Self {
        self.turn_budget_secs = Some(secs);
        self
    }

    /// Enable or disable the automatic reload of an empty cylinder.
    pub fn with_reload_when_empty(mut self, enabled: bool) -> Self {
        self.reload_when_empty = enabled;
        self
    }

    /// Enable or disable the extra turn after a blank self-shot.
    pub fn with_blank_self_shot_keeps_turn(mut self, enabled: bool) -> Self {
        self.blank_self_shot_keeps_turn = enabled;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// The per-turn time budget.
    pub fn turn_budget(&self) -> Option<TimeDelta> {
        self.turn_budget_secs
            .map(|secs| TimeDelta::seconds(i64::from(secs)))
    }

    /// Reject settings that would make a game impossible to play.
    pub fn validate(&self) -> GameResult<()> {
        self.revolver.validate()?;
        if self.starting_health == 0 || self.damage_per_round == 0 {
            return Err(GameError::InvalidHealth);
        }
        Ok(())
    }
}
