//! The decision contract for computer-controlled players.
//!
//! The game only relies on [`DecisionPolicy`]: pick a target given how many
//! chambers are left, and watch what other players do. How a policy updates
//! its internal state is its own business.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::player::Target;

/// A strategy that chooses shots for a player.
pub trait DecisionPolicy: std::fmt::Debug {
    /// Short name for display.
    fn name(&self) -> &str;

    /// Choose who to shoot this turn.
    fn decide_target(&mut self, chambers_left: usize) -> Target;

    /// Notification that another player fired at `target`.
    ///
    /// `self_shot_last_turn` tells the observer whether its own previous shot
    /// was aimed at itself.
    fn observe_player_action(
        &mut self,
        _target: Target,
        _chambers_left: usize,
        _self_shot_last_turn: bool,
    ) {
    }

    /// A snapshot of the policy's mood, if it has one.
    fn temperament(&self) -> Option<Temperament> {
        None
    }
}

/// Always shoots at the same target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub Target);

impl DecisionPolicy for FixedPolicy {
    fn name(&self) -> &str {
        "fixed"
    }

    fn decide_target(&mut self, _chambers_left: usize) -> Target {
        self.0
    }
}

/// Mood values driving [`TemperamentPolicy`], each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperament {
    /// How much the player believes opponents' choices signal a safe chamber.
    pub trust: f64,
    /// Willingness to aim at an opponent.
    pub aggression: f64,
    /// Aversion to risk as the cylinder runs down.
    pub fear: f64,
    /// Belief that the next chamber is empty.
    pub confidence: f64,
}

impl Default for Temperament {
    fn default() -> Self {
        Self {
            trust: 0.5,
            aggression: 0.5,
            fear: 0.3,
            confidence: 0.5,
        }
    }
}

impl Temperament {
    fn clamp(&mut self) {
        self.trust = self.trust.clamp(0.0, 1.0);
        self.aggression = self.aggression.clamp(0.0, 1.0);
        self.fear = self.fear.clamp(0.0, 1.0);
        self.confidence = self.confidence.clamp(0.0, 1.0);
    }
}

/// A reference policy that weighs its temperament against the odds.
#[derive(Debug, Clone)]
pub struct TemperamentPolicy {
    mood: Temperament,
    rng: StdRng,
}

impl TemperamentPolicy {
    /// Create a policy with a default temperament.
    pub fn new(seed: u64) -> Self {
        Self::with_temperament(Temperament::default(), seed)
    }

    /// Create a policy with the given temperament.
    pub fn with_temperament(mut mood: Temperament, seed: u64) -> Self {
        mood.clamp();
        Self {
            mood,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Probability of aiming at itself with `chambers_left` chambers to go.
    pub fn self_shot_probability(&self, chambers_left: usize) -> f64 {
        let danger = 1.0 / chambers_left.max(1) as f64;
        let m = &self.mood;
        let p = 0.5 + 0.3 * (m.confidence - m.aggression) + 0.2 * (m.trust - 0.5)
            - 0.6 * m.fear * danger;
        p.clamp(0.05, 0.95)
    }
}

impl DecisionPolicy for TemperamentPolicy {
    fn name(&self) -> &str {
        "temperament"
    }

    fn decide_target(&mut self, chambers_left: usize) -> Target {
        let p = self.self_shot_probability(chambers_left);
        if self.rng.random_bool(p) {
            Target::Myself
        } else {
            Target::Opponent
        }
    }

    fn observe_player_action(
        &mut self,
        target: Target,
        chambers_left: usize,
        self_shot_last_turn: bool,
    ) {
        let m = &mut self.mood;
        match target {
            Target::Opponent => {
                m.aggression += 0.1;
                m.trust -= 0.1;
            }
            Target::Myself => {
                m.trust += 0.05;
                m.confidence += 0.05;
            }
        }
        if chambers_left <= 2 {
            m.fear += 0.1;
        } else {
            m.fear -= 0.05;
        }
        if self_shot_last_turn {
            m.confidence += 0.1;
        } else {
            m.confidence -= 0.05;
        }
        m.clamp();
    }

    fn temperament(&self) -> Option<Temperament> {
        Some(self.mood)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_is_fixed() {
        let mut p = FixedPolicy(Target::Myself);
        for left in 0..6 {
            assert_eq!(p.decide_target(left), Target::Myself);
        }
        assert!(p.temperament().is_none());
    }

    #[test]
    fn temperament_clamped_on_creation() {
        let wild = Temperament {
            trust: 2.0,
            aggression: -1.0,
            fear: 0.5,
            confidence: 7.0,
        };
        let p = TemperamentPolicy::with_temperament(wild, 1);
        let m = p.temperament().unwrap();
        assert_eq!(m.trust, 1.0);
        assert_eq!(m.aggression, 0.0);
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn fear_grows_as_cylinder_runs_down() {
        let mut p = TemperamentPolicy::new(1);
        let before = p.temperament().unwrap().fear;
        p.observe_player_action(Target::Myself, 1, false);
        assert!(p.temperament().unwrap().fear > before);
    }

    #[test]
    fn being_targeted_raises_aggression() {
        let mut p = TemperamentPolicy::new(1);
        let before = p.temperament().unwrap();
        p.observe_player_action(Target::Opponent, 5, true);
        let after = p.temperament().unwrap();
        assert!(after.aggression > before.aggression);
        assert!(after.trust < before.trust);
        assert!(after.confidence > before.confidence);
    }

    #[test]
    fn probability_stays_bounded() {
        let reckless = Temperament {
            trust: 0.0,
            aggression: 1.0,
            fear: 1.0,
            confidence: 0.0,
        };
        let p = TemperamentPolicy::with_temperament(reckless, 1);
        assert_eq!(p.self_shot_probability(1), 0.05);
        assert_eq!(p.self_shot_probability(0), 0.05);
    }

    #[test]
    fn aggressive_policy_mostly_aims_out() {
        let reckless = Temperament {
            trust: 0.0,
            aggression: 1.0,
            fear: 1.0,
            confidence: 0.0,
        };
        let mut p = TemperamentPolicy::with_temperament(reckless, 3);
        let outward = (0..1000)
            .filter(|_| p.decide_target(2) == Target::Opponent)
            .count();
        assert!(outward > 900, "outward shots: {outward}");
    }

    #[test]
    fn same_seed_same_choices() {
        let mut a = TemperamentPolicy::new(77);
        let mut b = TemperamentPolicy::new(77);
        for left in (1..=6).rev() {
            assert_eq!(a.decide_target(left), b.decide_target(left));
        }
    }
}
