//! Players and the turn-taking contract.
//!
//! A [`Player`] is a plain record (id, name, health, alive flag) plus an
//! optional [`DecisionPolicy`]. Players without a policy are driven by outside
//! input; players with one decide their own shots.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::DecisionPolicy;

/// Stable identifier for a player within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player #{}", self.0)
    }
}

/// Who a shot is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// The shooter.
    #[serde(rename = "self")]
    Myself,
    /// The next player still in the game.
    #[serde(rename = "opponent")]
    Opponent,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Myself => write!(f, "self"),
            Self::Opponent => write!(f, "opponent"),
        }
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "self" | "me" | "s" => Ok(Self::Myself),
            "opponent" | "them" | "o" => Ok(Self::Opponent),
            other => Err(format!("unknown target: {other}")),
        }
    }
}

/// What a player does when their turn begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnIntent {
    /// The player acts through outside input.
    AwaitInput,
    /// The player has decided to shoot at a target.
    Shoot(Target),
}

/// A participant in the game.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    health: u32,
    alive: bool,
    policy: Option<Box<dyn DecisionPolicy>>,
}

impl Player {
    /// Create a human-controlled player.
    ///
    /// Health starts at 1; a [`crate::GameSession`] sets it to the configured
    /// starting health when the player takes a seat.
    pub fn human(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            health: 1,
            alive: true,
            policy: None,
        }
    }

    /// Create a player that decides its own shots.
    pub fn ai<P: DecisionPolicy + 'static>(id: PlayerId, name: impl Into<String>, policy: P) -> Self {
        Self {
            policy: Some(Box::new(policy)),
            ..Self::human(id, name)
        }
    }

    pub(crate) fn reset_health(&mut self, health: u32) {
        if self.alive {
            self.health = health.max(1);
        }
    }

    /// The player's id.
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// The player's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Remaining health.
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Whether the player is still in the game.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the player is driven by outside input.
    pub fn is_human(&self) -> bool {
        self.policy.is_none()
    }

    /// The decision policy, if this player has one.
    pub fn policy(&self) -> Option<&dyn DecisionPolicy> {
        self.policy.as_deref()
    }

    /// Begin this player's turn.
    pub fn take_turn(&mut self, chambers_left: usize) -> TurnIntent {
        match &mut self.policy {
            Some(policy) => TurnIntent::Shoot(policy.decide_target(chambers_left)),
            None => TurnIntent::AwaitInput,
        }
    }

    /// Pass an observed shot on to the decision policy.
    pub fn observe(&mut self, target: Target, chambers_left: usize, self_shot_last_turn: bool) {
        if let Some(policy) = &mut self.policy {
            policy.observe_player_action(target, chambers_left, self_shot_last_turn);
        }
    }

    /// Take damage. Returns true if this eliminated the player.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.eliminate()
        } else {
            false
        }
    }

    /// Remove the player from the game. Returns false if already eliminated.
    pub fn eliminate(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.health = 0;
        info!(player = %self.id, name = %self.name, "eliminated");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::FixedPolicy;

    #[test]
    fn human_awaits_input() {
        let mut p = Player::human(PlayerId(1), "Alice");
        assert!(p.is_human());
        assert_eq!(p.take_turn(6), TurnIntent::AwaitInput);
    }

    #[test]
    fn ai_decides() {
        let mut p = Player::ai(PlayerId(2), "Dealer", FixedPolicy(Target::Opponent));
        assert!(!p.is_human());
        assert_eq!(p.take_turn(6), TurnIntent::Shoot(Target::Opponent));
        assert_eq!(p.policy().map(|policy| policy.name()), Some("fixed"));
    }

    #[test]
    fn damage_eliminates_at_zero() {
        let mut p = Player::human(PlayerId(1), "Alice");
        p.reset_health(2);
        assert!(!p.take_damage(1));
        assert!(p.is_alive());
        assert_eq!(p.health(), 1);
        assert!(p.take_damage(5));
        assert!(!p.is_alive());
        assert_eq!(p.health(), 0);
    }

    #[test]
    fn elimination_is_idempotent() {
        let mut p = Player::human(PlayerId(1), "Alice");
        p.reset_health(3);
        assert!(p.eliminate());
        assert!(!p.eliminate());
        assert!(!p.take_damage(1));
        assert!(!p.is_alive());
    }

    #[test]
    fn target_parsing() {
        assert_eq!("self".parse::<Target>(), Ok(Target::Myself));
        assert_eq!(" O ".parse::<Target>(), Ok(Target::Opponent));
        assert!("dealer".parse::<Target>().is_err());
    }

    #[test]
    fn target_serde_names() {
        assert_eq!(serde_json::to_string(&Target::Myself).unwrap(), "\"self\"");
        let t: Target = serde_json::from_str("\"opponent\"").unwrap();
        assert_eq!(t, Target::Opponent);
    }

    #[test]
    fn player_id_display() {
        assert_eq!(PlayerId(3).to_string(), "player #3");
    }
}
