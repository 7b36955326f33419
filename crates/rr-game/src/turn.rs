//! Turn sequencing.
//!
//! Each turn moves through `WaitingToStart -> InProgress -> Ended` and then
//! hands over to the next living player in roster order. An optional time
//! budget lets a front end show a countdown; what happens when it runs out is
//! decided by a [`TimeoutPolicy`].

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GameError, GameResult};
use crate::player::{Player, PlayerId, Target};

/// Where the current turn is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The current player has not started acting.
    WaitingToStart,
    /// The current player is acting.
    InProgress,
    /// The turn is over and no next turn has been issued.
    Ended,
}

/// Tracks whose turn it is and how long they have had.
#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    order: Vec<PlayerId>,
    index: usize,
    turn: u32,
    phase: TurnPhase,
    budget: Option<TimeDelta>,
    started_at: Option<DateTime<Utc>>,
    shot_taken: bool,
    halted: bool,
}

impl TurnCoordinator {
    /// Create a coordinator for the given turn order. The first player goes first.
    pub fn new(order: Vec<PlayerId>, budget: Option<TimeDelta>) -> GameResult<Self> {
        if order.is_empty() {
            return Err(GameError::NotEnoughPlayers(0));
        }
        Ok(Self {
            order,
            index: 0,
            turn: 1,
            phase: TurnPhase::WaitingToStart,
            budget,
            started_at: None,
            shot_taken: false,
            halted: false,
        })
    }

    /// The 1-based number of the current turn.
    pub fn current_turn(&self) -> u32 {
        self.turn
    }

    /// The player whose turn it is.
    pub fn current_player_id(&self) -> PlayerId {
        self.order[self.index]
    }

    /// The current phase.
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// The per-turn time budget, if any.
    pub fn budget(&self) -> Option<TimeDelta> {
        self.budget
    }

    /// When the current turn started.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Whether the current player has already fired this turn.
    pub fn has_shot(&self) -> bool {
        self.shot_taken
    }

    /// Whether the game is over and no more turns will be issued.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Begin the current player's turn.
    pub fn start_turn(&mut self, now: DateTime<Utc>) -> GameResult<PlayerId> {
        if self.halted {
            return Err(GameError::GameOver);
        }
        match self.phase {
            TurnPhase::WaitingToStart => {}
            TurnPhase::InProgress => return Err(GameError::TurnAlreadyInProgress(self.turn)),
            TurnPhase::Ended => return Err(GameError::TurnNotInProgress),
        }
        self.phase = TurnPhase::InProgress;
        self.started_at = Some(now);
        self.shot_taken = false;
        let player = self.current_player_id();
        debug!(turn = self.turn, %player, "turn started");
        Ok(player)
    }

    /// Mark that the current player has fired. Only one shot per turn.
    pub fn record_shot(&mut self) -> GameResult<()> {
        if self.phase != TurnPhase::InProgress {
            return Err(GameError::TurnNotInProgress);
        }
        if self.shot_taken {
            return Err(GameError::ShotAlreadyTaken(self.current_player_id()));
        }
        self.shot_taken = true;
        Ok(())
    }

    /// Finish the current turn and pick who goes next.
    ///
    /// With `repeat`, the same player goes again if still alive. Otherwise
    /// the next living player in roster order is chosen. Returns `None` and
    /// halts if nobody is left.
    pub fn end_turn(
        &mut self,
        is_alive: impl Fn(PlayerId) -> bool,
        repeat: bool,
    ) -> GameResult<Option<PlayerId>> {
        if self.phase != TurnPhase::InProgress {
            return Err(GameError::TurnNotInProgress);
        }
        self.phase = TurnPhase::Ended;
        self.turn += 1;
        self.started_at = None;
        self.shot_taken = false;

        if self.halted {
            return Ok(None);
        }

        let count = self.order.len();
        let next = if repeat && is_alive(self.current_player_id()) {
            Some(self.index)
        } else {
            (1..=count)
                .map(|step| (self.index + step) % count)
                .find(|&i| is_alive(self.order[i]))
        };

        match next {
            Some(i) => {
                self.index = i;
                self.phase = TurnPhase::WaitingToStart;
                Ok(Some(self.order[i]))
            }
            None => {
                self.halted = true;
                Ok(None)
            }
        }
    }

    /// Stop issuing turns.
    pub fn halt(&mut self) {
        self.halted = true;
        self.phase = TurnPhase::Ended;
        self.started_at = None;
    }

    /// Time left in the current turn, or `None` without a budget or turn.
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let budget = self.budget?;
        let started = self.started_at?;
        let left = budget - (now - started);
        Some(left.max(TimeDelta::zero()))
    }

    /// Whether the current turn has used up its budget.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_some_and(|left| left.is_zero())
    }
}

/// What to do with a turn whose budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutAction {
    /// Fire at the given target on the player's behalf.
    Fire(Target),
    /// End the turn without firing.
    Pass,
}

/// Decides how an expired turn is resolved.
pub trait TimeoutPolicy: std::fmt::Debug {
    /// Called once when the current player's budget has run out.
    fn on_timeout(&mut self, player: &Player, chambers_left: usize) -> TimeoutAction;
}

/// Fires at the idle player.
#[derive(Debug, Clone, Copy, Default)]
pub struct FireAtSelf;

impl TimeoutPolicy for FireAtSelf {
    fn on_timeout(&mut self, _player: &Player, _chambers_left: usize) -> TimeoutAction {
        TimeoutAction::Fire(Target::Myself)
    }
}

/// Skips the idle player's shot.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassTurn;

impl TimeoutPolicy for PassTurn {
    fn on_timeout(&mut self, _player: &Player, _chambers_left: usize) -> TimeoutAction {
        TimeoutAction::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u32) -> Vec<PlayerId> {
        (1..=n).map(PlayerId).collect()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn lifecycle_rotates_in_order() {
        let mut t = TurnCoordinator::new(ids(3), None).unwrap();
        assert_eq!(t.phase(), TurnPhase::WaitingToStart);
        assert_eq!(t.current_turn(), 1);

        assert_eq!(t.start_turn(at(0)).unwrap(), PlayerId(1));
        assert_eq!(t.phase(), TurnPhase::InProgress);
        assert_eq!(t.end_turn(|_| true, false).unwrap(), Some(PlayerId(2)));
        assert_eq!(t.phase(), TurnPhase::WaitingToStart);
        assert_eq!(t.current_turn(), 2);

        t.start_turn(at(1)).unwrap();
        assert_eq!(t.end_turn(|_| true, false).unwrap(), Some(PlayerId(3)));
        t.start_turn(at(2)).unwrap();
        assert_eq!(t.end_turn(|_| true, false).unwrap(), Some(PlayerId(1)));
        assert_eq!(t.current_turn(), 4);
    }

    #[test]
    fn eliminated_players_are_skipped() {
        let mut t = TurnCoordinator::new(ids(4), None).unwrap();
        t.start_turn(at(0)).unwrap();
        let next = t.end_turn(|id| id != PlayerId(2) && id != PlayerId(3), false);
        assert_eq!(next.unwrap(), Some(PlayerId(4)));
    }

    #[test]
    fn repeat_keeps_living_player() {
        let mut t = TurnCoordinator::new(ids(2), None).unwrap();
        t.start_turn(at(0)).unwrap();
        assert_eq!(t.end_turn(|_| true, true).unwrap(), Some(PlayerId(1)));
        assert_eq!(t.current_turn(), 2);

        t.start_turn(at(1)).unwrap();
        let next = t.end_turn(|id| id != PlayerId(1), true).unwrap();
        assert_eq!(next, Some(PlayerId(2)));
    }

    #[test]
    fn nobody_alive_halts() {
        let mut t = TurnCoordinator::new(ids(2), None).unwrap();
        t.start_turn(at(0)).unwrap();
        assert_eq!(t.end_turn(|_| false, false).unwrap(), None);
        assert!(t.is_halted());
        assert_eq!(t.start_turn(at(1)), Err(GameError::GameOver));
    }

    #[test]
    fn halt_stops_new_turns() {
        let mut t = TurnCoordinator::new(ids(2), None).unwrap();
        t.start_turn(at(0)).unwrap();
        t.halt();
        assert_eq!(t.phase(), TurnPhase::Ended);
        assert_eq!(t.start_turn(at(1)), Err(GameError::GameOver));
        assert_eq!(t.end_turn(|_| true, false), Err(GameError::TurnNotInProgress));
    }

    #[test]
    fn phase_errors() {
        let mut t = TurnCoordinator::new(ids(2), None).unwrap();
        assert_eq!(t.end_turn(|_| true, false), Err(GameError::TurnNotInProgress));
        assert_eq!(t.record_shot(), Err(GameError::TurnNotInProgress));
        t.start_turn(at(0)).unwrap();
        assert_eq!(
            t.start_turn(at(0)),
            Err(GameError::TurnAlreadyInProgress(1))
        );
    }

    #[test]
    fn one_shot_per_turn() {
        let mut t = TurnCoordinator::new(ids(2), None).unwrap();
        t.start_turn(at(0)).unwrap();
        t.record_shot().unwrap();
        assert!(t.has_shot());
        assert_eq!(t.record_shot(), Err(GameError::ShotAlreadyTaken(PlayerId(1))));
        t.end_turn(|_| true, false).unwrap();
        assert!(!t.has_shot());
    }

    #[test]
    fn budget_countdown() {
        let budget = TimeDelta::try_seconds(30).unwrap();
        let mut t = TurnCoordinator::new(ids(2), Some(budget)).unwrap();
        assert_eq!(t.remaining(at(0)), None);

        t.start_turn(at(0)).unwrap();
        assert_eq!(t.started_at(), Some(at(0)));
        assert_eq!(t.remaining(at(10)), TimeDelta::try_seconds(20));
        assert!(!t.is_expired(at(29)));
        assert!(t.is_expired(at(30)));
        assert_eq!(t.remaining(at(45)), Some(TimeDelta::zero()));
    }

    #[test]
    fn no_budget_never_expires() {
        let mut t = TurnCoordinator::new(ids(2), None).unwrap();
        t.start_turn(at(0)).unwrap();
        assert!(!t.is_expired(at(1_000_000)));
    }

    #[test]
    fn empty_order_rejected() {
        assert!(TurnCoordinator::new(Vec::new(), None).is_err());
    }

    #[test]
    fn shipped_timeout_policies() {
        let p = Player::human(PlayerId(1), "Alice");
        assert_eq!(
            FireAtSelf.on_timeout(&p, 3),
            TimeoutAction::Fire(Target::Myself)
        );
        assert_eq!(PassTurn.on_timeout(&p, 3), TimeoutAction::Pass);
    }
}
