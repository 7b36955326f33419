//! Game session management.
//!
//! `GameSession` owns the roster, the single shared revolver, the turn
//! coordinator, and the event log. Every shot flows through here: the
//! revolver resolves it, the victim takes the damage, the other players'
//! policies observe it, and the win condition is checked after each
//! elimination.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use rr_core::{FireOutcome, Revolver, RevolverObserver};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::event::{EventLog, GameEvent, GameEventKind};
use crate::observer::GameObserver;
use crate::player::{Player, PlayerId, Target, TurnIntent};
use crate::rules;
use crate::turn::{FireAtSelf, TimeoutAction, TimeoutPolicy, TurnCoordinator, TurnPhase};

/// The resolution of one trigger pull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotReport {
    /// The player holding the revolver.
    pub shooter: PlayerId,
    /// What the shooter aimed at.
    pub target: Target,
    /// The player the revolver was pointed at.
    pub victim: PlayerId,
    /// The chamber that was fired.
    pub chamber: usize,
    /// Whether a live round went off.
    pub outcome: FireOutcome,
    /// Whether the victim was eliminated by this shot.
    pub eliminated: bool,
    /// The new load, if the emptied cylinder was reloaded.
    pub reloaded: Option<BTreeSet<usize>>,
    /// Whether the shooter keeps the turn.
    pub keeps_turn: bool,
    /// Whether this shot ended the game.
    pub game_over: bool,
}

/// What happened when the session advanced by one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnStep {
    /// The current player is human; call [`GameSession::shoot`] once they choose.
    AwaitingInput(PlayerId),
    /// A computer player took its shot.
    Played(ShotReport),
    /// The current player ran out of time; the timeout policy acted for them.
    TimedOut {
        /// The idle player.
        player: PlayerId,
        /// The shot fired on their behalf, if any.
        shot: Option<ShotReport>,
    },
    /// No more turns; the winner, if anyone survived.
    GameOver(Option<PlayerId>),
}

/// A game in progress.
pub struct GameSession {
    config: GameConfig,
    revolver: Revolver,
    roster: Vec<Player>,
    turns: TurnCoordinator,
    events: EventLog,
    last_target: BTreeMap<PlayerId, Target>,
    keep_turn: bool,
    timeout_policy: Box<dyn TimeoutPolicy>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("turn", &self.turns.current_turn())
            .field("players", &self.roster.len())
            .field("alive", &self.active_players())
            .field("events", &self.events.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl GameSession {
    /// Create a session and load the revolver.
    ///
    /// The roster order is the turn order. Every player starts with
    /// `config.starting_health`.
    pub fn new(config: GameConfig, mut roster: Vec<Player>) -> GameResult<Self> {
        config.validate()?;
        if roster.len() < 2 {
            return Err(GameError::NotEnoughPlayers(roster.len()));
        }
        let mut seen = HashSet::new();
        for player in &roster {
            if !seen.insert(player.id()) {
                return Err(GameError::DuplicatePlayer(player.id()));
            }
        }
        for player in &mut roster {
            player.reset_health(config.starting_health);
        }

        let order = roster.iter().map(Player::id).collect();
        let turns = TurnCoordinator::new(order, config.turn_budget())?;
        let mut revolver = Revolver::new(&config.revolver)?;
        let positions = revolver.reload_random();

        let mut session = Self {
            events: EventLog::new(config.max_events),
            config,
            revolver,
            roster,
            turns,
            last_target: BTreeMap::new(),
            keep_turn: false,
            timeout_policy: Box::new(FireAtSelf),
            observers: Vec::new(),
        };
        session.log(
            GameEventKind::Reloaded {
                positions: positions.clone(),
            },
            format!("Loaded {} live round(s)", positions.len()),
        );
        Ok(session)
    }

    /// Replace the policy applied to turns that run out of time.
    pub fn set_timeout_policy<P: TimeoutPolicy + 'static>(&mut self, policy: P) {
        self.timeout_policy = Box::new(policy);
    }

    /// Register a presentation observer on the revolver.
    pub fn add_observer<O: RevolverObserver + 'static>(&mut self, observer: O) {
        self.revolver.add_observer(observer);
    }

    /// Register a table-level observer for turns, shots, and the result.
    pub fn add_game_observer<O: GameObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// The session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// All players in turn order.
    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Look up a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.roster.iter().find(|p| p.id() == id)
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> GameResult<&Player> {
        let id = self.current_player_id();
        self.player(id).ok_or(GameError::UnknownPlayer(id))
    }

    /// The shared revolver.
    pub fn revolver(&self) -> &Revolver {
        &self.revolver
    }

    /// The turn coordinator.
    pub fn turns(&self) -> &TurnCoordinator {
        &self.turns
    }

    /// Everything that has happened so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The chamber that will be fired next.
    pub fn current_chamber(&self) -> usize {
        self.revolver.current_chamber()
    }

    /// Number of chambers in the revolver.
    pub fn max_chambers(&self) -> usize {
        self.revolver.max_chambers()
    }

    /// Chambers currently holding a live round.
    pub fn bullet_positions(&self) -> &BTreeSet<usize> {
        self.revolver.bullet_positions()
    }

    /// Chambers not yet fired since the last reload.
    pub fn chambers_left(&self) -> usize {
        self.revolver.chambers_left()
    }

    /// The 1-based number of the current turn.
    pub fn current_turn(&self) -> u32 {
        self.turns.current_turn()
    }

    /// The player whose turn it is.
    pub fn current_player_id(&self) -> PlayerId {
        self.turns.current_player_id()
    }

    /// Whether at most one player is left.
    pub fn is_game_over(&self) -> bool {
        rules::is_game_over(&self.roster)
    }

    /// Whether the win condition has been met.
    pub fn check_win_condition(&self) -> bool {
        rules::check_win_condition(&self.roster)
    }

    /// The last player standing, once there is exactly one.
    pub fn winner(&self) -> Option<&Player> {
        rules::winner(&self.roster)
    }

    /// Number of players still alive.
    pub fn active_players(&self) -> usize {
        rules::active_players(&self.roster)
    }

    /// Begin the current player's turn.
    pub fn start_turn(&mut self) -> GameResult<PlayerId> {
        self.start_turn_at(Utc::now())
    }

    /// Begin the current player's turn with an explicit start time.
    pub fn start_turn_at(&mut self, now: DateTime<Utc>) -> GameResult<PlayerId> {
        if self.is_game_over() {
            return Err(GameError::GameOver);
        }
        let id = self.turns.start_turn(now)?;
        let name = self.name_of(id);
        self.log(
            GameEventKind::TurnStarted { player: id },
            format!("{name}'s turn"),
        );
        if let Some(player) = self.roster.iter().find(|p| p.id() == id) {
            for observer in &mut self.observers {
                observer.on_turn_started(player);
            }
        }
        Ok(id)
    }

    /// The current player fires at `target`.
    ///
    /// The turn stays open until [`GameSession::end_turn`], except when the
    /// shooter eliminates themselves: the turn then passes at once so the
    /// current player is always alive.
    pub fn fire(&mut self, target: Target) -> GameResult<ShotReport> {
        if self.turns.is_halted() {
            return Err(GameError::GameOver);
        }
        let shooter = self.current_player_id();
        let victim = match target {
            Target::Myself => shooter,
            Target::Opponent => self
                .next_opponent(shooter)
                .ok_or(GameError::NoOpponent(shooter))?,
        };
        self.turns.record_shot()?;

        let chamber = self.revolver.current_chamber();
        let outcome = self.revolver.fire();
        let damage = self.config.damage_per_round;
        let eliminated = outcome.is_live() && self.player_mut(victim)?.take_damage(damage);

        let shooter_name = self.name_of(shooter);
        let victim_name = self.name_of(victim);
        self.log(
            GameEventKind::Shot {
                shooter,
                target,
                victim,
                chamber,
                outcome,
            },
            format!("{shooter_name} fires at {victim_name}: {outcome}"),
        );
        if eliminated {
            self.log(
                GameEventKind::Eliminated { player: victim },
                format!("{victim_name} is out"),
            );
        }

        self.notify_policies(shooter, target);
        self.last_target.insert(shooter, target);
        self.keep_turn = self.config.blank_self_shot_keeps_turn
            && target == Target::Myself
            && !outcome.is_live();

        let game_over = eliminated && self.check_win_condition();
        if game_over {
            self.finish_game();
        }

        let reloaded = if !game_over
            && self.config.reload_when_empty
            && self.revolver.live_remaining() == 0
        {
            let positions = self.revolver.reload_random();
            self.log(
                GameEventKind::Reloaded {
                    positions: positions.clone(),
                },
                format!("Cylinder empty, reloaded {} live round(s)", positions.len()),
            );
            Some(positions)
        } else {
            None
        };

        let report = ShotReport {
            shooter,
            target,
            victim,
            chamber,
            outcome,
            eliminated,
            reloaded,
            keeps_turn: self.keep_turn && !game_over,
            game_over,
        };
        for observer in &mut self.observers {
            observer.on_shot(&report);
        }
        if eliminated && victim == shooter && !game_over {
            self.end_turn()?;
        }
        Ok(report)
    }

    /// Finish the current turn and return who goes next.
    pub fn end_turn(&mut self) -> GameResult<Option<PlayerId>> {
        if self.turns.is_halted() {
            return Err(GameError::GameOver);
        }
        let player = self.current_player_id();
        let roster = &self.roster;
        let next = self.turns.end_turn(
            |id| roster.iter().any(|p| p.id() == id && p.is_alive()),
            self.keep_turn,
        )?;
        self.keep_turn = false;
        let name = self.name_of(player);
        self.log(
            GameEventKind::TurnEnded { player },
            format!("{name}'s turn ends"),
        );
        Ok(next)
    }

    /// Fire at `target` and close the turn unless the game ended.
    pub fn shoot(&mut self, target: Target) -> GameResult<ShotReport> {
        let report = self.fire(target)?;
        if !report.game_over && self.turns.phase() == TurnPhase::InProgress {
            self.end_turn()?;
        }
        Ok(report)
    }

    /// Spin the cylinder. Returns the chamber it landed on.
    pub fn spin(&mut self) -> GameResult<usize> {
        if self.turns.is_halted() {
            return Err(GameError::GameOver);
        }
        self.revolver.spin();
        let chamber = self.revolver.current_chamber();
        self.log(GameEventKind::Spun { chamber }, "The cylinder spins");
        Ok(chamber)
    }

    /// Load the given chambers and close the cylinder at chamber 0.
    pub fn reload(&mut self, positions: impl IntoIterator<Item = usize>) -> GameResult<()> {
        if self.turns.is_halted() {
            return Err(GameError::GameOver);
        }
        self.revolver.reload(positions)?;
        let positions = self.revolver.bullet_positions().clone();
        self.log(
            GameEventKind::Reloaded {
                positions: positions.clone(),
            },
            format!("Reloaded {} live round(s)", positions.len()),
        );
        Ok(())
    }

    /// Draw a random load without installing it.
    pub fn generate_bullet_positions(
        &mut self,
        min: usize,
        max: usize,
    ) -> GameResult<BTreeSet<usize>> {
        Ok(self.revolver.generate_bullet_positions(min, max)?)
    }

    /// Apply the timeout policy if the current turn has run out of time.
    pub fn check_timeout(&mut self, now: DateTime<Utc>) -> GameResult<Option<TurnStep>> {
        if self.turns.phase() != TurnPhase::InProgress
            || self.turns.has_shot()
            || !self.turns.is_expired(now)
        {
            return Ok(None);
        }

        let id = self.current_player_id();
        let chambers_left = self.chambers_left();
        let player = self
            .roster
            .iter()
            .find(|p| p.id() == id)
            .ok_or(GameError::UnknownPlayer(id))?;
        warn!(player = %id, "turn timed out");
        let action = self.timeout_policy.on_timeout(player, chambers_left);
        let name = self.name_of(id);
        self.log(
            GameEventKind::TimedOut { player: id },
            format!("{name} ran out of time"),
        );

        let shot = match action {
            TimeoutAction::Fire(target) => Some(self.shoot(target)?),
            TimeoutAction::Pass => {
                self.end_turn()?;
                None
            }
        };
        Ok(Some(TurnStep::TimedOut { player: id, shot }))
    }

    /// Advance the game by one turn.
    pub fn play_turn(&mut self) -> GameResult<TurnStep> {
        self.play_turn_at(Utc::now())
    }

    /// Advance the game by one turn at an explicit time.
    ///
    /// Starts the turn if needed, applies the timeout policy to an expired
    /// turn, and lets a computer player shoot. Human players are left
    /// waiting for [`GameSession::shoot`].
    pub fn play_turn_at(&mut self, now: DateTime<Utc>) -> GameResult<TurnStep> {
        if self.turns.is_halted() || self.is_game_over() {
            return Ok(TurnStep::GameOver(self.winner().map(Player::id)));
        }
        if self.turns.phase() == TurnPhase::InProgress && self.turns.has_shot() {
            self.end_turn()?;
        }
        if self.turns.phase() == TurnPhase::WaitingToStart {
            self.start_turn_at(now)?;
        }
        if let Some(step) = self.check_timeout(now)? {
            return Ok(step);
        }

        let id = self.current_player_id();
        let chambers_left = self.chambers_left();
        let intent = self.player_mut(id)?.take_turn(chambers_left);
        match intent {
            TurnIntent::AwaitInput => Ok(TurnStep::AwaitingInput(id)),
            TurnIntent::Shoot(target) => Ok(TurnStep::Played(self.shoot(target)?)),
        }
    }

    /// Play an all-computer game to the end. Returns the winner.
    pub fn run_ai_game(&mut self, max_turns: u32) -> GameResult<Option<PlayerId>> {
        loop {
            match self.play_turn()? {
                TurnStep::GameOver(winner) => return Ok(winner),
                TurnStep::AwaitingInput(id) => return Err(GameError::AwaitingInput(id)),
                TurnStep::Played(_) | TurnStep::TimedOut { .. } => {}
            }
            if self.current_turn() > max_turns {
                return Err(GameError::TurnLimitReached(max_turns));
            }
        }
    }

    fn finish_game(&mut self) {
        self.turns.halt();
        let winner = self.winner().map(|p| (p.id(), p.name().to_string()));
        let description = match &winner {
            Some((_, name)) => format!("{name} wins"),
            None => "Nobody survives".to_string(),
        };
        let winner_id = winner.map(|(id, _)| id);
        info!(winner = ?winner_id, "game over");
        self.log(GameEventKind::GameWon { winner: winner_id }, description);
        let winner = winner_id.and_then(|id| self.roster.iter().find(|p| p.id() == id));
        for observer in &mut self.observers {
            observer.on_game_won(winner);
        }
    }

    /// Let every other living player's policy see the shot.
    fn notify_policies(&mut self, shooter: PlayerId, target: Target) {
        let chambers_left = self.revolver.chambers_left();
        for player in &mut self.roster {
            if player.id() == shooter || !player.is_alive() {
                continue;
            }
            let self_shot = self.last_target.get(&player.id()) == Some(&Target::Myself);
            player.observe(target, chambers_left, self_shot);
        }
    }

    /// The next living player after `shooter` in turn order.
    fn next_opponent(&self, shooter: PlayerId) -> Option<PlayerId> {
        let start = self.roster.iter().position(|p| p.id() == shooter)?;
        let count = self.roster.len();
        (1..count)
            .map(|step| &self.roster[(start + step) % count])
            .find(|p| p.is_alive())
            .map(Player::id)
    }

    fn player_mut(&mut self, id: PlayerId) -> GameResult<&mut Player> {
        self.roster
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(GameError::UnknownPlayer(id))
    }

    fn name_of(&self, id: PlayerId) -> String {
        self.player(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| id.to_string())
    }

    fn log(&mut self, kind: GameEventKind, description: impl Into<String>) {
        let turn = self.turns.current_turn();
        self.events.push(GameEvent::new(turn, kind, description));
    }
}
