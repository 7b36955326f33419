use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rr_core::FireOutcome;
use serde::{Deserialize, Serialize};

use crate::player::{PlayerId, Target};

/// What kind of game event occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    /// A player's turn began.
    TurnStarted {
        /// The player whose turn it is.
        player: PlayerId,
    },
    /// A player pulled the trigger.
    Shot {
        /// The player holding the revolver.
        shooter: PlayerId,
        /// What the shooter aimed at.
        target: Target,
        /// The player the revolver was pointed at.
        victim: PlayerId,
        /// The chamber that was fired.
        chamber: usize,
        /// Whether a live round went off.
        outcome: FireOutcome,
    },
    /// A player left the game.
    Eliminated {
        /// The eliminated player.
        player: PlayerId,
    },
    /// The cylinder was spun.
    Spun {
        /// The chamber the pointer landed on.
        chamber: usize,
    },
    /// The cylinder was reloaded.
    Reloaded {
        /// The newly loaded chambers.
        positions: BTreeSet<usize>,
    },
    /// A player ran out of time.
    TimedOut {
        /// The idle player.
        player: PlayerId,
    },
    /// A player's turn finished.
    TurnEnded {
        /// The player whose turn ended.
        player: PlayerId,
    },
    /// The game is over.
    GameWon {
        /// The last player standing, if anyone survived.
        winner: Option<PlayerId>,
    },
}

impl GameEventKind {
    /// Check whether a given player is involved in this event.
    pub fn involves(&self, id: PlayerId) -> bool {
        match self {
            Self::TurnStarted { player }
            | Self::Eliminated { player }
            | Self::TimedOut { player }
            | Self::TurnEnded { player } => *player == id,
            Self::Shot {
                shooter, victim, ..
            } => *shooter == id || *victim == id,
            Self::GameWon { winner } => *winner == Some(id),
            Self::Spun { .. } | Self::Reloaded { .. } => false,
        }
    }
}

/// A record of something that happened during a game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    /// The turn during which this event occurred.
    pub turn: u32,
    /// The specific kind of event.
    pub kind: GameEventKind,
    /// A human-readable description of the event.
    pub description: String,
    /// Wall-clock time the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl GameEvent {
    /// Create a new event stamped with the current time.
    pub fn new(turn: u32, kind: GameEventKind, description: impl Into<String>) -> Self {
        Self {
            turn,
            kind,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Accumulates events during a game.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if over capacity.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// All recorded events, oldest first.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Events recorded during the given turn.
    pub fn events_in_turn(&self, turn: u32) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.turn == turn).collect()
    }

    /// Events involving the given player.
    pub fn events_for_player(&self, id: PlayerId) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Every shot fired, in order.
    pub fn shots(&self) -> impl Iterator<Item = &GameEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, GameEventKind::Shot { .. }))
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
