//! Game layer for Revolver Roulette.
//!
//! Builds a multi-player game on top of an [`rr_core::Revolver`]: a roster of
//! human and computer players, turn sequencing with optional time budgets,
//! last-player-standing win detection, and an event log of everything that
//! happened. [`GameSession`] ties it all together.

/// Decision policies for computer-controlled players.
pub mod ai;
/// Configuration types for a game session.
pub mod config;
/// Error types for the game crate.
pub mod error;
/// Game event types and the event log.
pub mod event;
/// Presentation hooks for turns, shots, and the result.
pub mod observer;
/// Players, targets, and turn intents.
pub mod player;
/// Win-condition checks over a roster.
pub mod rules;
/// The game session aggregate.
pub mod session;
/// Turn lifecycle and timeout handling.
pub mod turn;

/// Re-exports of the decision policy types.
pub use ai::{DecisionPolicy, FixedPolicy, Temperament, TemperamentPolicy};
/// Re-export of [`config::GameConfig`].
pub use config::GameConfig;
/// Re-exports of [`error::GameError`] and [`error::GameResult`].
pub use error::{GameError, GameResult};
/// Re-exports of [`event::EventLog`], [`event::GameEvent`], and [`event::GameEventKind`].
pub use event::{EventLog, GameEvent, GameEventKind};
/// Re-export of [`observer::GameObserver`].
pub use observer::GameObserver;
/// Re-exports of the player types.
pub use player::{Player, PlayerId, Target, TurnIntent};
/// Re-exports of [`session::GameSession`], [`session::ShotReport`], and [`session::TurnStep`].
pub use session::{GameSession, ShotReport, TurnStep};
/// Re-exports of the turn coordination types.
pub use turn::{FireAtSelf, PassTurn, TimeoutAction, TimeoutPolicy, TurnCoordinator, TurnPhase};
