//! Table-level presentation hooks.
//!
//! A turn indicator, a result banner, and a winner screen watch the game
//! through [`GameObserver`]. Like the revolver hooks these run after the
//! session state has changed and return nothing.

use crate::player::Player;
use crate::session::ShotReport;

/// A listener for game events. All methods default to doing nothing.
pub trait GameObserver: std::fmt::Debug {
    /// Called when a player's turn begins.
    fn on_turn_started(&mut self, _player: &Player) {}

    /// Called after every resolved shot.
    fn on_shot(&mut self, _report: &ShotReport) {}

    /// Called once when the game ends, with the winner if anyone survived.
    fn on_game_won(&mut self, _winner: Option<&Player>) {}
}
