//! Win conditions.
//!
//! Pure functions over a roster. The game is over once at most one player is
//! still alive; the winner is that player, if there is one.

use crate::player::Player;

/// Number of players still in the game.
pub fn active_players(roster: &[Player]) -> usize {
    roster.iter().filter(|p| p.is_alive()).count()
}

/// Whether the game has ended.
pub fn is_game_over(roster: &[Player]) -> bool {
    active_players(roster) <= 1
}

/// Whether the win condition is met. Checked after every elimination.
pub fn check_win_condition(roster: &[Player]) -> bool {
    is_game_over(roster)
}

/// The sole surviving player, or `None` while several remain or nobody does.
pub fn winner(roster: &[Player]) -> Option<&Player> {
    let mut alive = roster.iter().filter(|p| p.is_alive());
    match (alive.next(), alive.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}
