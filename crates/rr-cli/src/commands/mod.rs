pub mod play;
pub mod simulate;

use clap::Args;
use colored::Colorize;

use rr_core::RevolverConfig;
use rr_game::{GameConfig, GameEventKind, GameSession, PlayerId, ShotReport};

/// Table settings shared by every command.
#[derive(Args, Debug, Clone)]
pub struct TableRules {
    /// RNG seed for a reproducible game
    #[arg(short, long, default_value = "42")]
    pub seed: u64,

    /// Chambers in the cylinder
    #[arg(long, default_value = "6")]
    pub chambers: usize,

    /// Fewest live rounds per load
    #[arg(long, default_value = "1")]
    pub min_live: usize,

    /// Most live rounds per load
    #[arg(long, default_value = "3")]
    pub max_live: usize,

    /// Health each player starts with
    #[arg(long, default_value = "1")]
    pub health: u32,
}

impl TableRules {
    /// Build a validated game configuration using `seed` for the revolver.
    pub fn config(&self, seed: u64) -> Result<GameConfig, String> {
        let revolver = RevolverConfig::default()
            .with_chambers(self.chambers)
            .with_live_range(self.min_live, self.max_live)
            .with_seed(seed);
        let config = GameConfig {
            starting_health: self.health,
            ..GameConfig::default().with_revolver(revolver)
        };
        config
            .validate()
            .map_err(|e| format!("invalid table: {e}"))?;
        Ok(config)
    }
}

/// One line describing a shot, named from the session roster.
pub fn describe_shot(session: &GameSession, report: &ShotReport) -> String {
    let name = |id: PlayerId| {
        session
            .player(id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| id.to_string())
    };
    let shooter = name(report.shooter);
    let aim = if report.shooter == report.victim {
        "themselves".to_string()
    } else {
        name(report.victim)
    };
    let result = if report.outcome.is_live() {
        report.outcome.to_string().red().bold()
    } else {
        report.outcome.to_string().green()
    };
    let mut line = format!(
        "{shooter} aims at {aim}... chamber {} {result}",
        report.chamber + 1
    );
    if report.eliminated {
        line.push_str(&format!(" {} is out", name(report.victim)));
    }
    if report.keeps_turn {
        line.push_str(" (goes again)");
    }
    line
}

fn colorize_event(kind: &GameEventKind, description: &str) -> colored::ColoredString {
    match kind {
        GameEventKind::Eliminated { .. } => description.red().bold(),
        GameEventKind::GameWon { .. } => description.green().bold(),
        GameEventKind::Shot { outcome, .. } if outcome.is_live() => description.red(),
        GameEventKind::Shot { .. } => description.normal(),
        GameEventKind::TimedOut { .. } => description.yellow(),
        GameEventKind::Spun { .. } | GameEventKind::Reloaded { .. } => description.cyan(),
        GameEventKind::TurnStarted { .. } | GameEventKind::TurnEnded { .. } => {
            description.dimmed()
        }
    }
}

/// Print the event log of a session, one line per event.
pub fn print_events(session: &GameSession) {
    for event in session.events().events() {
        let turn_label = format!("[turn {:>3}]", event.turn).dimmed();
        let desc = colorize_event(&event.kind, &event.description);
        println!("  {turn_label} {desc}");
    }
}
