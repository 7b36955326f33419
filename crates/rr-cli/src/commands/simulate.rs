use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use tracing::debug;

use rr_game::{GameEventKind, GameSession, Player, PlayerId, TemperamentPolicy};

const MAX_TURNS: u32 = 10_000;

#[derive(Debug, Default, Serialize)]
struct PlayerStats {
    seat: u32,
    wins: u32,
    eliminations: u32,
    self_shots: u32,
}

#[derive(Debug, Serialize)]
struct Summary {
    games: u32,
    players: u32,
    seed: u64,
    shots: u64,
    reloads: u64,
    no_winner: u32,
    seats: Vec<PlayerStats>,
}

pub fn run(
    games: u32,
    players: u32,
    rules: &super::TableRules,
    verbose: bool,
    json: bool,
) -> Result<(), String> {
    if games == 0 {
        return Err("need at least one game".into());
    }

    let mut summary = Summary {
        games,
        players,
        seed: rules.seed,
        shots: 0,
        reloads: 0,
        no_winner: 0,
        seats: (1..=players)
            .map(|seat| PlayerStats {
                seat,
                ..PlayerStats::default()
            })
            .collect(),
    };

    for game in 0..games {
        let seed = rules.seed.wrapping_add(u64::from(game));
        let config = rules.config(seed)?;
        let roster = (1..=players)
            .map(|seat| {
                let policy_seed = seed.wrapping_mul(31).wrapping_add(u64::from(seat));
                Player::ai(PlayerId(seat), format!("Seat {seat}"), TemperamentPolicy::new(policy_seed))
            })
            .collect();
        let mut session = GameSession::new(config, roster).map_err(|e| e.to_string())?;
        let winner = session
            .run_ai_game(MAX_TURNS)
            .map_err(|e| format!("game {}: {e}", game + 1))?;

        debug!(game = game + 1, seed, ?winner, "game finished");
        tally(&mut summary, &session, winner);

        if verbose && !json {
            println!("  {}", format!("Game {} (seed={seed})", game + 1).bold().underline());
            super::print_events(&session);
            println!();
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("failed to serialize summary: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    print_table(&summary);
    Ok(())
}

fn tally(summary: &mut Summary, session: &GameSession, winner: Option<PlayerId>) {
    match winner {
        Some(PlayerId(seat)) => {
            if let Some(stats) = summary.seats.iter_mut().find(|s| s.seat == seat) {
                stats.wins += 1;
            }
        }
        None => summary.no_winner += 1,
    }

    for event in session.events().events() {
        match &event.kind {
            GameEventKind::Shot {
                shooter,
                victim,
                ..
            } => {
                summary.shots += 1;
                if shooter == victim
                    && let Some(stats) = summary.seats.iter_mut().find(|s| s.seat == shooter.0)
                {
                    stats.self_shots += 1;
                }
            }
            GameEventKind::Eliminated { player } => {
                if let Some(stats) = summary.seats.iter_mut().find(|s| s.seat == player.0) {
                    stats.eliminations += 1;
                }
            }
            GameEventKind::Reloaded { .. } => summary.reloads += 1,
            _ => {}
        }
    }
}

fn print_table(summary: &Summary) {
    println!(
        "  {} {}",
        "Simulation".bold(),
        format!(
            "({} games, {} players, seed={})",
            summary.games, summary.players, summary.seed
        )
        .dimmed()
    );
    println!(
        "  {} shots fired, {} loads",
        summary.shots, summary.reloads
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Seat", "Wins", "Win %", "Eliminated", "Self shots"]);
    for stats in &summary.seats {
        let pct = f64::from(stats.wins) * 100.0 / f64::from(summary.games);
        table.add_row(vec![
            format!("Seat {}", stats.seat),
            stats.wins.to_string(),
            format!("{pct:.1}"),
            stats.eliminations.to_string(),
            stats.self_shots.to_string(),
        ]);
    }
    println!("{table}");

    if summary.no_winner > 0 {
        println!("  {} game(s) without a winner", summary.no_winner);
    }
}
