//! Interactive game against computer opponents.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use rr_game::{GameObserver, GameSession, Player, PlayerId, Target, TemperamentPolicy, TurnStep};

const HUMAN: PlayerId = PlayerId(1);

const HELP: &str = "  self      pull the trigger on yourself
  opponent  aim at the next player
  spin      spin the cylinder
  status    show the table
  help      show this help
  quit      leave the table";

/// Announces each turn as it begins.
#[derive(Debug)]
struct TurnIndicator;

impl GameObserver for TurnIndicator {
    fn on_turn_started(&mut self, player: &Player) {
        let line = if player.id() == HUMAN {
            "Your turn".to_string()
        } else {
            format!("{}'s turn", player.name())
        };
        println!("  {}", line.dimmed());
    }
}

/// Play one game, reading commands from stdin.
pub fn run(name: &str, opponents: u32, rules: &super::TableRules) -> Result<(), String> {
    if opponents == 0 {
        return Err("need at least one opponent".into());
    }
    let config = rules.config(rules.seed)?;

    let mut roster = vec![Player::human(HUMAN, name)];
    roster.extend((1..=opponents).map(|i| {
        let seed = rules.seed.wrapping_add(u64::from(i));
        Player::ai(PlayerId(i + 1), format!("Dealer {i}"), TemperamentPolicy::new(seed))
    }));
    let mut session = GameSession::new(config, roster).map_err(|e| e.to_string())?;
    session.add_game_observer(TurnIndicator);

    println!(
        "  {} {}",
        "Revolver Roulette".bold(),
        format!(
            "({} chambers, {} opponent(s), seed={})",
            session.max_chambers(),
            opponents,
            rules.seed
        )
        .dimmed()
    );
    println!("  Type 'help' for commands.");
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let step = session.play_turn().map_err(|e| e.to_string())?;
        match step {
            TurnStep::GameOver(winner) => {
                print_result(&session, winner);
                return Ok(());
            }
            TurnStep::Played(report) => {
                println!("  {}", super::describe_shot(&session, &report));
            }
            TurnStep::TimedOut { shot, .. } => {
                if let Some(report) = shot {
                    println!("  {}", super::describe_shot(&session, &report));
                }
            }
            TurnStep::AwaitingInput(_) => {
                print!("{} ", ">".bold());
                io::stdout().flush().map_err(|e| e.to_string())?;

                let Some(line) = lines.next() else {
                    println!();
                    println!("  You leave the table.");
                    return Ok(());
                };
                let line = line.map_err(|e| e.to_string())?;
                match line.trim() {
                    "" => {}
                    "quit" | "q" | "exit" => {
                        println!("  You leave the table.");
                        return Ok(());
                    }
                    "help" | "h" | "?" => println!("{HELP}"),
                    "status" => print_status(&session),
                    "spin" => {
                        session.spin().map_err(|e| e.to_string())?;
                        println!("  {}", "The cylinder spins.".cyan());
                    }
                    input => match input.parse::<Target>() {
                        Ok(target) => {
                            let report = session.shoot(target).map_err(|e| e.to_string())?;
                            println!("  {}", super::describe_shot(&session, &report));
                            if report.eliminated && report.victim == HUMAN && !report.game_over {
                                println!("  {}", "You are out. The others play on.".dimmed());
                            }
                        }
                        Err(e) => println!("  {e} (type 'help')"),
                    },
                }
            }
        }
    }
}

fn print_status(session: &GameSession) {
    println!(
        "  Turn {}, {} of {} chambers left",
        session.current_turn(),
        session.chambers_left(),
        session.max_chambers()
    );
    for player in session.roster() {
        let marker = if player.id() == session.current_player_id() {
            "*"
        } else {
            " "
        };
        let state = if player.is_alive() {
            format!("{} hp", player.health()).green()
        } else {
            "out".red()
        };
        println!("  {marker} {:<12} {state}", player.name());
    }
}

fn print_result(session: &GameSession, winner: Option<PlayerId>) {
    println!();
    match winner.and_then(|id| session.player(id)) {
        Some(p) if p.id() == HUMAN => println!("  {}", "You win!".green().bold()),
        Some(p) => println!("  {} {}", p.name().bold(), "wins.".red()),
        None => println!("  {}", "Nobody walks away.".red().bold()),
    }
}
