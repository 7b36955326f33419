//! CLI frontend for Revolver Roulette.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::TableRules;

#[derive(Parser)]
#[command(
    name = "rr",
    about = "Revolver Roulette: one revolver, a few players, last one standing wins",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against computer opponents, reading moves from stdin
    Play {
        /// Your name at the table
        #[arg(short, long, default_value = "You")]
        name: String,

        /// Number of computer opponents
        #[arg(short, long, default_value = "1")]
        opponents: u32,

        #[command(flatten)]
        rules: TableRules,
    },

    /// Run computer-only games and report who wins
    Simulate {
        /// Number of games to play
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Players per game
        #[arg(short, long, default_value = "3")]
        players: u32,

        #[command(flatten)]
        rules: TableRules,

        /// Print every event of every game
        #[arg(short, long)]
        verbose: bool,

        /// Print a JSON summary instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            name,
            opponents,
            rules,
        } => commands::play::run(&name, opponents, &rules),
        Commands::Simulate {
            games,
            players,
            rules,
            verbose,
            json,
        } => commands::simulate::run(games, players, &rules, verbose, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
