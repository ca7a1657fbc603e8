//! Command-line interface definitions and parsing

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulate a multiplayer fruit cutting session", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(short, long)]
    pub duration: Option<u64>,

    /// Override the maximum number of players
    #[arg(long)]
    pub max_players: Option<usize>,

    /// Override the maximum number of fruits on screen
    #[arg(long)]
    pub max_fruits: Option<usize>,

    /// Pick departing players uniformly at random
    #[arg(long)]
    pub uniform_departures: bool,

    /// Run every timer ten times faster than the default
    #[arg(long)]
    pub fast: bool,
}
