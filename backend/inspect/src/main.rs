use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding the day files
    #[arg(default_value = "data")]
    data_dir: PathBuf,

    /// Print the ranked leaderboard for this day
    #[arg(long)]
    day: Option<u32>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).init();

    let args = Args::parse();

    inspect::run(&args.data_dir, args.day);
}
