// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::process;

use clap::Parser;

use pose_landmarks::cli::args::{Cli, Commands};
use pose_landmarks::cli::extract::run_extract;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => {
            if !run_extract(&args) {
                process::exit(1);
            }
        }
    }
}
