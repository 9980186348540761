use std::process;

use clap::Parser;

use wanderlog::cli::{self, Cli};
use wanderlog::config::Config;
use wanderlog::journal::Journal;
use wanderlog::logging;
use wanderlog::storage::Storage;

fn main() {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });
    logging::init(&config.log_level);

    let root = config.data_dir().unwrap_or_else(|| {
        eprintln!("Could not determine home directory.");
        process::exit(1);
    });

    let storage = match Storage::open(&root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage: {e}");
            process::exit(1);
        }
    };

    let mut journal = match Journal::open(storage) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Failed to load journal: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = cli::run(cli, &config, &mut journal) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
