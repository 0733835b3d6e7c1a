mod cli;
mod config;
mod draft;
mod gate;
mod logging;
mod model;
mod register;
mod schema;
mod sequencer;
mod services;
mod session;
mod storage;
mod wizard;

use std::process;

use clap::Parser;

use cli::Cli;
use config::Config;
use storage::Storage;

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    logging::init(&config, cli.debug);

    let root = cli
        .root
        .clone()
        .or_else(|| config.storage_root.clone())
        .or_else(Storage::default_root)
        .unwrap_or_else(|| {
            eprintln!("Could not determine home directory.");
            process::exit(1);
        });

    let storage = match Storage::new(&root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to initialize storage at {}: {e}", root.display());
            process::exit(1);
        }
    };

    match storage.seed_quota(config.initial_free_posts) {
        Ok(true) => tracing::info!(free = config.initial_free_posts, "quota ledger created"),
        Ok(false) => {}
        Err(e) => {
            eprintln!("Failed to initialize quota: {e}");
            process::exit(1);
        }
    }

    if let Err(e) = cli::run(cli, &storage) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
