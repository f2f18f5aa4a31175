use clap::Parser;
use log::{debug, error, info};

use remedy_journal::{App, Cli, Config, JournalService, RecordStore};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

#[tokio::main]
async fn main() {
    // Loaded before the logger so RUST_LOG may come from .env.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    initialize_logger(cli.verbose);
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env file loaded: {}", e),
    }

    let config = match Config::from_env() {
        Ok(config) => cli.apply_overrides(config),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let store = RecordStore::from_config(config.clone());
    let app = App::new(JournalService::new(store), config, cli.verbose);

    if let Err(e) = app.run(cli.command).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
