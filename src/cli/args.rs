use std::path::PathBuf;

use clap::Parser;

use crate::{Commands, Config, FailurePolicy};

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Remedy journal: record remedies, follow-up events and export them"
)]
pub struct Cli {
    /// Remote document path (overrides REMOTE_PATH)
    #[clap(long, value_parser)]
    pub remote_path: Option<String>,

    /// Local fallback file (overrides LOCAL_FALLBACK)
    #[clap(long, value_parser)]
    pub local_fallback: Option<PathBuf>,

    /// Never fall back to the local file when the remote store fails
    #[clap(long)]
    pub strict: bool,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the remedy journal
    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Applies command-line overrides on top of the environment configuration.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(remote_path) = &self.remote_path {
            config.remote_path = remote_path.clone();
        }
        if let Some(local_fallback) = &self.local_fallback {
            config.local_fallback = local_fallback.clone();
        }
        if self.strict {
            config.failure_policy = FailurePolicy::Strict;
        }
        config
    }
}
