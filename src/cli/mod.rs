//! Command-line front end for the remedy journal.
mod app;
mod args;

pub use app::*;
pub use args::*;
