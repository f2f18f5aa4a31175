//! Remedy journal library
//!
//! This library records remedy administrations and their follow-up events,
//! persisting the whole journal as one JSON document on a remote blob store
//! with a local-file fallback, and exports it to a spreadsheet.

mod cli;
mod config;
mod datetime;
mod errors;
mod export;
mod record;
mod remote;
mod service;
mod store;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use datetime::*;
pub use errors::*;
pub use export::*;
pub use record::*;
pub use remote::*;
pub use service::*;
pub use store::*;
pub use types::*;
