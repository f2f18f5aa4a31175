//! Shared types for the remedy journal, including the CLI subcommands.
use std::path::PathBuf;

use clap::Subcommand;

use crate::JournalError;

/// A specialized Result type for journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Available subcommands for the remedy journal
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a remedy administration
    Add {
        /// Date as DD.MM.YYYY, YYYY-MM-DD or DDMMYYYY
        #[clap(short, long)]
        date: String,

        /// Optional time as HH:MM or HHMM
        #[clap(short = 'T', long, default_value = "")]
        time: String,

        /// Name of the remedy
        #[clap(short, long)]
        remedy: String,

        /// Potency, e.g. 30C
        #[clap(short, long, default_value = "")]
        potency: String,
    },

    /// Edit a record; omitted fields keep their stored values
    Edit {
        /// ID of the record to edit
        id: String,

        #[clap(short, long)]
        date: Option<String>,

        /// New time; pass an empty string to clear it
        #[clap(short = 'T', long)]
        time: Option<String>,

        #[clap(short, long)]
        remedy: Option<String>,

        #[clap(short, long)]
        potency: Option<String>,
    },

    /// Delete a record by ID
    Delete {
        /// ID of the record to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Attach a follow-up event to a record
    AddEvent {
        /// ID of the record
        record_id: String,

        /// Event description
        #[clap(short = 'D', long)]
        description: String,

        /// Optional event date
        #[clap(short, long, default_value = "")]
        date: String,

        /// Optional event time
        #[clap(short = 'T', long, default_value = "")]
        time: String,
    },

    /// Edit an event by its position in the record
    EditEvent {
        /// ID of the record
        record_id: String,

        /// Zero-based event index, as shown by `show`
        index: usize,

        #[clap(short = 'D', long)]
        description: Option<String>,

        /// New date; pass an empty string to clear it
        #[clap(short, long)]
        date: Option<String>,

        /// New time; pass an empty string to clear it
        #[clap(short = 'T', long)]
        time: Option<String>,
    },

    /// Delete an event by its position in the record
    DeleteEvent {
        /// ID of the record
        record_id: String,

        /// Zero-based event index
        index: usize,
    },

    /// List records, newest first
    List {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Limit the number of records shown
        #[clap(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show a single record with its events
    Show {
        /// ID of the record
        id: String,

        /// Format output as raw JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Export the journal to an .xlsx spreadsheet
    Export {
        /// Path of the spreadsheet to write
        #[clap(short, long, default_value = "remedies_journal.xlsx")]
        output: PathBuf,
    },

    /// Show the resolved configuration
    Config,
}
