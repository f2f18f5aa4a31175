//! CLI application handler.
//!
//! Turns parsed subcommands into journal service calls and prints the results.
use std::io::{stdin, stdout, Write};

use log::info;

use crate::{
    format_date_for_display, split_date_time, BlobStore, Commands, Config, EventInput,
    JournalService, Record, RecordInput, Result,
};

/// CLI Application handler - processes CLI commands against the journal
pub struct App<B> {
    /// The journal service backend
    service: JournalService<B>,

    /// Application configuration
    config: Config,

    /// Whether to display verbose output
    verbose: bool,
}

impl<B: BlobStore> App<B> {
    /// Create a new CLI application with the given service and config
    pub fn new(service: JournalService<B>, config: Config, verbose: bool) -> Self {
        Self {
            service,
            config,
            verbose,
        }
    }

    /// Run the CLI application with the given command
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Add {
                date,
                time,
                remedy,
                potency,
            } => {
                let id = self
                    .service
                    .add_record(RecordInput {
                        date,
                        time,
                        remedy,
                        potency,
                    })
                    .await?;
                println!("Record added with ID: {}", id);
            }

            Commands::Edit {
                id,
                date,
                time,
                remedy,
                potency,
            } => self.handle_edit(id, date, time, remedy, potency).await?,

            Commands::Delete { id, force } => self.handle_delete(id, force).await?,

            Commands::AddEvent {
                record_id,
                description,
                date,
                time,
            } => {
                self.service
                    .add_event(
                        &record_id,
                        EventInput {
                            date,
                            time,
                            description,
                        },
                    )
                    .await?;
                println!("Event added to record {}", record_id);
            }

            Commands::EditEvent {
                record_id,
                index,
                description,
                date,
                time,
            } => {
                self.handle_edit_event(record_id, index, description, date, time)
                    .await?
            }

            Commands::DeleteEvent { record_id, index } => {
                self.service.delete_event(&record_id, index).await?;
                println!("Event {} of record {} deleted", index, record_id);
            }

            Commands::List { json, limit } => self.list_records(json, limit).await?,

            Commands::Show { id, json } => {
                let record = self.service.get_record(&id).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    self.display_record(&record);
                }
            }

            Commands::Export { output } => {
                self.service.export(&output).await?;
                println!("Journal exported to {}", output.display());
            }

            Commands::Config => {
                println!("{}", serde_json::to_string_pretty(&self.config)?);
                println!(
                    "remote store: {}",
                    if self.config.has_remote() {
                        "configured"
                    } else {
                        "not configured (local-only mode)"
                    }
                );
            }
        }

        Ok(())
    }

    /// Edits a record, filling omitted fields from the stored record
    async fn handle_edit(
        &self,
        id: String,
        date: Option<String>,
        time: Option<String>,
        remedy: Option<String>,
        potency: Option<String>,
    ) -> Result<()> {
        let current = self.service.get_record(&id).await?;
        let (date_part, time_part) = split_date_time(&current.date_time);

        let input = RecordInput {
            date: date.unwrap_or_else(|| format_date_for_display(date_part)),
            time: time.unwrap_or_else(|| time_part.to_string()),
            remedy: remedy.unwrap_or(current.remedy.clone()),
            potency: potency.unwrap_or(current.potency.clone()),
        };
        if self.verbose {
            info!("Editing record {} with {:?}", id, input);
        }

        self.service.update_record(&id, input).await?;
        println!("Record {} updated", id);
        Ok(())
    }

    async fn handle_delete(&self, id: String, force: bool) -> Result<()> {
        if !force {
            let record = self.service.get_record(&id).await?;
            print!(
                "Delete record {} ({} {})? [y/N] ",
                id, record.remedy, record.date_time
            );
            stdout().flush()?;

            let mut answer = String::new();
            stdin().read_line(&mut answer)?;
            if !matches!(answer.trim(), "y" | "Y" | "yes") {
                println!("Deletion cancelled");
                return Ok(());
            }
        }

        self.service.delete_record(&id).await?;
        println!("Record {} deleted", id);
        Ok(())
    }

    async fn handle_edit_event(
        &self,
        record_id: String,
        index: usize,
        description: Option<String>,
        date: Option<String>,
        time: Option<String>,
    ) -> Result<()> {
        let current = self.service.get_event(&record_id, index).await?;
        let input = EventInput {
            date: date.unwrap_or(current.date),
            time: time.unwrap_or(current.time),
            description: description.unwrap_or(current.description),
        };

        self.service.update_event(&record_id, index, input).await?;
        println!("Event {} of record {} updated", index, record_id);
        Ok(())
    }

    /// List records newest first
    async fn list_records(&self, json: bool, limit: Option<usize>) -> Result<()> {
        let mut records = self.service.list_records().await;
        if let Some(limit) = limit {
            records.truncate(limit);
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            println!("The journal is empty.");
            return Ok(());
        }

        let term_width = terminal_size::terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(80);

        for (i, record) in records.iter().enumerate() {
            if i > 0 {
                println!("{}", "-".repeat(term_width.min(50)));
            }
            self.display_record(record);
        }

        println!(
            "\n{} record{}",
            records.len(),
            if records.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    fn display_record(&self, record: &Record) {
        let (date, time) = split_date_time(&record.date_time);
        let when = format!("{} {}", format_date_for_display(date), time);

        println!("ID: {} | Taken: {}", record.id, when.trim_end());
        println!(
            "Remedy: {} {}",
            console::style(&record.remedy).bold(),
            console::style(&record.potency).cyan()
        );

        for (index, event) in record.events.iter().enumerate() {
            let when = format!("{} {}", format_date_for_display(&event.date), event.time);
            println!(
                "  [{}] {:<17} {}",
                index,
                when.trim(),
                event.description
            );
        }
    }
}
