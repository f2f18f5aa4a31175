//! Record and event operations over the journal document.
//!
//! Every mutation validates its input first, then reads the whole journal,
//! changes the in-memory snapshot and writes the whole journal back. Event
//! indices refer to the snapshot read by the same operation.
use std::path::Path;

use log::{debug, info, warn};

use crate::{
    compose_date_time, parse_date, parse_time, render_workbook, BlobStore, Event, Field,
    InvalidFormat, Journal, JournalError, Record, RecordStore, Result, WriteOutcome,
};

/// Raw form input for a record.
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    pub date: String,
    pub time: String,
    pub remedy: String,
    pub potency: String,
}

/// Raw form input for an event.
#[derive(Debug, Clone, Default)]
pub struct EventInput {
    pub date: String,
    pub time: String,
    pub description: String,
}

/// Validated record fields ready to store.
struct RecordFields {
    date_time: String,
    remedy: String,
    potency: String,
}

/// Normalizes an optional raw field.
///
/// Only a truly empty raw value means "no value"; anything else, including
/// whitespace, must parse.
fn normalize<P>(raw: &str, parse: P, field: Field) -> Result<Option<String>>
where
    P: Fn(&str) -> std::result::Result<Option<String>, InvalidFormat>,
{
    if raw.is_empty() {
        return Ok(None);
    }
    match parse(raw) {
        Ok(Some(value)) => Ok(Some(value)),
        _ => Err(JournalError::InvalidFormat {
            field,
            value: raw.to_string(),
        }),
    }
}

impl RecordInput {
    fn validate(self) -> Result<RecordFields> {
        let date = normalize(&self.date, parse_date, Field::Date)?
            .ok_or(JournalError::MissingField { field: Field::Date })?;
        let time = normalize(&self.time, parse_time, Field::Time)?;

        if self.remedy.trim().is_empty() {
            return Err(JournalError::MissingField {
                field: Field::Remedy,
            });
        }

        Ok(RecordFields {
            date_time: compose_date_time(&date, time.as_deref()),
            remedy: self.remedy,
            potency: self.potency,
        })
    }
}

impl EventInput {
    fn validate(self) -> Result<Event> {
        if self.description.trim().is_empty() {
            return Err(JournalError::MissingField {
                field: Field::Description,
            });
        }

        let date = normalize(&self.date, parse_date, Field::EventDate)?;
        let time = normalize(&self.time, parse_time, Field::EventTime)?;

        Ok(Event {
            date: date.unwrap_or_default(),
            time: time.unwrap_or_default(),
            description: self.description,
        })
    }
}

/// Journal operations on top of a [`RecordStore`].
pub struct JournalService<B> {
    store: RecordStore<B>,
}

impl<B: BlobStore> JournalService<B> {
    pub fn new(store: RecordStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// Adds a record and returns its generated id.
    pub async fn add_record(&self, input: RecordInput) -> Result<String> {
        let fields = input.validate()?;

        let mut journal = self.store.read().await;
        let id = journal.generate_id();
        info!("Adding record {} ({})", id, fields.date_time);
        journal.records.push(Record::new(
            id.clone(),
            fields.date_time,
            fields.remedy,
            fields.potency,
        ));

        self.save(&journal).await?;
        Ok(id)
    }

    /// Overwrites date-time, remedy and potency, keeping id and events.
    pub async fn update_record(&self, id: &str, input: RecordInput) -> Result<()> {
        let fields = input.validate()?;

        let mut journal = self.store.read().await;
        let record = journal.find_mut(id).ok_or_else(|| JournalError::RecordNotFound {
            id: id.to_string(),
        })?;
        record.date_time = fields.date_time;
        record.remedy = fields.remedy;
        record.potency = fields.potency;
        info!("Updating record {}", id);

        self.save(&journal).await
    }

    /// Removes a record. An unknown id is a no-op.
    pub async fn delete_record(&self, id: &str) -> Result<()> {
        let mut journal = self.store.read().await;
        if journal.remove(id).is_none() {
            debug!("Record {} not present, nothing to delete", id);
            return Ok(());
        }
        info!("Deleted record {}", id);

        self.save(&journal).await
    }

    /// Appends an event to a record.
    pub async fn add_event(&self, record_id: &str, input: EventInput) -> Result<()> {
        let event = input.validate()?;

        let mut journal = self.store.read().await;
        let record = journal
            .find_mut(record_id)
            .ok_or_else(|| JournalError::RecordNotFound {
                id: record_id.to_string(),
            })?;
        record.events.push(event);
        info!(
            "Added event {} to record {}",
            record.events.len() - 1,
            record_id
        );

        self.save(&journal).await
    }

    /// Replaces the event at `index`.
    pub async fn update_event(
        &self,
        record_id: &str,
        index: usize,
        input: EventInput,
    ) -> Result<()> {
        let event = input.validate()?;

        let mut journal = self.store.read().await;
        let record = journal
            .find_mut(record_id)
            .ok_or_else(|| JournalError::RecordNotFound {
                id: record_id.to_string(),
            })?;
        let len = record.events.len();
        let slot = record
            .events
            .get_mut(index)
            .ok_or_else(|| JournalError::EventIndexOutOfRange {
                id: record_id.to_string(),
                index,
                len,
            })?;
        *slot = event;
        info!("Updated event {} of record {}", index, record_id);

        self.save(&journal).await
    }

    /// Removes the event at `index`, shifting later events down.
    ///
    /// Unlike the other record operations, a missing record or index is a
    /// silent no-op and nothing is written.
    pub async fn delete_event(&self, record_id: &str, index: usize) -> Result<()> {
        let mut journal = self.store.read().await;
        match journal.find_mut(record_id) {
            Some(record) if index < record.events.len() => {
                record.events.remove(index);
                info!("Deleted event {} of record {}", index, record_id);
            }
            _ => {
                debug!("Event {} of record {} not present", index, record_id);
                return Ok(());
            }
        }

        self.save(&journal).await
    }

    /// All records, newest `date-time` first.
    pub async fn list_records(&self) -> Vec<Record> {
        self.store.read().await.sorted_newest_first()
    }

    pub async fn get_record(&self, id: &str) -> Result<Record> {
        let journal = self.store.read().await;
        journal
            .find(id)
            .cloned()
            .ok_or_else(|| JournalError::RecordNotFound { id: id.to_string() })
    }

    pub async fn get_event(&self, record_id: &str, index: usize) -> Result<Event> {
        let record = self.get_record(record_id).await?;
        let len = record.events.len();
        record
            .events
            .into_iter()
            .nth(index)
            .ok_or_else(|| JournalError::EventIndexOutOfRange {
                id: record_id.to_string(),
                index,
                len,
            })
    }

    /// Renders the current journal as an `.xlsx` workbook.
    pub async fn export_bytes(&self) -> Result<Vec<u8>> {
        let journal = self.store.read().await;
        render_workbook(&journal.records)
    }

    /// Renders the current journal and writes it to `path`.
    pub async fn export(&self, path: &Path) -> Result<()> {
        let bytes = self.export_bytes().await?;
        tokio::fs::write(path, bytes).await?;
        info!("Exported journal to {}", path.display());
        Ok(())
    }

    async fn save(&self, journal: &Journal) -> Result<()> {
        match self.store.write(journal).await {
            WriteOutcome::Failed => Err(JournalError::WriteFailed),
            WriteOutcome::LocalFallback => {
                warn!("Journal saved to the local fallback file only");
                Ok(())
            }
            WriteOutcome::Remote | WriteOutcome::Local => Ok(()),
        }
    }
}
