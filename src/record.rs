//! Core data structures for the remedy journal.
//!
//! A journal is persisted as a single JSON array of records; each record owns
//! an ordered list of follow-up events addressed by position.
use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

const ID_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// A single remedy administration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier for the record
    #[serde(default)]
    pub id: String,
    /// Canonical `YYYY-MM-DD` or `YYYY-MM-DD HH:MM`
    #[serde(rename = "date-time", default)]
    pub date_time: String,
    #[serde(default)]
    pub remedy: String,
    #[serde(default)]
    pub potency: String,
    /// Follow-up events in insertion order
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A dated follow-up note attached to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Canonical `YYYY-MM-DD` or empty
    #[serde(default)]
    pub date: String,
    /// Canonical `HH:MM` or empty
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub description: String,
}

impl Record {
    /// Creates a record with no events.
    pub fn new(id: String, date_time: String, remedy: String, potency: String) -> Self {
        Record {
            id,
            date_time,
            remedy,
            potency,
            events: Vec::new(),
        }
    }
}

/// The whole persisted state: every record, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journal {
    pub records: Vec<Record>,
}

impl Journal {
    pub fn new(records: Vec<Record>) -> Self {
        Journal { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn find(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Removes the record with `id`, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let position = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(position))
    }

    /// Records ordered by `date-time`, newest first.
    ///
    /// The canonical format is zero-padded, so string order is date order.
    /// Equal keys keep their store order.
    pub fn sorted_newest_first(mut self) -> Vec<Record> {
        self.records.sort_by(|a, b| b.date_time.cmp(&a.date_time));
        self.records
    }

    /// Generates a record id from the local clock that is unique within this
    /// journal.
    pub fn generate_id(&self) -> String {
        self.generate_id_at(Local::now().naive_local())
    }

    /// Generates an id for `now`, bumping by one microsecond until it is unused.
    pub fn generate_id_at(&self, now: NaiveDateTime) -> String {
        let mut stamp = now;
        loop {
            let id = stamp.format(ID_FORMAT).to_string();
            if !self.contains(&id) {
                return id;
            }
            stamp += Duration::microseconds(1);
        }
    }
}

impl From<Vec<Record>> for Journal {
    fn from(records: Vec<Record>) -> Self {
        Journal { records }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(id: &str, date_time: &str) -> Record {
        Record::new(
            id.to_string(),
            date_time.to_string(),
            "Arnica".to_string(),
            "30C".to_string(),
        )
    }

    #[test]
    fn deserializes_the_stored_document() {
        let json = r#"[
          {
            "id": "20240115091234000000",
            "date-time": "2024-01-15 09:12",
            "remedy": "Arnica",
            "potency": "30C",
            "events": [
              {"date": "2024-01-16", "time": "08:00", "description": "Improved sleep"}
            ]
          }
        ]"#;
        let journal: Journal = serde_json::from_str(json).unwrap();
        assert_eq!(journal.len(), 1);
        let record = &journal.records[0];
        assert_eq!(record.date_time, "2024-01-15 09:12");
        assert_eq!(record.events[0].description, "Improved sleep");
    }

    #[test]
    fn missing_events_read_as_empty() {
        let json = r#"[{"id": "1", "date-time": "2024-01-15", "remedy": "Arnica", "potency": ""}]"#;
        let journal: Journal = serde_json::from_str(json).unwrap();
        assert!(journal.records[0].events.is_empty());
    }

    #[test]
    fn serializes_with_hyphenated_key_and_literal_unicode() {
        let mut rec = record("1", "2024-03-01");
        rec.remedy = "Арника".to_string();
        let json = serde_json::to_string(&Journal::new(vec![rec])).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"date-time\":\"2024-03-01\""));
        assert!(json.contains("Арника"));
    }

    #[test]
    fn sorts_newest_first_keeping_ties_stable() {
        let journal = Journal::new(vec![
            record("a", "2024-01-15"),
            record("b", "2024-03-01 07:30"),
            record("c", "2024-01-15"),
            record("d", "2024-03-01"),
        ]);
        let ids: Vec<_> = journal
            .sorted_newest_first()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["b", "d", "a", "c"]);
    }

    #[test]
    fn generated_ids_skip_existing_ones() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_micro_opt(9, 12, 34, 999_999)
            .unwrap();
        let journal = Journal::new(vec![record("20240115091234999999", "2024-01-15")]);
        assert_eq!(journal.generate_id_at(now), "20240115091235000000");
        assert_eq!(Journal::default().generate_id_at(now), "20240115091234999999");
    }

    #[test]
    fn remove_returns_the_record() {
        let mut journal = Journal::new(vec![record("a", "2024-01-15"), record("b", "2024-01-16")]);
        assert_eq!(journal.remove("a").map(|r| r.id), Some("a".to_string()));
        assert!(journal.remove("a").is_none());
        assert_eq!(journal.len(), 1);
    }
}
