//! Event journal reader.
//!
//! A journal is a file of already-happened events that an external caller
//! replays into a [`HealthService`]. Two formats are understood:
//! - JSON Lines (default): one entry per line, tagged by `category`
//! - CSV (`.csv` extension): `category,name,unit,quantity,start,end`
//!
//! Journals are only read, under a shared lock, never written.

use crate::{Category, Error, HealthService, Result, Unit};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One logged event as written in a journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum JournalEntry {
    Drink {
        #[serde(default)]
        name: Option<String>,
        unit: Unit,
        quantity: f64,
        at: NaiveDateTime,
    },
    Eat {
        #[serde(default)]
        name: Option<String>,
        unit: Unit,
        quantity: f64,
        at: NaiveDateTime,
    },
    Move {
        unit: Unit,
        quantity: f64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Outcome of replaying a journal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub rejected: usize,
}

/// CSV row format for journal files
#[derive(Debug, Deserialize)]
struct CsvRow {
    category: String,
    name: Option<String>,
    unit: String,
    quantity: f64,
    start: String,
    end: Option<String>,
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    s.trim()
        .parse::<NaiveDateTime>()
        .map_err(|e| Error::Other(format!("Invalid timestamp '{}': {}", s, e)))
}

impl TryFrom<CsvRow> for JournalEntry {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let name = row.name.filter(|n| !n.trim().is_empty());
        let unit = Unit::from(row.unit);
        let start = parse_timestamp(&row.start)?;

        let entry = match row.category.parse::<Category>()? {
            Category::Drink => JournalEntry::Drink {
                name,
                unit,
                quantity: row.quantity,
                at: start,
            },
            Category::Eat => JournalEntry::Eat {
                name,
                unit,
                quantity: row.quantity,
                at: start,
            },
            Category::Move => {
                let end = row
                    .end
                    .as_deref()
                    .filter(|e| !e.trim().is_empty())
                    .ok_or_else(|| Error::Other("Move row is missing its end time".into()))?;
                JournalEntry::Move {
                    unit,
                    quantity: row.quantity,
                    start,
                    end: parse_timestamp(end)?,
                }
            }
        };
        Ok(entry)
    }
}

/// Read all entries from a journal, choosing the format by extension.
///
/// A missing file is an empty journal. Lines or rows that cannot be parsed are
/// logged and skipped.
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    if !path.exists() {
        tracing::info!("No journal found at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let entries = if is_csv {
        read_csv(&file)
    } else {
        read_jsonl(&file)
    };

    file.unlock()?;
    let entries = entries?;
    tracing::debug!("Read {} entries from journal {:?}", entries.len(), path);
    Ok(entries)
}

fn read_jsonl(file: &File) -> Result<Vec<JournalEntry>> {
    let reader = BufReader::new(file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<JournalEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::warn!("Failed to parse journal entry at line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(entries)
}

fn read_csv(file: &File) -> Result<Vec<JournalEntry>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut entries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match JournalEntry::try_from(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize CSV row: {}", e);
            }
        }
    }

    Ok(entries)
}

/// Log every entry into `service`.
///
/// Entries the service rejects as invalid input are counted and skipped. Any
/// other error stops the replay.
pub fn replay(service: &mut HealthService, entries: &[JournalEntry]) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for entry in entries {
        let result = match entry {
            JournalEntry::Drink {
                name,
                unit,
                quantity,
                at,
            } => service
                .log_drink(name.as_deref(), unit.clone(), *quantity, *at)
                .map(|_| ()),
            JournalEntry::Eat {
                name,
                unit,
                quantity,
                at,
            } => service
                .log_eat(name.as_deref(), unit.clone(), *quantity, *at)
                .map(|_| ()),
            JournalEntry::Move {
                unit,
                quantity,
                start,
                end,
            } => service
                .log_move(unit.clone(), *quantity, *start, *end)
                .map(|_| ()),
        };

        match result {
            Ok(()) => summary.applied += 1,
            Err(e @ (Error::Validation(_) | Error::CrossDayUnsupported { .. })) => {
                tracing::warn!("Skipping journal entry: {}", e);
                summary.rejected += 1;
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Replayed journal: {} applied, {} rejected",
        summary.applied,
        summary.rejected
    );
    Ok(summary)
}

/// Read a journal and replay it into `service`
pub fn load_into(service: &mut HealthService, path: &Path) -> Result<ReplaySummary> {
    let entries = read_entries(path)?;
    replay(service, &entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn service() -> HealthService {
        HealthService::new(Config::default()).unwrap()
    }

    const JSONL: &str = r#"{"category":"drink","name":"water","unit":"glass","quantity":1,"at":"2016-09-28T08:14:00"}
{"category":"eat","name":"sandwich","unit":"kcal","quantity":204,"at":"2016-09-28T08:30:00"}

{"category":"move","unit":"step","quantity":300,"start":"2016-09-28T09:30:00","end":"2016-09-28T10:00:00"}
"#;

    #[test]
    fn test_read_jsonl_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("journal.jsonl");
        std::fs::write(&path, JSONL).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(
            &entries[1],
            JournalEntry::Eat { unit: Unit::Kilocalorie, quantity, .. } if *quantity == 204.0
        ));
    }

    #[test]
    fn test_missing_journal_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let entries = read_entries(&temp_dir.path().join("nope.jsonl")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_corrupted_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("journal.jsonl");
        let contents = format!("{{ invalid json }}\n{}{{\"category\":\"sleep\"}}\n", JSONL);
        std::fs::write(&path, contents).unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_read_csv_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("journal.csv");
        std::fs::write(
            &path,
            "category,name,unit,quantity,start,end\n\
             drink,water,glass,2,2016-09-28T10:14:00,\n\
             eat,,kcal,504,2016-09-28T14:30:00,\n\
             move,,step,1000,2016-09-28T11:30:00,2016-09-28T12:00:00\n\
             move,,step,1000,2016-09-28T11:30:00,\n",
        )
        .unwrap();

        let entries = read_entries(&path).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[1], JournalEntry::Eat { name: None, .. }));
    }

    #[test]
    fn test_replay_into_service() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("journal.jsonl");
        std::fs::write(&path, JSONL).unwrap();

        let mut svc = service();
        let summary = load_into(&mut svc, &path).unwrap();
        assert_eq!(summary, ReplaySummary { applied: 3, rejected: 0 });

        let d = date("2016-09-28");
        assert_eq!(svc.amount_drunk(&Unit::Liter, d).unwrap(), 0.25);
        assert_eq!(svc.amount_moved(&Unit::Hour, d).unwrap(), 0.5);
        assert_eq!(svc.records(d).len(), 3);
    }

    #[test]
    fn test_replay_counts_rejected_entries() {
        let entries = vec![
            JournalEntry::Drink {
                name: None,
                unit: Unit::Glass,
                quantity: -1.0,
                at: "2016-09-28T08:00:00".parse().unwrap(),
            },
            JournalEntry::Move {
                unit: Unit::Step,
                quantity: 100.0,
                start: "2016-09-28T23:00:00".parse().unwrap(),
                end: "2016-09-29T01:00:00".parse().unwrap(),
            },
            JournalEntry::Drink {
                name: Some("water".into()),
                unit: Unit::Glass,
                quantity: 1.0,
                at: "2016-09-28T09:00:00".parse().unwrap(),
            },
        ];

        let mut svc = service();
        let summary = replay(&mut svc, &entries).unwrap();
        assert_eq!(summary, ReplaySummary { applied: 1, rejected: 2 });
        assert_eq!(svc.store().len(), 1);
    }
}
