//! Append-only record store with one bucket per calendar date.

use crate::EventRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// In-memory day buckets of logged events.
///
/// A date without records has no bucket at all, which aggregation relies on to
/// tell "no data" apart from "data summing to zero".
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    days: BTreeMap<NaiveDate, Vec<EventRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the bucket of its date, creating the bucket if needed
    pub fn append(&mut self, record: EventRecord) {
        let date = record.date();
        tracing::debug!(
            "Appending {} record {} ({} {}) to {}",
            record.category,
            record.id,
            record.quantity,
            record.unit,
            date
        );
        self.days.entry(date).or_default().push(record);
    }

    /// Records of one date in insertion order, or `None` if nothing was logged
    pub fn day(&self, date: NaiveDate) -> Option<&[EventRecord]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn has_day(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    /// Dates that have at least one record, oldest first
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    /// Total number of records across all days
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Unit};
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn record(at: &str, quantity: f64) -> EventRecord {
        EventRecord {
            id: Uuid::new_v4(),
            category: Category::Drink,
            label: Some("water".into()),
            unit: Unit::Glass,
            quantity,
            timestamp: at.parse::<NaiveDateTime>().unwrap(),
            duration_seconds: 0,
        }
    }

    #[test]
    fn test_records_bucketed_by_date() {
        let mut store = RecordStore::new();
        store.append(record("2016-09-27T23:59:00", 1.0));
        store.append(record("2016-09-28T00:01:00", 2.0));
        store.append(record("2016-09-28T08:00:00", 3.0));

        let day = store.day("2016-09-28".parse().unwrap()).unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].quantity, 2.0);
        assert_eq!(day[1].quantity, 3.0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_empty_day_has_no_bucket() {
        let mut store = RecordStore::new();
        assert!(store.is_empty());
        store.append(record("2016-09-28T08:00:00", 1.0));

        let missing: NaiveDate = "2016-09-26".parse().unwrap();
        assert!(store.day(missing).is_none());
        assert!(!store.has_day(missing));
        assert_eq!(store.dates().count(), 1);
    }
}
