//! Aggregation engine: filters and sums one day's records.

use crate::convert::convert;
use crate::{Category, RecordStore, Result, TimeWindow, Unit};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Read-only view over a store and its named time windows
#[derive(Clone, Copy, Debug)]
pub struct Aggregator<'a> {
    store: &'a RecordStore,
    windows: &'a BTreeMap<String, TimeWindow>,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a RecordStore, windows: &'a BTreeMap<String, TimeWindow>) -> Self {
        Self { store, windows }
    }

    /// Sum the `category` records of `date` expressed in `unit`.
    ///
    /// Rules:
    /// - A date without a bucket sums to 0.
    /// - Records already in `unit` count only when their time of day falls in
    ///   the window named `window`; an unknown window name matches nothing.
    /// - Records in another unit are converted and always counted; the window
    ///   is not consulted on this path.
    /// - A record with no conversion rule fails the whole sum.
    pub fn sum(&self, category: Category, unit: &Unit, window: &str, date: NaiveDate) -> Result<f64> {
        let Some(records) = self.store.day(date) else {
            tracing::debug!("No records on {}, {} {} sums to 0", date, category, unit);
            return Ok(0.0);
        };

        let window = self.windows.get(window);
        let mut total = 0.0;

        for record in records.iter().filter(|r| r.category == category) {
            if &record.unit == unit {
                let time = record.timestamp.time();
                if window.is_some_and(|w| w.contains(time)) {
                    total += record.quantity;
                }
            } else {
                total += convert(record, unit)?;
            }
        }

        tracing::debug!("Sum of {} in {} on {}: {}", category, unit, date, total);
        Ok(total)
    }
}
