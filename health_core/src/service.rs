//! The health service: logging entry points and report queries.

use crate::aggregate::Aggregator;
use crate::report;
use crate::window::ALL_DAY;
use crate::{
    Category, Config, DailyTotals, DayReport, Error, EventRecord, PeriodReport, RecordStore,
    Result, TimeWindow, UnfulfilledDayReport, Unit,
};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

/// Tracks drink, eat and move events and reports progress against the
/// configured daily targets.
///
/// Configuration is validated once in [`HealthService::new`] and never
/// changes afterwards; the record store only ever grows.
#[derive(Clone, Debug)]
pub struct HealthService {
    config: Config,
    store: RecordStore,
}

impl HealthService {
    /// Create a service with an empty store.
    ///
    /// Fails with [`Error::Config`] if a target is not positive or a window is
    /// malformed. A missing `all` window is added as unbounded.
    pub fn new(mut config: Config) -> Result<Self> {
        config.validate()?;

        if !config.windows.contains_key(ALL_DAY) {
            tracing::debug!("No '{}' window configured, adding unbounded default", ALL_DAY);
            config
                .windows
                .insert(ALL_DAY.to_string(), TimeWindow::unbounded());
        }

        Ok(Self {
            config,
            store: RecordStore::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Records logged on `date`, in the order they were logged
    pub fn records(&self, date: NaiveDate) -> &[EventRecord] {
        self.store.day(date).unwrap_or(&[])
    }

    // ------------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------------

    /// Log something drunk at `at`
    pub fn log_drink(
        &mut self,
        name: Option<&str>,
        unit: Unit,
        quantity: f64,
        at: NaiveDateTime,
    ) -> Result<&EventRecord> {
        self.log(Category::Drink, name, unit, quantity, at, 0)
    }

    /// Log something eaten at `at`
    pub fn log_eat(
        &mut self,
        name: Option<&str>,
        unit: Unit,
        quantity: f64,
        at: NaiveDateTime,
    ) -> Result<&EventRecord> {
        self.log(Category::Eat, name, unit, quantity, at, 0)
    }

    /// Log movement between `start` and `end`, which must share a calendar date
    pub fn log_move(
        &mut self,
        unit: Unit,
        quantity: f64,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<&EventRecord> {
        if start.date() != end.date() {
            return Err(Error::CrossDayUnsupported { start, end });
        }
        if end < start {
            return Err(Error::Validation(format!(
                "move ends at {} before it starts at {}",
                end, start
            )));
        }

        let duration = (end - start).num_seconds();
        self.log(Category::Move, None, unit, quantity, start, duration)
    }

    fn log(
        &mut self,
        category: Category,
        label: Option<&str>,
        unit: Unit,
        quantity: f64,
        timestamp: NaiveDateTime,
        duration_seconds: i64,
    ) -> Result<&EventRecord> {
        if !quantity.is_finite() {
            return Err(Error::Validation(format!(
                "{} quantity must be a finite number, got {}",
                category, quantity
            )));
        }
        if quantity < 0.0 {
            return Err(Error::Validation(format!(
                "{} quantity cannot be negative, got {}",
                category, quantity
            )));
        }

        let record = EventRecord {
            id: Uuid::new_v4(),
            category,
            label: label.map(str::to_string),
            unit,
            quantity,
            timestamp,
            duration_seconds,
        };
        let date = record.date();
        self.store.append(record);

        let day = self.store.day(date).unwrap_or(&[]);
        day.last()
            .ok_or_else(|| Error::Other(format!("record for {} was not stored", date)))
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    fn aggregator(&self) -> Aggregator<'_> {
        Aggregator::new(&self.store, &self.config.windows)
    }

    /// Sum `category` records of `date` in `unit`, restricted to `window`
    pub fn sum(&self, category: Category, unit: &Unit, window: &str, date: NaiveDate) -> Result<f64> {
        self.aggregator().sum(category, unit, window, date)
    }

    /// Total drunk on `date`
    pub fn amount_drunk(&self, unit: &Unit, date: NaiveDate) -> Result<f64> {
        self.sum(Category::Drink, unit, ALL_DAY, date)
    }

    /// Total eaten on `date` during the named meal window
    pub fn amount_eaten(&self, meal: &str, unit: &Unit, date: NaiveDate) -> Result<f64> {
        self.sum(Category::Eat, unit, meal, date)
    }

    /// Total moved on `date`
    pub fn amount_moved(&self, unit: &Unit, date: NaiveDate) -> Result<f64> {
        self.sum(Category::Move, unit, ALL_DAY, date)
    }

    /// Steps, hours, kilocalories and liters summed for `date`
    pub fn daily_totals(&self, date: NaiveDate) -> Result<DailyTotals> {
        report::daily_totals(&self.aggregator(), date)
    }

    /// What is still missing on `date` to reach each daily minimum
    pub fn unfulfilled_day_report(&self, date: NaiveDate) -> Result<UnfulfilledDayReport> {
        report::unfulfilled(
            &self.aggregator(),
            &self.config.targets,
            date,
            self.store.has_day(date),
        )
    }

    /// Completion rate of each daily minimum on `date`
    pub fn day_report(&self, date: NaiveDate) -> Result<DayReport> {
        let left = self.unfulfilled_day_report(date)?;
        Ok(report::day_report(&self.config.targets, date, &left))
    }

    /// Medians of the daily totals over `[start, end]`
    pub fn period_report(&self, start: NaiveDate, end: NaiveDate) -> Result<PeriodReport> {
        report::period_report(&self.aggregator(), start, end)
    }
}
