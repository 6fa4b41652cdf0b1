//! Core domain types for the health tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Event categories and measurement units
//! - Logged event records
//! - Computed daily and period reports

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

// ============================================================================
// Categories and Units
// ============================================================================

/// Activity class of a logged event
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Drink,
    Eat,
    Move,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drink => write!(f, "drink"),
            Self::Eat => write!(f, "eat"),
            Self::Move => write!(f, "move"),
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "drink" => Ok(Self::Drink),
            "eat" | "food" => Ok(Self::Eat),
            "move" => Ok(Self::Move),
            other => Err(Error::Validation(format!("Unknown category: {}", other))),
        }
    }
}

/// Measurement unit a quantity is expressed in.
///
/// The named variants are the units the tracker understands; anything else is
/// carried as `Other` and only ever matches itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", from = "String")]
pub enum Unit {
    Glass,
    Liter,
    Kilocalorie,
    Step,
    Hour,
    Other(String),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glass => write!(f, "glass"),
            Self::Liter => write!(f, "liter"),
            Self::Kilocalorie => write!(f, "kilocalorie"),
            Self::Step => write!(f, "step"),
            Self::Hour => write!(f, "hour"),
            Self::Other(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for Unit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        let unit = match name.as_str() {
            "glass" | "glasses" => Self::Glass,
            "liter" | "liters" | "litre" | "litres" | "l" => Self::Liter,
            "kilocalorie" | "kilocalories" | "kilocal" | "kcal" => Self::Kilocalorie,
            "step" | "steps" => Self::Step,
            "hour" | "hours" | "h" => Self::Hour,
            _ => Self::Other(name),
        };
        Ok(unit)
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(unit) => unit,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for Unit {
    fn from(s: &str) -> Self {
        Unit::from(s.to_string())
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.to_string()
    }
}

// ============================================================================
// Event Records
// ============================================================================

/// One logged occurrence of drinking, eating or moving.
///
/// Records are only created by the logging operations of
/// [`HealthService`](crate::HealthService) and are never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub id: Uuid,
    pub category: Category,
    pub label: Option<String>,
    pub unit: Unit,
    pub quantity: f64,
    pub timestamp: NaiveDateTime,
    /// Zero for drink/eat; end minus start for move
    pub duration_seconds: i64,
}

impl EventRecord {
    /// Calendar date that determines the record's day bucket
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn duration(&self) -> Duration {
        Duration::seconds(self.duration_seconds)
    }
}

// ============================================================================
// Reports
// ============================================================================

/// The four tracked metrics summed for one calendar date
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub steps: f64,
    pub hours_moved: f64,
    pub kilocalories: f64,
    pub liters: f64,
}

impl DailyTotals {
    /// Totals for a date with no records
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0.0,
            hours_moved: 0.0,
            kilocalories: 0.0,
            liters: 0.0,
        }
    }
}

/// Amount still needed today for each metric, never negative
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct UnfulfilledDayReport {
    pub liters_left: f64,
    pub kilocalories_left: f64,
    pub steps_left: f64,
    pub hours_left: f64,
}

/// Completion ratio (`1 - left / target`) per metric for one day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub steps_completion: f64,
    pub hours_completion: f64,
    pub kilocalories_completion: f64,
    pub liters_completion: f64,
}

/// Medians of the daily totals across an inclusive date range
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PeriodReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: usize,
    pub steps_median: f64,
    pub hours_median: f64,
    pub kilocalories_median: f64,
    pub liters_median: f64,
    /// One sample per day, absent days included as zeros
    pub samples: Vec<DailyTotals>,
}
