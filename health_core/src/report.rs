//! Daily and period report builders.
//!
//! Every report is recomputed from the store on each call:
//! - Daily totals: steps, hours moved, kilocalories eaten, liters drunk
//! - Unfulfilled report: what is still missing to reach each minimum
//! - Day report: completion rate per metric
//! - Period report: median of each metric over a date range

use crate::aggregate::Aggregator;
use crate::window::ALL_DAY;
use crate::{
    Category, DailyTargets, DailyTotals, DayReport, Error, PeriodReport, Result,
    UnfulfilledDayReport, Unit,
};
use chrono::NaiveDate;

/// Sum the four tracked metrics for one date.
///
/// A date without records yields all zeros without consulting the store's
/// conversion rules.
pub fn daily_totals(agg: &Aggregator<'_>, date: NaiveDate) -> Result<DailyTotals> {
    Ok(DailyTotals {
        date,
        steps: agg.sum(Category::Move, &Unit::Step, ALL_DAY, date)?,
        hours_moved: agg.sum(Category::Move, &Unit::Hour, ALL_DAY, date)?,
        kilocalories: agg.sum(Category::Eat, &Unit::Kilocalorie, ALL_DAY, date)?,
        liters: agg.sum(Category::Drink, &Unit::Liter, ALL_DAY, date)?,
    })
}

/// Amount still needed on `date` for each target, clamped at zero.
///
/// A date with nothing logged reports zero everywhere.
pub fn unfulfilled(
    agg: &Aggregator<'_>,
    targets: &DailyTargets,
    date: NaiveDate,
    has_records: bool,
) -> Result<UnfulfilledDayReport> {
    if !has_records {
        tracing::debug!("Nothing logged on {}, empty unfulfilled report", date);
        return Ok(UnfulfilledDayReport::default());
    }

    let totals = daily_totals(agg, date)?;
    Ok(UnfulfilledDayReport {
        liters_left: remaining(targets.min_liters_per_day, totals.liters),
        kilocalories_left: remaining(targets.min_kilocalories_per_day, totals.kilocalories),
        steps_left: remaining(targets.min_steps_per_day, totals.steps),
        hours_left: remaining(targets.min_hours_of_movement_per_day, totals.hours_moved),
    })
}

/// Completion rates derived from an unfulfilled report
pub fn day_report(
    targets: &DailyTargets,
    date: NaiveDate,
    left: &UnfulfilledDayReport,
) -> DayReport {
    DayReport {
        date,
        steps_completion: 1.0 - left.steps_left / targets.min_steps_per_day,
        hours_completion: 1.0 - left.hours_left / targets.min_hours_of_movement_per_day,
        kilocalories_completion: 1.0 - left.kilocalories_left / targets.min_kilocalories_per_day,
        liters_completion: 1.0 - left.liters_left / targets.min_liters_per_day,
    }
}

/// Median of each metric over `[start, end]`, one sample per day.
///
/// Days without records contribute a zero sample for every metric.
pub fn period_report(agg: &Aggregator<'_>, start: NaiveDate, end: NaiveDate) -> Result<PeriodReport> {
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }

    let samples = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| daily_totals(agg, date))
        .collect::<Result<Vec<_>>>()?;

    let steps: Vec<f64> = samples.iter().map(|s| s.steps).collect();
    let hours: Vec<f64> = samples.iter().map(|s| s.hours_moved).collect();
    let kilocalories: Vec<f64> = samples.iter().map(|s| s.kilocalories).collect();
    let liters: Vec<f64> = samples.iter().map(|s| s.liters).collect();

    tracing::debug!("Computed period report {}..={} over {} days", start, end, samples.len());

    Ok(PeriodReport {
        start,
        end,
        days: samples.len(),
        steps_median: median(steps),
        hours_median: median(hours),
        kilocalories_median: median(kilocalories),
        liters_median: median(liters),
        samples,
    })
}

/// Median of the values; 0 when there are none
pub fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn remaining(target: f64, done: f64) -> f64 {
    (target - done).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_empty_is_zero() {
        assert_eq!(median(vec![]), 0.0);
    }

    #[test]
    fn test_median_single_value() {
        assert_eq!(median(vec![42.0]), 42.0);
    }

    #[test]
    fn test_median_odd_count() {
        assert_eq!(median(vec![1800.0, 0.0, 1500.0, 1800.0, 0.0]), 1500.0);
    }

    #[test]
    fn test_median_even_count_averages_middle() {
        assert_eq!(median(vec![1800.0, 0.0, 1800.0, 1500.0]), 1650.0);
        assert_eq!(median(vec![1800.0, 0.0, 1800.0, 1000.0]), 1400.0);
    }

    #[test]
    fn test_remaining_clamps_at_zero() {
        assert_eq!(remaining(1300.0, 1412.0), 0.0);
        assert_eq!(remaining(2000.0, 1800.0), 200.0);
    }

    #[test]
    fn test_day_report_from_left() {
        let targets = DailyTargets::default();
        let left = UnfulfilledDayReport {
            liters_left: 0.0,
            kilocalories_left: 0.0,
            steps_left: 200.0,
            hours_left: 0.5,
        };
        let date: NaiveDate = "2016-09-28".parse().unwrap();

        let report = day_report(&targets, date, &left);
        assert!((report.steps_completion - 0.9).abs() < 1e-9);
        assert!((report.hours_completion - 0.75).abs() < 1e-9);
        assert_eq!(report.kilocalories_completion, 1.0);
        assert_eq!(report.liters_completion, 1.0);
    }
}
