//! Unit conversion rules.
//!
//! Only two conversions exist:
//! - glasses of a drink into liters (a glass is a quarter liter)
//! - any move event into hours, using the time it spanned

use crate::{Category, Error, EventRecord, Result, Unit};

/// Liters held by one glass
pub const LITERS_PER_GLASS: f64 = 0.25;

/// Express a record's quantity in `target`.
///
/// Returns the quantity unchanged when the units already match, otherwise
/// applies one of the fixed rules or fails with [`Error::UnconvertibleUnit`].
pub fn convert(record: &EventRecord, target: &Unit) -> Result<f64> {
    if &record.unit == target {
        return Ok(record.quantity);
    }

    match (target, &record.unit, record.category) {
        (Unit::Liter, Unit::Glass, _) => Ok(record.quantity * LITERS_PER_GLASS),
        (Unit::Hour, _, Category::Move) => Ok(record.duration_seconds as f64 / 3600.0),
        _ => Err(Error::UnconvertibleUnit {
            record_id: record.id,
            category: record.category,
            from: record.unit.clone(),
            to: target.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn record(category: Category, unit: Unit, quantity: f64, duration_seconds: i64) -> EventRecord {
        EventRecord {
            id: Uuid::new_v4(),
            category,
            label: None,
            unit,
            quantity,
            timestamp: "2016-09-28T09:30:00".parse::<NaiveDateTime>().unwrap(),
            duration_seconds,
        }
    }

    #[test]
    fn test_same_unit_passes_through() {
        let r = record(Category::Eat, Unit::Kilocalorie, 204.0, 0);
        assert_eq!(convert(&r, &Unit::Kilocalorie).unwrap(), 204.0);
    }

    #[test]
    fn test_glass_to_liter() {
        let r = record(Category::Drink, Unit::Glass, 1.0, 0);
        assert_eq!(convert(&r, &Unit::Liter).unwrap(), 0.25);

        let r = record(Category::Drink, Unit::Glass, 3.0, 0);
        assert_eq!(convert(&r, &Unit::Liter).unwrap(), 0.75);
    }

    #[test]
    fn test_move_to_hours_uses_duration() {
        let r = record(Category::Move, Unit::Step, 300.0, 30 * 60);
        assert_eq!(convert(&r, &Unit::Hour).unwrap(), 0.5);

        let r = record(Category::Move, Unit::Step, 1000.0, 2 * 3600);
        assert_eq!(convert(&r, &Unit::Hour).unwrap(), 2.0);
    }

    #[test]
    fn test_unknown_conversion_fails() {
        let r = record(Category::Drink, Unit::Other("cup".into()), 1.0, 0);
        let err = convert(&r, &Unit::Liter).unwrap_err();
        match err {
            Error::UnconvertibleUnit { record_id, from, to, .. } => {
                assert_eq!(record_id, r.id);
                assert_eq!(from, Unit::Other("cup".into()));
                assert_eq!(to, Unit::Liter);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_hours_only_for_move_events() {
        let r = record(Category::Eat, Unit::Kilocalorie, 200.0, 0);
        assert!(matches!(
            convert(&r, &Unit::Hour),
            Err(Error::UnconvertibleUnit { .. })
        ));
    }
}
