//! Predicates over decrypted values.
//!
//! Encrypted columns cannot be compared in SQL, so amount searches load the
//! caller's rows, decrypt them and apply an [`AmountFilter`]. Date columns are
//! stored in clear, and a [`DateWindow`] turns calendar days into UTC bounds
//! for the query.

use std::ops::{Bound, RangeBounds};

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::validation::{ValidationError, validate_amount_range, validate_date_range};

/// A comparison against a decrypted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountFilter {
    /// Numerically equal, ignoring scale (`1500` matches `1500.00`).
    Equal(Decimal),
    /// Strictly greater.
    Above(Decimal),
    /// Strictly less.
    Below(Decimal),
    /// Inclusive on both ends.
    Between {
        /// Lower bound.
        min: Decimal,
        /// Upper bound.
        max: Decimal,
    },
}

impl AmountFilter {
    /// Builds a checked [`AmountFilter::Between`].
    pub fn between(min: Decimal, max: Decimal) -> Result<Self, ValidationError> {
        validate_amount_range(min, max)?;
        Ok(Self::Between { min, max })
    }

    /// Returns true if `amount` satisfies the filter.
    #[must_use]
    pub fn matches(&self, amount: Decimal) -> bool {
        match *self {
            Self::Equal(value) => amount == value,
            Self::Above(value) => amount > value,
            Self::Below(value) => amount < value,
            Self::Between { min, max } => (min..=max).contains(&amount),
        }
    }
}

/// A range of calendar days, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Any time on the given day.
    On(NaiveDate),
    /// Strictly before the start of the day.
    Before(NaiveDate),
    /// Strictly after the start of the day, so later times on the day itself
    /// are included.
    After(NaiveDate),
    /// From the start of `start` through the end of `end`.
    Between {
        /// First day included.
        start: NaiveDate,
        /// Last day included.
        end: NaiveDate,
    },
}

impl DateWindow {
    /// Builds a checked [`DateWindow::Between`].
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        validate_date_range(start, end)?;
        Ok(Self::Between { start, end })
    }

    /// Lower bound of the window.
    #[must_use]
    pub fn lower_bound(&self) -> Bound<DateTime<Utc>> {
        match *self {
            Self::On(day) | Self::Between { start: day, .. } => Bound::Included(start_of_day(day)),
            Self::After(day) => Bound::Excluded(start_of_day(day)),
            Self::Before(_) => Bound::Unbounded,
        }
    }

    /// Upper bound of the window. Never inclusive.
    #[must_use]
    pub fn upper_bound(&self) -> Bound<DateTime<Utc>> {
        match *self {
            Self::On(day) | Self::Between { end: day, .. } => {
                Bound::Excluded(start_of_next_day(day))
            }
            Self::Before(day) => Bound::Excluded(start_of_day(day)),
            Self::After(_) => Bound::Unbounded,
        }
    }

    /// Returns true if `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        (self.lower_bound(), self.upper_bound()).contains(&at)
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn start_of_next_day(day: NaiveDate) -> DateTime<Utc> {
    day.checked_add_days(Days::new(1))
        .map_or(DateTime::<Utc>::MAX_UTC, start_of_day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[rstest]
    #[case(AmountFilter::Equal(dec!(1500)), dec!(1500.00), true)]
    #[case(AmountFilter::Equal(dec!(1500)), dec!(1500.01), false)]
    #[case(AmountFilter::Above(dec!(100)), dec!(100), false)]
    #[case(AmountFilter::Above(dec!(100)), dec!(100.01), true)]
    #[case(AmountFilter::Below(dec!(100)), dec!(99.99), true)]
    #[case(AmountFilter::Below(dec!(100)), dec!(100), false)]
    #[case(AmountFilter::Between { min: dec!(10), max: dec!(20) }, dec!(10), true)]
    #[case(AmountFilter::Between { min: dec!(10), max: dec!(20) }, dec!(20.00), true)]
    #[case(AmountFilter::Between { min: dec!(10), max: dec!(20) }, dec!(20.01), false)]
    fn test_amount_filter(
        #[case] filter: AmountFilter,
        #[case] amount: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.matches(amount), expected);
    }

    #[test]
    fn test_amount_between_checked() {
        assert!(AmountFilter::between(dec!(1), dec!(2)).is_ok());
        assert!(matches!(
            AmountFilter::between(dec!(2), dec!(1)),
            Err(ValidationError::AmountRange { .. })
        ));
    }

    #[test]
    fn test_on_covers_whole_day() {
        let window = DateWindow::On(day(2024, 3, 15));

        assert!(window.contains(at(2024, 3, 15, 0, 0)));
        assert!(window.contains(at(2024, 3, 15, 23, 59)));
        assert!(!window.contains(at(2024, 3, 16, 0, 0)));
        assert!(!window.contains(at(2024, 3, 14, 23, 59)));
    }

    #[test]
    fn test_before_excludes_the_day() {
        let before = DateWindow::Before(day(2024, 3, 15));

        assert!(!before.contains(at(2024, 3, 15, 0, 0)));
        assert!(!before.contains(at(2024, 3, 15, 12, 0)));
        assert!(before.contains(at(2024, 3, 14, 23, 59)));
        assert_eq!(before.lower_bound(), Bound::Unbounded);
    }

    #[test]
    fn test_after_starts_past_midnight_of_the_day() {
        let after = DateWindow::After(day(2024, 3, 15));

        assert!(!after.contains(at(2024, 3, 15, 0, 0)));
        assert!(after.contains(at(2024, 3, 15, 0, 1)));
        assert!(after.contains(at(2024, 3, 15, 15, 0)));
        assert!(after.contains(at(2024, 3, 16, 0, 0)));
        assert!(!after.contains(at(2024, 3, 14, 23, 59)));
        assert_eq!(after.lower_bound(), Bound::Excluded(at(2024, 3, 15, 0, 0)));
        assert_eq!(after.upper_bound(), Bound::Unbounded);
    }

    #[test]
    fn test_between_includes_end_day() {
        let window = DateWindow::between(day(2024, 1, 1), day(2024, 1, 31)).unwrap();

        assert!(window.contains(at(2024, 1, 1, 0, 0)));
        assert!(window.contains(at(2024, 1, 31, 18, 30)));
        assert!(!window.contains(at(2024, 2, 1, 0, 0)));
        assert_eq!(window.upper_bound(), Bound::Excluded(at(2024, 2, 1, 0, 0)));
    }

    #[test]
    fn test_between_rejects_reversed_range() {
        assert!(matches!(
            DateWindow::between(day(2024, 2, 1), day(2024, 1, 1)),
            Err(ValidationError::DateRange { .. })
        ));
    }

    #[test]
    fn test_last_representable_day() {
        let window = DateWindow::On(NaiveDate::MAX);
        assert_eq!(window.upper_bound(), Bound::Excluded(DateTime::<Utc>::MAX_UTC));
    }
}
