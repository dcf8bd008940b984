//! Resolves a month number into the calendar days the monthly queries cover.

use time::{Date, Month};

use crate::Error;

/// An inclusive range of calendar days covering one month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: Date,
    end: Date,
}

impl MonthRange {
    /// Create the range for `month` (1-12) in `year`.
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if `month` is not between 1 and 12.
    pub fn new(month: u8, year: i32) -> Result<Self, Error> {
        let month = Month::try_from(month).map_err(|_| {
            Error::InvalidParameter(format!("month must be between 1 and 12, got {month}"))
        })?;

        Self::for_month(month, year)
    }

    /// Create the range for `month` in `year`.
    ///
    /// The last day is the day before the first of the following month, so
    /// month lengths and leap years come from the calendar.
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if `year` is outside the supported range.
    pub fn for_month(month: Month, year: i32) -> Result<Self, Error> {
        let invalid_year =
            |error: time::error::ComponentRange| Error::InvalidParameter(format!("year {year}: {error}"));

        let start = Date::from_calendar_date(year, month, 1).map_err(invalid_year)?;

        let (next_year, next_month) = match month {
            Month::December => (year + 1, Month::January),
            month => (year, month.next()),
        };
        let end = Date::from_calendar_date(next_year, next_month, 1)
            .map_err(invalid_year)?
            .previous_day()
            .ok_or_else(|| Error::InvalidParameter(format!("year {year} is out of range")))?;

        Ok(Self { start, end })
    }

    /// The first day of the month.
    pub fn start(&self) -> Date {
        self.start
    }

    /// The last day of the month.
    pub fn end(&self) -> Date {
        self.end
    }
}

/// Which years a month filter covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearScope {
    /// Only the current year in the server's local timezone.
    #[default]
    Current,
    /// The same month in every year.
    All,
}

/// The month filter handed to the monthly queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    /// Transactions sold within the range.
    Range(MonthRange),
    /// Transactions sold in the month of any year.
    AnyYear(Month),
}

impl MonthFilter {
    /// Build the filter for `month` under `scope`, where `today` decides the current year.
    ///
    /// # Errors
    /// Returns [Error::InvalidParameter] if the range cannot be built.
    pub fn resolve(month: Month, scope: YearScope, today: Date) -> Result<Self, Error> {
        match scope {
            YearScope::Current => MonthRange::for_month(month, today.year()).map(Self::Range),
            YearScope::All => Ok(Self::AnyYear(month)),
        }
    }

    /// The month being filtered on.
    pub fn month(&self) -> Month {
        match self {
            MonthFilter::Range(range) => range.start().month(),
            MonthFilter::AnyYear(month) => *month,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use crate::Error;

    use super::{MonthFilter, MonthRange, YearScope};

    #[test]
    fn every_month_starts_on_day_one_and_ends_on_last_day() {
        let want_last_days = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

        for (month, want_last_day) in (1..=12).zip(want_last_days) {
            let range = MonthRange::new(month, 2023).unwrap();

            assert_eq!(range.start().day(), 1, "month {month}");
            assert_eq!(u8::from(range.start().month()), month, "month {month}");
            assert_eq!(range.end().day(), want_last_day, "month {month}");
            assert_eq!(u8::from(range.end().month()), month, "month {month}");
            assert_eq!(range.end().year(), 2023, "month {month}");
        }
    }

    #[test]
    fn february_has_29_days_in_leap_years() {
        assert_eq!(MonthRange::new(2, 2024).unwrap().end(), date!(2024 - 02 - 29));
        assert_eq!(MonthRange::new(2, 2000).unwrap().end(), date!(2000 - 02 - 29));
        assert_eq!(MonthRange::new(2, 1900).unwrap().end(), date!(1900 - 02 - 28));
        assert_eq!(MonthRange::new(2, 2025).unwrap().end(), date!(2025 - 02 - 28));
    }

    #[test]
    fn december_ends_in_the_same_year() {
        let range = MonthRange::new(12, 2024).unwrap();

        assert_eq!(range.start(), date!(2024 - 12 - 01));
        assert_eq!(range.end(), date!(2024 - 12 - 31));
    }

    #[test]
    fn rejects_months_outside_one_to_twelve() {
        for month in [0, 13, 255] {
            let result = MonthRange::new(month, 2024);

            assert!(
                matches!(result, Err(Error::InvalidParameter(_))),
                "month {month} gave {result:?}"
            );
        }
    }

    #[test]
    fn current_scope_uses_the_year_of_today() {
        let filter = MonthFilter::resolve(Month::March, YearScope::Current, date!(2026 - 10 - 16))
            .unwrap();

        assert_eq!(
            filter,
            MonthFilter::Range(MonthRange::new(3, 2026).unwrap())
        );
        assert_eq!(filter.month(), Month::March);
    }

    #[test]
    fn all_scope_ignores_the_year() {
        let filter =
            MonthFilter::resolve(Month::July, YearScope::All, date!(2026 - 10 - 16)).unwrap();

        assert_eq!(filter, MonthFilter::AnyYear(Month::July));
        assert_eq!(filter.month(), Month::July);
    }
}
