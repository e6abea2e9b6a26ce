//! Age derivation and the calendar seam used to compute it.
//!
//! # Invariants
//! - Ages are whole years, never negative.
//! - An unknown birth date yields an unknown age, not zero.

use chrono::{Datelike, Local, NaiveDate};

/// Source of "today" for age computation.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Returns whole years elapsed between `date_of_birth` and `today`.
///
/// Birth dates after `today` clamp to 0.
pub fn age_on(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> Option<u32> {
    let dob = date_of_birth?;
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    Some(u32::try_from(years).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::{age_on, Clock, FixedClock};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birthday_not_yet_reached_subtracts_one() {
        let dob = Some(date(2000, 6, 15));
        assert_eq!(age_on(dob, date(2024, 6, 14)), Some(23));
        assert_eq!(age_on(dob, date(2024, 6, 15)), Some(24));
        assert_eq!(age_on(dob, date(2024, 5, 30)), Some(23));
        assert_eq!(age_on(dob, date(2024, 7, 1)), Some(24));
    }

    #[test]
    fn future_birth_date_clamps_to_zero() {
        assert_eq!(age_on(Some(date(2030, 1, 1)), date(2024, 6, 14)), Some(0));
        assert_eq!(age_on(Some(date(2024, 6, 20)), date(2024, 6, 14)), Some(0));
    }

    #[test]
    fn born_today_is_zero_not_absent() {
        assert_eq!(age_on(Some(date(2024, 6, 14)), date(2024, 6, 14)), Some(0));
    }

    #[test]
    fn missing_birth_date_is_absent() {
        assert_eq!(age_on(None, date(2024, 6, 14)), None);
    }

    #[test]
    fn leap_day_birthday_counts_from_march_in_common_years() {
        let dob = Some(date(2000, 2, 29));
        assert_eq!(age_on(dob, date(2023, 2, 28)), Some(22));
        assert_eq!(age_on(dob, date(2023, 3, 1)), Some(23));
    }

    #[test]
    fn fixed_clock_returns_pinned_date() {
        let clock = FixedClock(date(2024, 1, 2));
        assert_eq!(clock.today(), date(2024, 1, 2));
        assert_eq!((&clock).today(), date(2024, 1, 2));
    }
}
