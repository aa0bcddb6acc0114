//! Days-overdue arithmetic for `DD/MM/YYYY` ship dates.
//!
//! Dates are interpreted as midnight UTC. The result is the ceiling of the
//! elapsed time in days, so any fraction of a day past the deadline counts
//! as a full day overdue.

use chrono::{DateTime, NaiveDate, Utc};

use crate::DateError;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Source of "now" for overdue calculations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses a `DD/MM/YYYY` date.
///
/// Components are trimmed and need not be zero-padded (`1/2/2024` is
/// accepted).
///
/// # Errors
///
/// Returns [`DateError::Malformed`] unless the input splits into exactly
/// three numeric components forming a real calendar date.
pub fn parse_ship_date(input: &str) -> Result<NaiveDate, DateError> {
    let malformed = |reason: &str| DateError::Malformed {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = input.split('/').map(str::trim).collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(malformed("expected three '/'-separated components"));
    };

    let day = day
        .parse::<u32>()
        .map_err(|_| malformed("day is not numeric"))?;
    let month = month
        .parse::<u32>()
        .map_err(|_| malformed("month is not numeric"))?;
    let year = year
        .parse::<i32>()
        .map_err(|_| malformed("year is not numeric"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| malformed("not a calendar date"))
}

/// Signed days between `now` and the given ship date, rounded up.
///
/// # Errors
///
/// Returns [`DateError::Malformed`] if `latest_ship_date` cannot be parsed.
pub fn days_overdue(latest_ship_date: &str, now: DateTime<Utc>) -> Result<i64, DateError> {
    let due = parse_ship_date(latest_ship_date)?.and_time(chrono::NaiveTime::MIN).and_utc();
    let elapsed_ms = (now - due).num_milliseconds();
    Ok(ceil_div(elapsed_ms, MILLIS_PER_DAY))
}

fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}
