use chrono::{DateTime, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone};

/// Milliseconds in one calendar day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Number of calendar days from `start` to `end`, possibly fractional.
///
/// Both instants are compared on their own local wall clock rather than as
/// absolute UTC instants, so two local midnights are always a whole number of
/// days apart even when a DST transition sits between them.
///
/// Negative when `start` is after `end`.
pub fn days_between<A: TimeZone, B: TimeZone>(start: &DateTime<A>, end: &DateTime<B>) -> f64 {
    let span = end.naive_local() - start.naive_local();
    span.num_milliseconds() as f64 / MS_PER_DAY
}

/// Start of the local calendar day (00:00:00) containing `dt`.
pub fn normalize_to_day_boundary<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    at_wall_clock(&dt.timezone(), dt.date_naive(), NaiveTime::MIN).unwrap_or_else(|| dt.clone())
}

/// Last second (23:59:59) of the local calendar day containing `dt`.
pub fn end_of_day<Tz: TimeZone>(dt: &DateTime<Tz>) -> DateTime<Tz> {
    NaiveTime::from_hms_opt(23, 59, 59)
        .and_then(|time| at_wall_clock(&dt.timezone(), dt.date_naive(), time))
        .unwrap_or_else(|| dt.clone())
}

/// Shifts `dt` by `n` calendar days, keeping its local time of day.
///
/// Returns `None` if the result falls outside chrono's representable range.
pub fn add_days<Tz: TimeZone>(dt: &DateTime<Tz>, n: i64) -> Option<DateTime<Tz>> {
    let date = dt.date_naive();
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    }?;
    at_wall_clock(&dt.timezone(), shifted, dt.time())
}

/// Shifts `dt` by `n` calendar months, keeping its local time of day.
///
/// The day of month is clamped to the last day of the target month, so
/// January 31st plus one month is the last day of February.
pub fn add_months<Tz: TimeZone>(dt: &DateTime<Tz>, n: i32) -> Option<DateTime<Tz>> {
    let date = dt.date_naive();
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    }?;
    at_wall_clock(&dt.timezone(), shifted, dt.time())
}

/// Resolves a local wall-clock reading in `tz`.
///
/// Ambiguous readings (clocks turned back) take the earlier instant. A
/// reading inside a DST gap is pushed forward by an hour.
fn at_wall_clock<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
}
