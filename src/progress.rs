use chrono::{DateTime, Local};

use crate::dates::days_between;
use crate::models::{IntervalUnit, Task};

/// Derived display values for one task at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// Elapsed share of the interval. Exceeds 1 once overdue and drops
    /// below 0 when the due date lies more than one interval away.
    pub fraction: f64,
    /// Whole days left: 1 the day before the due date, 0 on it, negative after.
    pub days_remaining: i64,
}

impl Progress {
    /// `fraction` bounded to `[0, 1]` for bar rendering.
    pub fn clamped(&self) -> f64 {
        self.fraction.clamp(0.0, 1.0)
    }

    pub fn percent(&self) -> u16 {
        (self.clamped() * 100.0).round() as u16
    }
}

/// Length of an interval in days. Months count as 30 days here.
pub fn interval_days(interval: i64, unit: IntervalUnit) -> i64 {
    match unit {
        IntervalUnit::Days => interval,
        IntervalUnit::Weeks => interval.saturating_mul(7),
        IntervalUnit::Months => interval.saturating_mul(30),
    }
}

/// Elapsed fraction of an `interval_days`-long span with `remaining` days to go.
pub fn fraction_elapsed(interval_days: f64, remaining: f64) -> f64 {
    if interval_days <= 0.0 {
        return 1.0;
    }
    (interval_days - remaining) / interval_days
}

/// Progress of `task` as seen at `now`.
pub fn evaluate(task: &Task, now: &DateTime<Local>) -> Progress {
    let remaining = days_between(now, &task.due_date);
    let fraction = if task.interval <= 0 {
        1.0
    } else {
        fraction_elapsed(interval_days(task.interval, task.interval_unit) as f64, remaining)
    };
    Progress {
        fraction,
        days_remaining: remaining.floor() as i64 + 1,
    }
}
