use chrono::{DateTime, Local};

use crate::dates::{add_days, add_months, normalize_to_day_boundary};
use crate::models::{IntervalUnit, Task};

/// What the owner of a task list should do with a renewed task.
#[derive(Debug, Clone, PartialEq)]
pub enum Renewal {
    /// One-shot task: remove it from the list.
    Delete,
    /// Recurring task: move it to its next occurrence.
    Update { next_due_date: DateTime<Local> },
}

/// Due date one interval after the start of `now`'s day.
///
/// Months are calendar months with the day clamped to the end of shorter
/// months. A result outside the representable range saturates to the start
/// of today.
pub fn next_due_date(interval: i64, unit: IntervalUnit, now: &DateTime<Local>) -> DateTime<Local> {
    let today = normalize_to_day_boundary(now);
    let next = match unit {
        IntervalUnit::Days => add_days(&today, interval),
        IntervalUnit::Weeks => add_days(&today, interval.saturating_mul(7)),
        IntervalUnit::Months => i32::try_from(interval)
            .ok()
            .and_then(|months| add_months(&today, months)),
    };
    next.map(|d| normalize_to_day_boundary(&d)).unwrap_or(today)
}

/// Renews `task` at `now`.
///
/// The next occurrence is anchored on `now` rather than the previous due
/// date, so renewing late does not leave the task permanently behind.
pub fn renew(task: &Task, now: &DateTime<Local>) -> Renewal {
    if !task.is_recurring {
        return Renewal::Delete;
    }
    Renewal::Update {
        next_due_date: next_due_date(task.interval, task.interval_unit, now),
    }
}
