use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::dates::{days_between, normalize_to_day_boundary};
use crate::renewal::next_due_date;

/// Unit of a task's recurrence interval.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    #[default]
    Days,
    Weeks,
    Months,
}

impl IntervalUnit {
    /// Parses a unit name, returning `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "days" => Some(IntervalUnit::Days),
            "w" | "week" | "weeks" => Some(IntervalUnit::Weeks),
            "m" | "month" | "months" => Some(IntervalUnit::Months),
            _ => None,
        }
    }

    /// Single-letter suffix used in compact interval notation (`10d`, `2w`).
    pub fn suffix(self) -> char {
        match self {
            IntervalUnit::Days => 'd',
            IntervalUnit::Weeks => 'w',
            IntervalUnit::Months => 'm',
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalUnit::Days => "days",
            IntervalUnit::Weeks => "weeks",
            IntervalUnit::Months => "months",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown interval unit '{0}': use days, weeks or months")]
pub struct UnknownUnit(pub String);

impl FromStr for IntervalUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntervalUnit::parse(s).ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

/// A task on the list.
///
/// Tasks are values: edits produce a new `Task` with the same `id`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", from = "StoredTask")]
pub struct Task {
    /// Opaque unique identifier, fixed at creation.
    pub id: String,
    /// Free-text label.
    pub title: String,
    /// When the current occurrence is due, always local start-of-day.
    pub due_date: DateTime<Local>,
    /// Magnitude of the recurrence period. For one-shot tasks this is the
    /// number of days between creation (or last edit) and the due date.
    pub interval: i64,
    pub interval_unit: IntervalUnit,
    pub is_recurring: bool,
}

impl Task {
    /// Creates a recurring task.
    ///
    /// Without an explicit due date the first occurrence is due one interval
    /// from `now`.
    pub fn recurring(
        id: String,
        title: String,
        interval: i64,
        unit: IntervalUnit,
        due: Option<DateTime<Local>>,
        now: &DateTime<Local>,
    ) -> Task {
        let due_date = match due {
            Some(d) => normalize_to_day_boundary(&d),
            None => next_due_date(interval, unit, now),
        };
        Task {
            id,
            title,
            due_date,
            interval,
            interval_unit: unit,
            is_recurring: true,
        }
    }

    /// Creates a task that is deleted rather than renewed.
    pub fn one_shot(id: String, title: String, due: DateTime<Local>, now: &DateTime<Local>) -> Task {
        let due_date = normalize_to_day_boundary(&due);
        Task {
            id,
            title,
            interval: virtual_interval(&due_date, now),
            due_date,
            interval_unit: IntervalUnit::Days,
            is_recurring: false,
        }
    }

    pub fn with_title(self, title: String) -> Task {
        Task { title, ..self }
    }

    /// Moves the due date. One-shot tasks get their progress span re-derived
    /// from `now`.
    pub fn with_due_date(self, due: DateTime<Local>, now: &DateTime<Local>) -> Task {
        let due_date = normalize_to_day_boundary(&due);
        let interval = if self.is_recurring {
            self.interval
        } else {
            virtual_interval(&due_date, now)
        };
        Task {
            due_date,
            interval,
            ..self
        }
    }

    pub fn with_interval(self, interval: i64, unit: IntervalUnit) -> Task {
        Task {
            interval,
            interval_unit: unit,
            ..self
        }
    }

    /// Switches between recurring and one-shot.
    pub fn with_recurring(self, is_recurring: bool, now: &DateTime<Local>) -> Task {
        if is_recurring == self.is_recurring {
            return self;
        }
        if is_recurring {
            Task {
                is_recurring,
                ..self
            }
        } else {
            Task {
                is_recurring,
                interval: virtual_interval(&self.due_date, now),
                interval_unit: IntervalUnit::Days,
                ..self
            }
        }
    }

    /// Compact interval notation such as `10d` or `1m`; `once` for one-shot tasks.
    pub fn interval_label(&self) -> String {
        if self.is_recurring {
            format!("{}{}", self.interval, self.interval_unit.suffix())
        } else {
            "once".to_string()
        }
    }
}

/// Whole days from the start of `now`'s day to `due`.
fn virtual_interval(due: &DateTime<Local>, now: &DateTime<Local>) -> i64 {
    days_between(&normalize_to_day_boundary(now), due).round() as i64
}

/// On-disk shape of a task.
///
/// Older records may lack `isRecurring` or `intervalUnit`, carry numeric ids,
/// or hold fractional intervals. All defaulting happens in the conversion
/// to [`Task`].
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StoredTask {
    pub id: StoredId,
    #[serde(default)]
    pub title: String,
    pub due_date: DateTime<Local>,
    #[serde(default)]
    pub interval: f64,
    #[serde(default)]
    pub interval_unit: Option<String>,
    #[serde(default)]
    pub is_recurring: Option<bool>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum StoredId {
    Text(String),
    Number(i64),
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Task {
        let id = match stored.id {
            StoredId::Text(s) => s,
            StoredId::Number(n) => n.to_string(),
        };
        Task {
            id,
            title: stored.title,
            due_date: normalize_to_day_boundary(&stored.due_date),
            interval: stored.interval.round() as i64,
            interval_unit: stored
                .interval_unit
                .as_deref()
                .and_then(IntervalUnit::parse)
                .unwrap_or_default(),
            is_recurring: stored.is_recurring.unwrap_or(true),
        }
    }
}
