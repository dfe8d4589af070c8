use std::fmt;

use chrono::{DateTime, Local};

use crate::models::Task;
use crate::progress::evaluate;

/// How pressing a task is, from its days remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    /// More than two days left.
    Normal,
    /// One or two days left.
    Warning,
    /// Due today.
    DueToday,
    /// Past its due date.
    Overdue,
}

impl Urgency {
    /// Classifies a days-remaining count. Every integer maps to exactly one tier.
    pub fn classify(days_remaining: i64) -> Urgency {
        if days_remaining <= 2 && days_remaining > 0 {
            Urgency::Warning
        } else if days_remaining == 0 {
            Urgency::DueToday
        } else if days_remaining < 0 {
            Urgency::Overdue
        } else {
            Urgency::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Urgency::Normal => "normal",
            Urgency::Warning => "soon",
            Urgency::DueToday => "today",
            Urgency::Overdue => "overdue",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Urgency of `task` as seen at `now`.
pub fn compute_urgency(task: &Task, now: &DateTime<Local>) -> Urgency {
    Urgency::classify(evaluate(task, now).days_remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_partition_the_integers() {
        for d in -1000..=1000 {
            let tier = Urgency::classify(d);
            let matches = [
                d > 2,
                d > 0 && d <= 2,
                d == 0,
                d < 0,
            ];
            assert_eq!(matches.iter().filter(|m| **m).count(), 1, "d = {d}");
            let expected = if d > 2 {
                Urgency::Normal
            } else if d > 0 {
                Urgency::Warning
            } else if d == 0 {
                Urgency::DueToday
            } else {
                Urgency::Overdue
            };
            assert_eq!(tier, expected, "d = {d}");
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(Urgency::classify(3), Urgency::Normal);
        assert_eq!(Urgency::classify(2), Urgency::Warning);
        assert_eq!(Urgency::classify(1), Urgency::Warning);
        assert_eq!(Urgency::classify(0), Urgency::DueToday);
        assert_eq!(Urgency::classify(-1), Urgency::Overdue);
        assert_eq!(Urgency::classify(i64::MIN), Urgency::Overdue);
        assert_eq!(Urgency::classify(i64::MAX), Urgency::Normal);
    }
}
