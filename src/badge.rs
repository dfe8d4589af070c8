use chrono::{DateTime, Local};
use tracing::info;

use crate::collection::TaskList;

/// Platform badge integrations implement this to show how many tasks are due.
pub trait BadgeNotifier {
    fn set_badge_count(&self, count: usize);
}

/// Records the badge count as a tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingBadge;

impl BadgeNotifier for TracingBadge {
    fn set_badge_count(&self, count: usize) {
        info!(count, "badge count updated");
    }
}

/// Pushes the number of tasks due by the end of today to `notifier`.
pub fn refresh_badge(list: &TaskList, now: &DateTime<Local>, notifier: &dyn BadgeNotifier) -> usize {
    let count = list.badge_count(now);
    notifier.set_badge_count(count);
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IntervalUnit, Task};
    use chrono::TimeZone;
    use std::cell::Cell;

    #[derive(Default)]
    struct Recorder(Cell<Option<usize>>);

    impl BadgeNotifier for Recorder {
        fn set_badge_count(&self, count: usize) {
            self.0.set(Some(count));
        }
    }

    #[test]
    fn notifies_with_due_count() {
        let now = Local.with_ymd_and_hms(2022, 4, 5, 9, 0, 0).earliest().unwrap();
        let task = |id: &str, day: u32| {
            let due = Local.with_ymd_and_hms(2022, 4, day, 0, 0, 0).earliest().unwrap();
            Task::recurring(id.into(), id.into(), 3, IntervalUnit::Days, Some(due), &now)
        };
        let list = TaskList::new(vec![task("a", 3), task("b", 5), task("c", 6)]);
        let recorder = Recorder::default();
        assert_eq!(refresh_badge(&list, &now, &recorder), 2);
        assert_eq!(recorder.0.get(), Some(2));
    }
}
