use chrono::{DateTime, Local, NaiveDate, TimeZone};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::{info, warn};

use crate::badge::{refresh_badge, BadgeNotifier};
use crate::collection::{TaskError, TaskList};
use crate::ids::IdGenerator;
use crate::models::{IntervalUnit, Task};
use crate::renewal::Renewal;
use crate::storage::TaskStore;
use crate::urgency::Urgency;

/// Fields of a task about to be created.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    /// Recurrence magnitude; `None` makes a one-shot task.
    pub every: Option<i64>,
    pub unit: Option<IntervalUnit>,
    /// `YYYY-MM-DD`. Optional for recurring tasks.
    pub due: Option<String>,
}

/// Requested changes to an existing task; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub due: Option<String>,
    pub every: Option<i64>,
    pub unit: Option<IntervalUnit>,
    pub recurring: Option<bool>,
}

/// Parses a `YYYY-MM-DD` date as the start of that local day.
pub fn parse_due(s: &str) -> Result<DateTime<Local>, TaskError> {
    let invalid = || TaskError::InvalidDate(s.to_string());
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?)
        .earliest()
        .ok_or_else(invalid)
}

/// Parses compact interval notation: `10`, `10d`, `2w`, `1m`.
pub fn parse_interval_notation(s: &str) -> Result<(i64, IntervalUnit), TaskError> {
    let invalid = || TaskError::InvalidIntervalNotation(s.to_string());
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, suffix) = trimmed.split_at(split);
    let interval: i64 = digits.parse().map_err(|_| invalid())?;
    let unit = if suffix.is_empty() {
        IntervalUnit::Days
    } else {
        IntervalUnit::parse(suffix).ok_or_else(invalid)?
    };
    if interval <= 0 {
        return Err(TaskError::InvalidInterval(interval));
    }
    Ok((interval, unit))
}

/// Adds a task to `list`, returning the new list and the new task's id.
pub fn add_task(
    list: &TaskList,
    ids: &dyn IdGenerator,
    new: NewTask,
    now: &DateTime<Local>,
) -> Result<(TaskList, String), TaskError> {
    let due = new.due.as_deref().map(parse_due).transpose()?;
    let id = ids.next_id();
    let task = match (new.every, due) {
        (Some(every), due) => Task::recurring(
            id.clone(),
            new.title,
            every,
            new.unit.unwrap_or_default(),
            due,
            now,
        ),
        (None, Some(due)) => Task::one_shot(id.clone(), new.title, due, now),
        (None, None) => return Err(TaskError::MissingSchedule),
    };
    let list = list.with_added(task)?;
    info!(%id, "task added");
    Ok((list, id))
}

/// Applies `edit` to the task whose id starts with `id`.
pub fn edit_task(
    list: &TaskList,
    id: &str,
    edit: TaskEdit,
    now: &DateTime<Local>,
) -> Result<TaskList, TaskError> {
    let id = list.resolve(id)?.id.clone();
    let due = edit.due.as_deref().map(parse_due).transpose()?;
    // Giving an interval implies the task recurs unless told otherwise.
    let recurring = edit
        .recurring
        .or_else(|| edit.every.map(|_| true));
    let updated = list.with_edited(&id, |mut t| {
        if let Some(r) = recurring {
            t = t.with_recurring(r, now);
        }
        if t.is_recurring && (edit.every.is_some() || edit.unit.is_some()) {
            let interval = edit.every.unwrap_or(t.interval);
            let unit = edit.unit.unwrap_or(t.interval_unit);
            t = t.with_interval(interval, unit);
        }
        if let Some(title) = edit.title {
            t = t.with_title(title);
        }
        if let Some(due) = due {
            t = t.with_due_date(due, now);
        }
        t
    })?;
    info!(%id, "task edited");
    Ok(updated)
}

/// Saves `list`. A failed save is reported but the caller's in-memory list
/// stays authoritative.
pub fn persist(store: &dyn TaskStore, list: &TaskList, silent: bool) -> bool {
    match store.save(list.tasks()) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "failed to save tasks");
            if !silent { eprintln!("Failed to save tasks: {}", e); }
            false
        }
    }
}

/// Text progress bar of `width` cells.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn days_left_label(days: i64) -> String {
    match days {
        d if d < 0 => format!("{}d overdue", d.unsigned_abs()),
        0 => "today".to_string(),
        1 => "1 day".to_string(),
        d => format!("{} days", d),
    }
}

/// First eight characters of an id, enough to pass back as a prefix.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Creates a task and stores it.
pub fn cmd_add(store: &dyn TaskStore, ids: &dyn IdGenerator, new: NewTask, silent: bool) -> Result<String, TaskError> {
    let now = Local::now();
    let list = TaskList::new(store.load());
    let (list, id) = add_task(&list, ids, new, &now)?;
    persist(store, &list, silent);
    if let Some(t) = list.get(&id) {
        if !silent { println!("Task added (id = {}), due {}", short_id(&id), t.due_date.date_naive()); }
    }
    Ok(id)
}

/// Renews a task: recurring tasks move to their next due date, one-shot
/// tasks are removed.
pub fn cmd_renew(store: &dyn TaskStore, id: &str, silent: bool) -> Result<Renewal, TaskError> {
    let now = Local::now();
    let list = TaskList::new(store.load());
    let id = list.resolve(id)?.id.clone();
    let (list, renewal) = list.renewed(&id, &now)?;
    persist(store, &list, silent);
    match &renewal {
        Renewal::Delete => {
            info!(%id, "one-shot task completed");
            if !silent { println!("Task {} done and removed.", short_id(&id)); }
        }
        Renewal::Update { next_due_date } => {
            info!(%id, next_due = %next_due_date, "task renewed");
            if !silent { println!("Task {} renewed, next due {}", short_id(&id), next_due_date.date_naive()); }
        }
    }
    Ok(renewal)
}

/// Edits a task's details.
pub fn cmd_edit(store: &dyn TaskStore, id: &str, edit: TaskEdit, silent: bool) -> Result<(), TaskError> {
    let now = Local::now();
    let list = TaskList::new(store.load());
    let list = edit_task(&list, id, edit, &now)?;
    persist(store, &list, silent);
    if !silent { println!("Task {} updated.", short_id(id)); }
    Ok(())
}

/// Removes a task without renewing it.
pub fn cmd_remove(store: &dyn TaskStore, id: &str, silent: bool) -> Result<(), TaskError> {
    let list = TaskList::new(store.load());
    let id = list.resolve(id)?.id.clone();
    let list = list.without(&id)?;
    persist(store, &list, silent);
    info!(%id, "task removed");
    if !silent { println!("Task {} removed.", short_id(&id)); }
    Ok(())
}

/// Reports how many tasks are due by the end of today.
pub fn cmd_badge(store: &dyn TaskStore, notifier: &dyn BadgeNotifier) -> usize {
    let list = TaskList::new(store.load());
    refresh_badge(&list, &Local::now(), notifier)
}

pub fn urgency_color(urgency: Urgency) -> Color {
    match urgency {
        Urgency::Normal => Color::Green,
        Urgency::Warning => Color::Yellow,
        Urgency::DueToday => Color::Red,
        Urgency::Overdue => Color::DarkRed,
    }
}

/// Prints the task list as a table, soonest due first.
pub fn cmd_list(store: &dyn TaskStore, bar_width: usize) {
    let list = TaskList::new(store.load());
    if list.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Every").add_attribute(Attribute::Bold),
            Cell::new("Progress").add_attribute(Attribute::Bold),
            Cell::new("Left").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let now = Local::now();
    for view in list.views(&now) {
        let t = view.task;
        let color = urgency_color(view.urgency);
        table.add_row(vec![
            Cell::new(short_id(&t.id)),
            Cell::new(&t.title),
            Cell::new(t.due_date.date_naive()),
            Cell::new(t.interval_label()),
            Cell::new(format!(
                "{} {:>3}%",
                progress_bar(view.progress.fraction, bar_width),
                view.progress.percent()
            ))
            .fg(color),
            Cell::new(days_left_label(view.progress.days_remaining)),
            Cell::new(view.urgency).fg(color),
        ]);
    }

    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_notation_forms() {
        assert_eq!(parse_interval_notation("10").unwrap(), (10, IntervalUnit::Days));
        assert_eq!(parse_interval_notation("10d").unwrap(), (10, IntervalUnit::Days));
        assert_eq!(parse_interval_notation(" 2w ").unwrap(), (2, IntervalUnit::Weeks));
        assert_eq!(parse_interval_notation("3months").unwrap(), (3, IntervalUnit::Months));
        assert!(matches!(parse_interval_notation("0d"), Err(TaskError::InvalidInterval(0))));
        assert!(matches!(parse_interval_notation("w"), Err(TaskError::InvalidIntervalNotation(_))));
        assert!(matches!(parse_interval_notation("5y"), Err(TaskError::InvalidIntervalNotation(_))));
    }

    #[test]
    fn due_dates_parse_to_local_midnight() {
        let d = parse_due("2022-04-06").unwrap();
        assert_eq!(d.date_naive(), NaiveDate::from_ymd_opt(2022, 4, 6).unwrap());
        assert_eq!(d, crate::dates::normalize_to_day_boundary(&d));
        assert!(matches!(parse_due("06/04/2022"), Err(TaskError::InvalidDate(_))));
    }

    #[test]
    fn bar_rendering() {
        assert_eq!(progress_bar(0.0, 4), "░░░░");
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(1.7, 4), "████");
        assert_eq!(progress_bar(-0.3, 4), "░░░░");
    }

    #[test]
    fn days_left_labels() {
        assert_eq!(days_left_label(-3), "3d overdue");
        assert_eq!(days_left_label(0), "today");
        assert_eq!(days_left_label(1), "1 day");
        assert_eq!(days_left_label(12), "12 days");
    }
}
