use chrono::{DateTime, Local};

use crate::dates::end_of_day;
use crate::models::Task;
use crate::progress::{evaluate, Progress};
use crate::renewal::{renew, Renewal};
use crate::urgency::Urgency;

/// Error type for task list operations
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("task id prefix is ambiguous: {0}")]
    AmbiguousId(String),
    #[error("task id already exists: {0}")]
    DuplicateId(String),
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("recurring tasks need a positive interval, got {0}")]
    InvalidInterval(i64),
    #[error("invalid interval '{0}': use a number with an optional d/w/m suffix, e.g. 10d")]
    InvalidIntervalNotation(String),
    #[error("invalid due date '{0}': use YYYY-MM-DD")]
    InvalidDate(String),
    #[error("a task needs an interval (--every) or a due date (--due)")]
    MissingSchedule,
}

/// One row of the rendered list: a task with its derived values.
#[derive(Debug, Clone)]
pub struct TaskView<'a> {
    pub task: &'a Task,
    pub progress: Progress,
    pub urgency: Urgency,
}

/// The task list, always ordered by ascending due date.
///
/// Every operation returns a new list; the receiver is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(mut tasks: Vec<Task>) -> TaskList {
        sort_by_due(&mut tasks);
        TaskList { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_vec(self) -> Vec<Task> {
        self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Finds a task by its full id or by a prefix matching exactly one id.
    pub fn resolve(&self, prefix: &str) -> Result<&Task, TaskError> {
        if let Some(t) = self.get(prefix) {
            return Ok(t);
        }
        let mut matches = self.tasks.iter().filter(|t| !prefix.is_empty() && t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(t), None) => Ok(t),
            (Some(_), Some(_)) => Err(TaskError::AmbiguousId(prefix.to_string())),
            _ => Err(TaskError::NotFound(prefix.to_string())),
        }
    }

    pub fn with_added(&self, task: Task) -> Result<TaskList, TaskError> {
        validate(&task)?;
        if self.get(&task.id).is_some() {
            return Err(TaskError::DuplicateId(task.id));
        }
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        Ok(TaskList::new(tasks))
    }

    /// Replaces the task `id` with `edit(task)`. The id cannot be changed.
    pub fn with_edited<F>(&self, id: &str, edit: F) -> Result<TaskList, TaskError>
    where
        F: FnOnce(Task) -> Task,
    {
        let idx = self.position(id)?;
        let original = self.tasks[idx].clone();
        let mut edited = edit(original);
        edited.id = self.tasks[idx].id.clone();
        validate(&edited)?;
        let mut tasks = self.tasks.clone();
        tasks[idx] = edited;
        Ok(TaskList::new(tasks))
    }

    pub fn without(&self, id: &str) -> Result<TaskList, TaskError> {
        let idx = self.position(id)?;
        let mut tasks = self.tasks.clone();
        tasks.remove(idx);
        Ok(TaskList { tasks })
    }

    /// Renews task `id` at `now` and applies the outcome to a new list.
    pub fn renewed(&self, id: &str, now: &DateTime<Local>) -> Result<(TaskList, Renewal), TaskError> {
        let idx = self.position(id)?;
        let renewal = renew(&self.tasks[idx], now);
        let list = match &renewal {
            Renewal::Delete => self.without(id)?,
            Renewal::Update { next_due_date } => {
                let mut tasks = self.tasks.clone();
                tasks[idx].due_date = *next_due_date;
                TaskList::new(tasks)
            }
        };
        Ok((list, renewal))
    }

    /// Number of tasks due no later than the end of `now`'s day.
    pub fn badge_count(&self, now: &DateTime<Local>) -> usize {
        let cutoff = end_of_day(now);
        self.tasks.iter().filter(|t| t.due_date <= cutoff).count()
    }

    /// Derived progress and urgency for every task, in list order.
    pub fn views(&self, now: &DateTime<Local>) -> Vec<TaskView<'_>> {
        self.tasks
            .iter()
            .map(|task| {
                let progress = evaluate(task, now);
                TaskView {
                    task,
                    progress,
                    urgency: Urgency::classify(progress.days_remaining),
                }
            })
            .collect()
    }

    fn position(&self, id: &str) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }
}

/// Stable sort by ascending due date; equal dates keep their order.
pub fn sort_by_due(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| a.due_date.cmp(&b.due_date));
}

fn validate(task: &Task) -> Result<(), TaskError> {
    if task.title.trim().is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    if task.is_recurring && task.interval <= 0 {
        return Err(TaskError::InvalidInterval(task.interval));
    }
    Ok(())
}
