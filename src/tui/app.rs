use chrono::{DateTime, Local};
use ratatui::widgets::TableState;

use crate::badge::{refresh_badge, TracingBadge};
use crate::collection::{TaskError, TaskList, TaskView};
use crate::commands::{add_task, edit_task, parse_interval_notation, persist, short_id, NewTask, TaskEdit};
use crate::ids::UuidGenerator;
use crate::models::Task;
use crate::renewal::Renewal;
use crate::storage::TaskStore;

#[derive(PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(PartialEq, Debug)]
pub enum InputField {
    None,
    Title,
    Due,
    Interval,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub title: String,
    pub interval: Option<String>,
    pub step: usize, // 0: Title, 1: Interval, 2: Due
}

pub struct App {
    pub list: TaskList,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<String>,
    pub add_state: AddState,
    /// Last action's outcome, shown in the help bar.
    pub status: Option<String>,
    pub badge: usize,
    pub bar_width: usize,
    /// Instant the current frame is rendered for.
    pub now: DateTime<Local>,
    store: Box<dyn TaskStore>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(store: Box<dyn TaskStore>, bar_width: usize) -> App {
        let mut app = App {
            list: TaskList::default(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            status: None,
            badge: 0,
            bar_width,
            now: Local::now(),
            store,
        };
        app.reload();
        app
    }

    pub fn views(&self) -> Vec<TaskView<'_>> {
        self.list.views(&self.now)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.list.tasks().get(i))
    }

    /// Selects the next task, wrapping around.
    pub fn next(&mut self) {
        if self.list.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.list.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task, wrapping around.
    pub fn previous(&mut self) {
        if self.list.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.list.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Re-reads the store and re-samples the clock, as on returning to the app.
    pub fn reload(&mut self) {
        self.now = Local::now();
        self.list = TaskList::new(self.store.load());
        self.after_change();
    }

    /// Renews the selected task.
    pub fn renew_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else { return };
        self.now = Local::now();
        match self.list.renewed(&id, &self.now) {
            Ok((list, renewal)) => {
                self.status = Some(match renewal {
                    Renewal::Delete => format!("Completed {}", short_id(&id)),
                    Renewal::Update { next_due_date } => {
                        format!("Renewed {}, next due {}", short_id(&id), next_due_date.date_naive())
                    }
                });
                self.commit(list);
                if let Some(i) = self.list.tasks().iter().position(|t| t.id == id) {
                    self.state.select(Some(i));
                }
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else { return };
        let result = self.list.without(&id);
        self.apply(result, format!("Deleted {}", short_id(&id)));
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(t) = self.selected_task() else { return };
        let id = t.id.clone();
        let prefill = match field {
            InputField::Title => t.title.clone(),
            InputField::Due => t.due_date.date_naive().to_string(),
            InputField::Interval if t.is_recurring => t.interval_label(),
            _ => String::new(),
        };
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
        self.input_field = field;
        self.input_buffer = prefill;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Normal => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let input = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => { // Title
                if !input.is_empty() {
                    self.add_state.title = input;
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Interval, blank for one-shot
                if !input.is_empty() {
                    if let Err(e) = parse_interval_notation(&input) {
                        self.status = Some(e.to_string());
                        return;
                    }
                }
                self.add_state.interval = (!input.is_empty()).then_some(input);
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => { // Due, blank for one interval from today
                let (every, unit) = match self.add_state.interval.as_deref().map(parse_interval_notation) {
                    Some(Ok((n, unit))) => (Some(n), Some(unit)),
                    _ => (None, None),
                };
                let new = NewTask {
                    title: self.add_state.title.clone(),
                    every,
                    unit,
                    due: (!input.is_empty()).then_some(input),
                };
                self.now = Local::now();
                match add_task(&self.list, &UuidGenerator, new, &self.now) {
                    Ok((list, id)) => {
                        self.status = Some(format!("Added {}", short_id(&id)));
                        self.commit(list);
                        self.cancel_input();
                    }
                    // Stay on this step so the date can be corrected.
                    Err(e) => self.status = Some(e.to_string()),
                }
            }
            _ => {}
        }
    }

    /// Handles input for the "Edit Task" mode.
    fn handle_editing_input(&mut self) {
        let Some(id) = self.target_id.clone() else { return };
        let input = self.input_buffer.trim().to_string();
        let edit = match self.input_field {
            InputField::Title => TaskEdit { title: Some(input), ..TaskEdit::default() },
            InputField::Due => TaskEdit { due: Some(input), ..TaskEdit::default() },
            InputField::Interval if input.is_empty() => TaskEdit { recurring: Some(false), ..TaskEdit::default() },
            InputField::Interval => match parse_interval_notation(&input) {
                Ok((every, unit)) => TaskEdit { every: Some(every), unit: Some(unit), ..TaskEdit::default() },
                Err(e) => {
                    self.status = Some(e.to_string());
                    return;
                }
            },
            InputField::None => return,
        };
        self.now = Local::now();
        let result = edit_task(&self.list, &id, edit, &self.now);
        self.apply(result, format!("Updated {}", short_id(&id)));
        self.cancel_input();
    }

    fn apply(&mut self, result: Result<TaskList, TaskError>, message: String) {
        match result {
            Ok(list) => {
                self.status = Some(message);
                self.commit(list);
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    /// Adopts `list` and persists it. The in-memory list wins if saving fails.
    fn commit(&mut self, list: TaskList) {
        self.list = list;
        if !persist(&*self.store, &self.list, true) {
            self.status = Some("Could not save tasks; changes kept for this session".to_string());
        }
        self.after_change();
    }

    fn after_change(&mut self) {
        self.badge = refresh_badge(&self.list, &self.now, &TracingBadge);
        if self.list.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.list.len() {
                self.state.select(Some(self.list.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntervalUnit;
    use crate::storage::MemoryStore;
    use chrono::Duration;
    use std::rc::Rc;

    /// Shares one MemoryStore between the app and the test.
    struct Shared(Rc<MemoryStore>);

    impl TaskStore for Shared {
        fn load(&self) -> Vec<Task> {
            self.0.load()
        }
        fn save(&self, tasks: &[Task]) -> Result<(), crate::storage::StoreError> {
            self.0.save(tasks)
        }
    }

    fn app_with(tasks: Vec<Task>) -> (App, Rc<MemoryStore>) {
        let store = Rc::new(MemoryStore::new(tasks));
        (App::new(Box::new(Shared(store.clone())), 10), store)
    }

    fn type_and_enter(app: &mut App, text: &str) {
        app.input_buffer = text.to_string();
        app.handle_input();
    }

    fn sample(id: &str, days: i64, recurring: bool) -> Task {
        let now = Local::now();
        let due = now + Duration::days(days);
        if recurring {
            Task::recurring(id.into(), id.into(), 7, IntervalUnit::Days, Some(due), &now)
        } else {
            Task::one_shot(id.into(), id.into(), due, &now)
        }
    }

    #[test]
    fn add_wizard_creates_recurring_task() {
        let (mut app, store) = app_with(Vec::new());
        app.start_add();
        type_and_enter(&mut app, "Water plants");
        type_and_enter(&mut app, "3d");
        type_and_enter(&mut app, "");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.list.len(), 1);
        let stored = store.load();
        assert_eq!(stored[0].title, "Water plants");
        assert_eq!(stored[0].interval, 3);
        assert!(stored[0].is_recurring);
    }

    #[test]
    fn one_shot_without_due_date_stays_in_wizard() {
        let (mut app, _store) = app_with(Vec::new());
        app.start_add();
        type_and_enter(&mut app, "Passport");
        type_and_enter(&mut app, "");
        type_and_enter(&mut app, "");
        assert_eq!(app.input_mode, InputMode::Adding);
        assert!(app.list.is_empty());
        assert!(app.status.is_some());
    }

    #[test]
    fn renewing_selected_one_shot_removes_it() {
        let (mut app, store) = app_with(vec![sample("a", 1, false), sample("b", 4, true)]);
        app.state.select(Some(0));
        app.renew_selected();
        assert_eq!(app.list.len(), 1);
        assert_eq!(store.load()[0].id, "b");
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn renewed_task_stays_selected_after_resort() {
        let (mut app, _store) = app_with(vec![sample("a", 1, true), sample("b", 4, true), sample("c", 5, true)]);
        app.state.select(Some(0));
        app.renew_selected();
        assert_eq!(app.state.selected(), Some(2));
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("a"));

        app.renew_selected();
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("a"));
        let order: Vec<&str> = app.list.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn edit_interval_blank_makes_task_one_shot() {
        let (mut app, _store) = app_with(vec![sample("a", 3, true)]);
        app.state.select(Some(0));
        app.start_edit(InputField::Interval);
        assert_eq!(app.input_buffer, "7d");
        type_and_enter(&mut app, "");
        assert!(!app.list.tasks()[0].is_recurring);
    }

    #[test]
    fn selection_wraps() {
        let (mut app, _store) = app_with(vec![sample("a", 1, true), sample("b", 2, true)]);
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(1));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn badge_counts_tasks_due_today() {
        let (app, _store) = app_with(vec![sample("a", 0, true), sample("b", -2, true), sample("c", 5, true)]);
        assert_eq!(app.badge, 2);
    }
}
