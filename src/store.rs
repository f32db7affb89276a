//! Board state and its reducer.
//!
//! [`BoardState`] is a plain value owned by whoever drives the board. All
//! mutations go through [`BoardState::apply`] with an [`Action`], so the
//! transitions can be tested without any I/O.

use chrono::Utc;
use uuid::Uuid;

use crate::reorder::{self, DropTarget, MovePlan};
use crate::task::{self, CreateTask, Task, TaskStatus, UpdateTask, User};

/// UI-only fields. `search_term` is the part that survives restarts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub search_term: String,
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub auth_initialized: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    pub tasks: Vec<Task>,
    pub ui: UiState,
    /// Task currently being dragged
    pub active_task: Option<String>,
    /// Message from the last failed backend call
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Action {
    SetTasks(Vec<Task>),
    AddTask(CreateTask),
    UpdateTask { id: String, patch: UpdateTask },
    DeleteTask(String),
    MoveTask { active: String, over: DropTarget },
    ApplyMove(MovePlan),
    SetSearchTerm(String),
    SetUser(Option<User>),
    Logout,
    SetAuthInitialized(bool),
    DragStart(String),
    DragEnd,
    SetError(Option<String>),
}

/// What an action did, for callers that need the new id or a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    Changed,
    Created(String),
    Moved(MovePlan),
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::SetTasks(tasks) => {
                self.tasks = tasks;
                Outcome::Changed
            }
            Action::AddTask(new_task) => {
                let id = self.add_task(new_task);
                Outcome::Created(id)
            }
            Action::UpdateTask { id, patch } => {
                let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
                    return Outcome::Unchanged;
                };
                task.apply_patch(&patch);
                task.updated_at = Utc::now();
                Outcome::Changed
            }
            Action::DeleteTask(id) => match self.tasks.iter().position(|task| task.id == id) {
                Some(index) => {
                    self.tasks.remove(index);
                    Outcome::Changed
                }
                None => Outcome::Unchanged,
            },
            Action::MoveTask { active, over } => {
                let Some(plan) = reorder::plan_move(&self.tasks, &active, &over) else {
                    return Outcome::Unchanged;
                };
                reorder::reorder_in_place(&mut self.tasks, &active, &over);
                self.place(&plan);
                Outcome::Moved(plan)
            }
            Action::ApplyMove(plan) => {
                if self.place(&plan) {
                    Outcome::Moved(plan)
                } else {
                    Outcome::Unchanged
                }
            }
            Action::SetSearchTerm(term) => {
                self.ui.search_term = term;
                Outcome::Changed
            }
            Action::SetUser(user) => {
                self.ui.is_authenticated = user.is_some();
                self.ui.user = user;
                Outcome::Changed
            }
            Action::Logout => {
                self.ui.user = None;
                self.ui.is_authenticated = false;
                self.tasks.clear();
                self.active_task = None;
                Outcome::Changed
            }
            Action::SetAuthInitialized(initialized) => {
                self.ui.auth_initialized = initialized;
                Outcome::Changed
            }
            Action::DragStart(id) => {
                self.active_task = self.find(&id).map(|task| task.id.clone());
                Outcome::Changed
            }
            Action::DragEnd => {
                self.active_task = None;
                Outcome::Changed
            }
            Action::SetError(message) => {
                self.last_error = message;
                Outcome::Changed
            }
        }
    }

    fn add_task(&mut self, new_task: CreateTask) -> String {
        let status = new_task.status.unwrap_or_default();
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let order = task::max_order(&self.tasks, status) + 1.0;
        self.tasks.push(Task {
            id: id.clone(),
            title: new_task.title,
            description: new_task.description.filter(|d| !d.is_empty()),
            status,
            order,
            created_at: now,
            updated_at: now,
            user_id: self.ui.user.as_ref().map(|user| user.id.clone()),
        });
        id
    }

    fn place(&mut self, plan: &MovePlan) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == plan.task_id) else {
            return false;
        };
        task.status = plan.status;
        task.order = plan.order;
        task.updated_at = Utc::now();
        true
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Tasks matching the current search term, in list order.
    pub fn filtered(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.matches(&self.ui.search_term))
            .collect()
    }

    /// One column, filtered by the search term and sorted for display.
    pub fn column(&self, status: TaskStatus) -> Vec<&Task> {
        task::column(&self.tasks, status)
            .into_iter()
            .filter(|task| task.matches(&self.ui.search_term))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(state: &BoardState) -> Vec<&str> {
        state.tasks.iter().map(|task| task.title.as_str()).collect()
    }

    fn add(state: &mut BoardState, title: &str, status: TaskStatus) -> String {
        match state.apply(Action::AddTask(CreateTask::new(title).with_status(status))) {
            Outcome::Created(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn add_task_assigns_unique_id_and_default_status() {
        let mut state = BoardState::new();
        let first = match state.apply(Action::AddTask(
            CreateTask::new("New Task").with_description("Description"),
        )) {
            Outcome::Created(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        };
        let second = add(&mut state, "Other", TaskStatus::Todo);

        assert_eq!(state.tasks.len(), 2);
        assert_ne!(first, second);
        let task = state.find(&first).expect("task");
        assert_eq!(task.title, "New Task");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.order, 1.0);
        assert_eq!(state.find(&second).expect("task").order, 2.0);
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut state = BoardState::new();
        let keep = add(&mut state, "Keep", TaskStatus::Todo);
        let drop = add(&mut state, "Drop", TaskStatus::Todo);

        assert_eq!(state.apply(Action::DeleteTask(drop.clone())), Outcome::Changed);
        assert_eq!(state.tasks.len(), 1);
        assert!(state.find(&keep).is_some());
        assert_eq!(state.apply(Action::DeleteTask(drop)), Outcome::Unchanged);
        assert_eq!(state.tasks.len(), 1);
    }

    #[test]
    fn update_merges_patch() {
        let mut state = BoardState::new();
        let id = match state.apply(Action::AddTask(
            CreateTask::new("Old Title").with_description("Old Desc"),
        )) {
            Outcome::Created(id) => id,
            other => panic!("unexpected outcome {other:?}"),
        };

        state.apply(Action::UpdateTask {
            id: id.clone(),
            patch: UpdateTask {
                title: Some("New Title".to_string()),
                ..UpdateTask::default()
            },
        });

        let task = state.find(&id).expect("task");
        assert_eq!(task.title, "New Title");
        assert_eq!(task.description.as_deref(), Some("Old Desc"));
    }

    #[test]
    fn move_onto_task_in_other_column_changes_status() {
        let mut state = BoardState::new();
        let one = add(&mut state, "Task 1", TaskStatus::Todo);
        let two = add(&mut state, "Task 2", TaskStatus::InProgress);

        state.apply(Action::DragStart(one.clone()));
        assert_eq!(state.active_task.as_deref(), Some(one.as_str()));

        let outcome = state.apply(Action::MoveTask {
            active: one.clone(),
            over: DropTarget::Task(two),
        });
        assert!(matches!(outcome, Outcome::Moved(_)));
        assert_eq!(state.find(&one).expect("task").status, TaskStatus::InProgress);
    }

    #[test]
    fn move_within_column_reorders_list() {
        let mut state = BoardState::new();
        let one = add(&mut state, "Task 1", TaskStatus::Todo);
        add(&mut state, "Task 2", TaskStatus::Todo);
        let three = add(&mut state, "Task 3", TaskStatus::Todo);
        assert_eq!(titles(&state), vec!["Task 1", "Task 2", "Task 3"]);

        state.apply(Action::MoveTask {
            active: three,
            over: DropTarget::Task(one),
        });

        assert_eq!(titles(&state), vec!["Task 3", "Task 1", "Task 2"]);
        let column: Vec<&str> = state
            .column(TaskStatus::Todo)
            .iter()
            .map(|task| task.title.as_str())
            .collect();
        assert_eq!(column, vec!["Task 3", "Task 1", "Task 2"]);
    }

    #[test]
    fn move_onto_column_appends_to_end() {
        let mut state = BoardState::new();
        let one = add(&mut state, "Task 1", TaskStatus::Todo);
        add(&mut state, "Done A", TaskStatus::Done);
        add(&mut state, "Done B", TaskStatus::Done);

        state.apply(Action::MoveTask {
            active: one.clone(),
            over: DropTarget::Column(TaskStatus::Done),
        });

        let done: Vec<&str> = state
            .column(TaskStatus::Done)
            .iter()
            .map(|task| task.id.as_str())
            .collect();
        assert_eq!(done.last().copied(), Some(one.as_str()));
        assert!(state.column(TaskStatus::Todo).is_empty());
    }

    #[test]
    fn move_of_unknown_task_is_silent_no_op() {
        let mut state = BoardState::new();
        let one = add(&mut state, "Task 1", TaskStatus::Todo);
        let before = state.tasks.clone();

        let outcome = state.apply(Action::MoveTask {
            active: "missing".to_string(),
            over: DropTarget::Task(one),
        });
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(state.tasks, before);
    }

    #[test]
    fn search_filters_columns() {
        let mut state = BoardState::new();
        add(&mut state, "Buy coffee", TaskStatus::Todo);
        add(&mut state, "Write report", TaskStatus::Todo);
        add(&mut state, "Coffee machine repair", TaskStatus::Done);

        state.apply(Action::SetSearchTerm("COFFEE".to_string()));
        assert_eq!(state.filtered().len(), 2);
        assert_eq!(state.column(TaskStatus::Todo).len(), 1);
        assert_eq!(state.column(TaskStatus::Done).len(), 1);
    }

    #[test]
    fn auth_transitions() {
        let mut state = BoardState::new();
        add(&mut state, "Task", TaskStatus::Todo);

        state.apply(Action::SetUser(Some(User {
            id: "u1".to_string(),
            email: "a@example.com".to_string(),
        })));
        assert!(state.ui.is_authenticated);

        state.apply(Action::SetAuthInitialized(true));
        state.apply(Action::Logout);
        assert!(!state.ui.is_authenticated);
        assert!(state.ui.user.is_none());
        assert!(state.tasks.is_empty());
        assert!(state.ui.auth_initialized);
    }

    #[test]
    fn drag_start_on_unknown_task_records_nothing() {
        let mut state = BoardState::new();
        state.apply(Action::DragStart("ghost".to_string()));
        assert!(state.active_task.is_none());
    }
}
