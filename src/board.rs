//! Board controller
//!
//! Glues the [`BoardState`] reducer to a [`TaskBackend`]. Moves are applied
//! optimistically and rolled back when the backend rejects them; every
//! successful mutation is followed by a refresh from the backend.

use crate::backend::TaskBackend;
use crate::error::{Error, Result};
use crate::reorder::{DropTarget, MovePlan};
use crate::store::{Action, BoardState, Outcome};
use crate::task::{self, CreateTask, Task, TaskStatus, UpdateTask};

/// Input from the create/edit form. `id` is set when editing.
#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

/// One rendered column
#[derive(Debug)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

pub struct BoardController<B> {
    backend: B,
    state: BoardState,
}

impl<B: TaskBackend> BoardController<B> {
    pub fn new(backend: B) -> Self {
        Self::with_state(backend, BoardState::new())
    }

    pub fn with_state(backend: B, state: BoardState) -> Self {
        Self { backend, state }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BoardState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the cached task list with the backend's.
    pub async fn load(&mut self) -> Result<()> {
        match self.backend.list().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "loaded tasks");
                self.state.apply(Action::SetTasks(tasks));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load tasks");
                self.state.apply(Action::SetError(Some(err.to_string())));
                Err(err)
            }
        }
    }

    /// Refresh after a mutation. The mutation already succeeded, so a
    /// failed refresh keeps the local view, clears the error flag and is
    /// only logged.
    async fn invalidate(&mut self) {
        self.state.apply(Action::SetError(None));
        match self.backend.list().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "refreshed tasks");
                self.state.apply(Action::SetTasks(tasks));
            }
            Err(err) => {
                tracing::warn!(error = %err, "refresh failed, keeping local view");
            }
        }
    }

    pub fn drag_start(&mut self, id: &str) {
        self.state.apply(Action::DragStart(id.to_string()));
    }

    /// Drop `active` on `target`.
    ///
    /// Returns `Ok(None)` for a no-op drop. On backend failure the task list
    /// is restored to its pre-drag contents and the error is returned.
    pub async fn drag_end(&mut self, active: &str, target: DropTarget) -> Result<Option<MovePlan>> {
        self.state.apply(Action::DragEnd);

        let previous = self.state.tasks.clone();
        let plan = match self.state.apply(Action::MoveTask {
            active: active.to_string(),
            over: target,
        }) {
            Outcome::Moved(plan) => plan,
            _ => {
                tracing::debug!(active, "drop ignored");
                return Ok(None);
            }
        };

        let patch = UpdateTask::placement(plan.status, plan.order);
        match self.backend.update(&plan.task_id, patch).await {
            Ok(_) => {
                tracing::info!(
                    id = %plan.task_id,
                    from = %plan.from,
                    to = %plan.status,
                    order = plan.order,
                    "moved task"
                );
                self.invalidate().await;
                Ok(Some(plan))
            }
            Err(err) => {
                tracing::warn!(id = %plan.task_id, error = %err, "move rejected, rolling back");
                self.state.apply(Action::SetTasks(previous));
                self.state.apply(Action::SetError(Some(err.to_string())));
                Err(err)
            }
        }
    }

    /// Create or edit a task from form input.
    pub async fn submit_form(&mut self, form: TaskForm) -> Result<Task> {
        let title = task::validate_title(&form.title)?;

        let result = match form.id {
            Some(id) => {
                let patch = UpdateTask {
                    title: Some(title),
                    description: form.description,
                    status: form.status,
                    order: None,
                };
                self.backend.update(&id, patch).await
            }
            None => {
                let new_task = CreateTask {
                    title,
                    description: form.description.filter(|d| !d.trim().is_empty()),
                    status: form.status,
                };
                self.backend.create(new_task).await
            }
        };

        match result {
            Ok(task) => {
                self.invalidate().await;
                Ok(task)
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving task failed");
                self.state.apply(Action::SetError(Some(err.to_string())));
                Err(err)
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        if let Err(err) = self.backend.delete(id).await {
            tracing::warn!(id, error = %err, "delete failed");
            self.state.apply(Action::SetError(Some(err.to_string())));
            return Err(err);
        }
        self.invalidate().await;
        Ok(())
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.apply(Action::SetSearchTerm(term.into()));
    }

    /// The three columns, filtered by the search term.
    pub fn columns(&self) -> Vec<Column<'_>> {
        TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                tasks: self.state.column(status),
            })
            .collect()
    }

    pub fn find(&self, id: &str) -> Result<&Task> {
        self.state
            .find(id)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }
}
