//! Drag-end placement.
//!
//! A drop lands either on another task or on a column's drop zone. Both
//! cases resolve to a [`MovePlan`]: the column the dragged task ends up in
//! and a fractional `order` that sits between its new neighbours. Orders are
//! never renumbered; only the dragged task gets a new value.
//!
//! [`reorder_in_place`] is the index-based counterpart used by the local
//! store, where list position alone decides the sequence.

use serde::{Deserialize, Serialize};

use crate::task::{self, Task, TaskStatus};

/// Where a dragged task was released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DropTarget {
    Task(String),
    Column(TaskStatus),
}

impl DropTarget {
    pub fn task(id: impl Into<String>) -> Self {
        DropTarget::Task(id.into())
    }

    fn is(&self, task_id: &str) -> bool {
        matches!(self, DropTarget::Task(id) if id == task_id)
    }
}

/// Result of a drop: new column, new sort key, and the index the task
/// occupies in that column afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovePlan {
    pub task_id: String,
    pub from: TaskStatus,
    pub status: TaskStatus,
    pub order: f64,
    pub index: usize,
}

impl MovePlan {
    pub fn changes_status(&self) -> bool {
        self.from != self.status
    }
}

/// Compute where `active_id` lands when dropped on `target`.
///
/// Returns `None` when the drop is a no-op: the dragged task or the target
/// task is missing, or the task was dropped on itself.
pub fn plan_move(tasks: &[Task], active_id: &str, target: &DropTarget) -> Option<MovePlan> {
    if target.is(active_id) {
        return None;
    }
    let active = tasks.iter().find(|task| task.id == active_id)?;

    match target {
        DropTarget::Column(status) => {
            let others: Vec<Task> = tasks
                .iter()
                .filter(|task| task.id != active_id)
                .cloned()
                .collect();
            let index = task::column(&others, *status).len();
            Some(MovePlan {
                task_id: active.id.clone(),
                from: active.status,
                status: *status,
                order: task::max_order(&others, *status) + 1.0,
                index,
            })
        }
        DropTarget::Task(over_id) => {
            let over = tasks.iter().find(|task| &task.id == over_id)?;
            let status = over.status;
            let column = task::column(tasks, status);
            let to = column.iter().position(|task| task.id == over.id)?;
            let rest: Vec<&Task> = column
                .into_iter()
                .filter(|task| task.id != active_id)
                .collect();

            // Same column behaves like an array move: dragging down lands
            // after the target, dragging up lands before it. Across columns
            // the task is inserted before the target.
            let index = to.min(rest.len());
            let prev = index.checked_sub(1).map(|i| rest[i].order);
            let next = rest.get(index).map(|task| task.order);

            let order = match (prev, next) {
                // Nothing fits strictly between equal keys. Step out of the
                // tie on the target's side so the task still lands next to
                // the task it was dropped on.
                (Some(tied), Some(_)) if prev == next => {
                    if rest[index - 1].id == over.id {
                        let beyond = rest[index..].iter().map(|t| t.order).find(|&o| o > tied);
                        order_between(Some(tied), beyond)
                    } else {
                        let beyond = rest[..index].iter().rev().map(|t| t.order).find(|&o| o < tied);
                        order_between(beyond, Some(tied))
                    }
                }
                _ => order_between(prev, next),
            };

            Some(MovePlan {
                task_id: active.id.clone(),
                from: active.status,
                status,
                order,
                index,
            })
        }
    }
}

/// Sort key for a slot between two neighbours.
pub fn order_between(prev: Option<f64>, next: Option<f64>) -> f64 {
    match (prev, next) {
        (Some(prev), Some(next)) => (prev + next) / 2.0,
        (None, Some(next)) if next > 0.0 => next / 2.0,
        (None, Some(next)) => next - 1.0,
        (Some(prev), None) => prev + 1.0,
        (None, None) => 1.0,
    }
}

/// Index-based move over the whole list.
///
/// Within a column the dragged task is array-moved to the target's slot.
/// Across columns it takes the target's status and sits just before the
/// target; on a column drop it takes that status and goes to the end of the
/// list. Every other task keeps its relative position. Returns `false` when
/// nothing changed.
pub fn reorder_in_place(tasks: &mut Vec<Task>, active_id: &str, target: &DropTarget) -> bool {
    if target.is(active_id) {
        return false;
    }
    let Some(from) = tasks.iter().position(|task| task.id == active_id) else {
        return false;
    };

    match target {
        DropTarget::Column(status) => {
            let mut moved = tasks.remove(from);
            moved.status = *status;
            tasks.push(moved);
            true
        }
        DropTarget::Task(over_id) => {
            let Some(to) = tasks.iter().position(|task| &task.id == over_id) else {
                return false;
            };
            let status = tasks[to].status;
            let same_column = tasks[from].status == status;

            let mut moved = tasks.remove(from);
            moved.status = status;
            let insert_at = if same_column || from > to { to } else { to - 1 };
            tasks.insert(insert_at, moved);
            true
        }
    }
}
