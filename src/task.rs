//! Task model for the board.
//!
//! Tasks travel as camelCase JSON between the client and the backend. The
//! `order` field is a fractional sort key that is only meaningful relative
//! to other tasks with the same status.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Board column a task belongs to.
///
/// The REST backend spells the middle column `in_progress`; `in-progress`
/// is the display and command-line form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in_progress", alias = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    /// Columns in display order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }

    /// Column heading used when rendering the board
    pub fn title(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(Error::InvalidArgument(format!(
                "unknown task status '{other}': must be todo, in-progress, or done"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub order: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Task {
    /// Case-insensitive substring match on title or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .map(|description| description.to_lowercase().contains(&term))
                .unwrap_or(false)
    }

    /// Apply the present fields of a patch.
    pub fn apply_patch(&mut self, patch: &UpdateTask) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Payload for creating a task. The backend assigns id, order and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl CreateTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
}

impl UpdateTask {
    /// Patch produced by a drag: new column and sort key.
    pub fn placement(status: TaskStatus, order: f64) -> Self {
        Self {
            status: Some(status),
            order: Some(order),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Reject titles that are empty once trimmed.
pub fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task title cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Column order: `order` ascending, then creation time, then id.
pub fn compare_in_column(left: &Task, right: &Task) -> Ordering {
    left.order
        .partial_cmp(&right.order)
        .unwrap_or(Ordering::Equal)
        .then_with(|| left.created_at.cmp(&right.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

/// Tasks with the given status, sorted for display.
pub fn column<'a>(tasks: &'a [Task], status: TaskStatus) -> Vec<&'a Task> {
    let mut column: Vec<&Task> = tasks.iter().filter(|task| task.status == status).collect();
    column.sort_by(|left, right| compare_in_column(left, right));
    column
}

/// Largest order value in a column, floored at zero.
pub fn max_order(tasks: &[Task], status: TaskStatus) -> f64 {
    tasks
        .iter()
        .filter(|task| task.status == status)
        .map(|task| task.order)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, status: TaskStatus, order: f64) -> Task {
        let now = Utc::now();
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            status,
            order,
            created_at: now,
            updated_at: now,
            user_id: None,
        }
    }

    #[test]
    fn status_uses_backend_spelling_on_the_wire() {
        let status: TaskStatus = serde_json::from_str("\"in-progress\"").expect("status");
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&status).expect("serialize"),
            "\"in_progress\""
        );
        assert_eq!(status.to_string(), "in-progress");
        assert_eq!("In_Progress".parse::<TaskStatus>().expect("parse"), TaskStatus::InProgress);
        assert!("blocked".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn task_wire_format_is_camel_case() {
        let json = r#"{
            "id": "t1",
            "title": "Write docs",
            "status": "todo",
            "order": 1.5,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z",
            "userId": "u1"
        }"#;
        let task: Task = serde_json::from_str(json).expect("task");
        assert_eq!(task.order, 1.5);
        assert_eq!(task.user_id.as_deref(), Some("u1"));
        assert!(task.description.is_none());

        let value = serde_json::to_value(&task).expect("value");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn matches_title_or_description_case_insensitive() {
        let mut t = task("t1", "Buy Coffee", TaskStatus::Todo, 1.0);
        assert!(t.matches("coffee"));
        assert!(t.matches(""));
        assert!(!t.matches("tea"));
        t.description = Some("Green TEA too".to_string());
        assert!(t.matches("tea"));
    }

    #[test]
    fn apply_patch_keeps_absent_fields() {
        let mut t = task("t1", "Old", TaskStatus::Todo, 1.0);
        t.description = Some("Old desc".to_string());
        t.apply_patch(&UpdateTask {
            title: Some("New".to_string()),
            ..UpdateTask::default()
        });
        assert_eq!(t.title, "New");
        assert_eq!(t.description.as_deref(), Some("Old desc"));
        assert_eq!(t.status, TaskStatus::Todo);
    }

    #[test]
    fn update_payload_omits_absent_fields() {
        let patch = UpdateTask::placement(TaskStatus::Done, 2.5);
        let value = serde_json::to_value(&patch).expect("value");
        assert_eq!(value, serde_json::json!({ "status": "done", "order": 2.5 }));

        let patch = UpdateTask::placement(TaskStatus::InProgress, 1.0);
        let value = serde_json::to_value(&patch).expect("value");
        assert_eq!(value, serde_json::json!({ "status": "in_progress", "order": 1.0 }));
    }

    #[test]
    fn validate_title_rejects_blank() {
        assert!(validate_title("   ").is_err());
        assert_eq!(validate_title("  ship it ").expect("title"), "ship it");
    }

    #[test]
    fn column_sorts_by_order() {
        let tasks = vec![
            task("a", "A", TaskStatus::Todo, 3.0),
            task("b", "B", TaskStatus::Done, 1.0),
            task("c", "C", TaskStatus::Todo, 0.5),
        ];
        let ids: Vec<&str> = column(&tasks, TaskStatus::Todo)
            .iter()
            .map(|task| task.id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(max_order(&tasks, TaskStatus::Todo), 3.0);
        assert_eq!(max_order(&tasks, TaskStatus::InProgress), 0.0);
    }
}
