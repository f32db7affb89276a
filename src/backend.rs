//! Task persistence behind a common trait
//!
//! The board controller talks to a [`TaskBackend`]. [`RemoteBackend`] goes
//! over HTTP to the REST API; [`LocalBackend`] keeps tasks in `tasks.json`
//! inside the data directory so the board works offline.

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{self, CreateTask, Task, UpdateTask};

#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list(&self) -> Result<Vec<Task>>;
    async fn create(&self, new_task: CreateTask) -> Result<Task>;
    async fn update(&self, id: &str, patch: UpdateTask) -> Result<Task>;
    async fn delete(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl<T: TaskBackend + ?Sized> TaskBackend for Box<T> {
    async fn list(&self) -> Result<Vec<Task>> {
        (**self).list().await
    }

    async fn create(&self, new_task: CreateTask) -> Result<Task> {
        (**self).create(new_task).await
    }

    async fn update(&self, id: &str, patch: UpdateTask) -> Result<Task> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }
}

/// Backend that forwards every call to the REST API.
pub struct RemoteBackend {
    client: ApiClient,
}

impl RemoteBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl TaskBackend for RemoteBackend {
    async fn list(&self) -> Result<Vec<Task>> {
        self.client.get_tasks().await
    }

    async fn create(&self, new_task: CreateTask) -> Result<Task> {
        self.client.create_task(&new_task).await
    }

    async fn update(&self, id: &str, patch: UpdateTask) -> Result<Task> {
        // The API reports unknown tasks as a bare 404.
        self.client
            .update_task(id, &patch)
            .await
            .map_err(|err| match err {
                Error::NotFound(_) => Error::TaskNotFound(id.to_string()),
                other => other,
            })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete_task(id)
            .await
            .map_err(|err| match err {
                Error::NotFound(_) => Error::TaskNotFound(id.to_string()),
                other => other,
            })
    }
}

/// Backend storing tasks as JSON in the data directory.
///
/// File access and lock waits run on tokio's blocking pool.
pub struct LocalBackend {
    storage: Storage,
}

impl LocalBackend {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    async fn blocking<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Storage) -> Result<T> + Send + 'static,
    {
        let storage = self.storage.clone();
        tokio::task::spawn_blocking(move || work(storage))
            .await
            .map_err(|err| Error::Io(std::io::Error::other(err)))?
    }
}

#[async_trait]
impl TaskBackend for LocalBackend {
    async fn list(&self) -> Result<Vec<Task>> {
        self.blocking(|storage| storage.read_json_or_default(&storage.tasks_file()))
            .await
    }

    async fn create(&self, new_task: CreateTask) -> Result<Task> {
        let task = self
            .blocking(move |storage| {
                storage.update_json(&storage.tasks_file(), |tasks: &mut Vec<Task>| {
                    let status = new_task.status.unwrap_or_default();
                    let now = Utc::now();
                    let task = Task {
                        id: Uuid::new_v4().to_string(),
                        title: new_task.title,
                        description: new_task.description.filter(|d| !d.is_empty()),
                        status,
                        order: task::max_order(tasks, status) + 1.0,
                        created_at: now,
                        updated_at: now,
                        user_id: None,
                    };
                    tasks.push(task.clone());
                    Ok(task)
                })
            })
            .await?;
        tracing::info!(id = %task.id, status = %task.status, "created task");
        Ok(task)
    }

    async fn update(&self, id: &str, patch: UpdateTask) -> Result<Task> {
        let task_id = id.to_string();
        let task = self
            .blocking(move |storage| {
                storage.update_json(&storage.tasks_file(), |tasks: &mut Vec<Task>| {
                    // A status change without an explicit order lands at the
                    // end of the new column.
                    let fallback_order = match patch.status {
                        Some(status) if patch.order.is_none() => {
                            let current = tasks.iter().find(|task| task.id == task_id).map(|t| t.status);
                            if current == Some(status) {
                                None
                            } else {
                                Some(task::max_order(tasks, status) + 1.0)
                            }
                        }
                        _ => None,
                    };
                    let task = tasks
                        .iter_mut()
                        .find(|task| task.id == task_id)
                        .ok_or_else(|| Error::TaskNotFound(task_id.clone()))?;
                    task.apply_patch(&patch);
                    if let Some(order) = fallback_order {
                        task.order = order;
                    }
                    task.updated_at = Utc::now();
                    Ok(task.clone())
                })
            })
            .await?;
        tracing::info!(id, status = %task.status, order = task.order, "updated task");
        Ok(task)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let task_id = id.to_string();
        self.blocking(move |storage| {
            storage.update_json(&storage.tasks_file(), |tasks: &mut Vec<Task>| {
                let index = tasks
                    .iter()
                    .position(|task| task.id == task_id)
                    .ok_or_else(|| Error::TaskNotFound(task_id.clone()))?;
                tasks.remove(index);
                Ok(())
            })
        })
        .await?;
        tracing::info!(id, "deleted task");
        Ok(())
    }
}
