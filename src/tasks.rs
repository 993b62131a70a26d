use log::debug;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskInput, User};
use crate::store::TaskStore;

/// Task operations on behalf of the current user.
///
/// Every method takes the owner explicitly and the store only ever sees
/// `(owner id, task id)` pairs, so a task is never reachable by id alone.
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

/// The one place a missing owned task becomes an error. Tasks owned by someone
/// else are indistinguishable from tasks that do not exist.
fn owned<T>(found: Option<T>, id: Uuid) -> Result<T, AppError> {
    found.ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Creates a pending task owned by `owner`.
    pub async fn create(&self, owner: &User, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let task = self
            .tasks
            .create_task(owner.id, NewTask::from(input))
            .await?;
        debug!("User {} created task {}", owner.id, task.id);
        Ok(task)
    }

    pub async fn list(&self, owner: &User) -> Result<Vec<Task>, AppError> {
        self.tasks.list_tasks(owner.id).await
    }

    pub async fn get(&self, owner: &User, id: Uuid) -> Result<Task, AppError> {
        owned(self.tasks.find_task(owner.id, id).await?, id)
    }

    /// Pending to completed. Completing a completed task is a no-op that still succeeds.
    pub async fn complete(&self, owner: &User, id: Uuid) -> Result<Task, AppError> {
        let task = owned(self.tasks.mark_completed(owner.id, id).await?, id)?;
        debug!("User {} completed task {}", owner.id, id);
        Ok(task)
    }

    pub async fn delete(&self, owner: &User, id: Uuid) -> Result<(), AppError> {
        let deleted = self.tasks.delete_task(owner.id, id).await?;
        owned(deleted.then_some(()), id)?;
        debug!("User {} deleted task {}", owner.id, id);
        Ok(())
    }
}
