//! Persistence seams for users and tasks.
//!
//! Every task operation is keyed by the owning user's id as well as the task id.
//! There is intentionally no way to look a task up by id alone.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, NewUser, Role, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::DuplicateEmail` if the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    /// Returns the updated user, or `None` if no user has that email.
    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, owner_id: i64, task: NewTask) -> Result<Task, AppError>;
    /// The owner's tasks by deadline ascending; tasks without a deadline come last,
    /// ties keep creation order.
    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, AppError>;
    async fn find_task(&self, owner_id: i64, id: Uuid) -> Result<Option<Task>, AppError>;
    /// Marks the task completed. Already-completed tasks are returned unchanged.
    async fn mark_completed(&self, owner_id: i64, id: Uuid) -> Result<Option<Task>, AppError>;
    /// Returns whether a task was removed.
    async fn delete_task(&self, owner_id: i64, id: Uuid) -> Result<bool, AppError>;
}
