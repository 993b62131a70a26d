use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Role, Task, User};

#[derive(Default)]
struct Users {
    next_id: i64,
    by_id: HashMap<i64, User>,
    ids_by_email: HashMap<String, i64>,
}

/// In-process `UserStore` and `TaskStore`.
///
/// Mirrors the Postgres store: unique emails, the same ownership predicate and
/// the same list ordering. Tasks are kept in insertion order so a stable sort
/// preserves creation order among equal deadlines.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Users>>,
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn is_owned(task: &Task, owner_id: i64, id: Uuid) -> bool {
    task.id == id && task.user_id == owner_id
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.ids_by_email.contains_key(&user.email) {
            return Err(AppError::DuplicateEmail(user.email));
        }

        users.next_id += 1;
        let created = User {
            id: users.next_id,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        users.ids_by_email.insert(created.email.clone(), created.id);
        users.by_id.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .ids_by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.by_id.get(&id).cloned())
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let Some(id) = users.ids_by_email.get(email).copied() else {
            return Ok(None);
        };
        Ok(users.by_id.get_mut(&id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create_task(&self, owner_id: i64, task: NewTask) -> Result<Task, AppError> {
        let created = Task {
            id: task.id,
            description: task.description,
            deadline_date_time: task.deadline_date_time,
            is_completed: false,
            user_id: owner_id,
            created_at: Utc::now(),
        };
        self.tasks.write().await.push(created.clone());
        Ok(created)
    }

    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .iter()
            .filter(|task| task.user_id == owner_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| (task.deadline_date_time.is_none(), task.deadline_date_time));
        Ok(tasks)
    }

    async fn find_task(&self, owner_id: i64, id: Uuid) -> Result<Option<Task>, AppError> {
        Ok(self
            .tasks
            .read()
            .await
            .iter()
            .find(|task| is_owned(task, owner_id, id))
            .cloned())
    }

    async fn mark_completed(&self, owner_id: i64, id: Uuid) -> Result<Option<Task>, AppError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks
            .iter_mut()
            .find(|task| is_owned(task, owner_id, id))
            .map(|task| {
                task.is_completed = true;
                task.clone()
            }))
    }

    async fn delete_task(&self, owner_id: i64, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|task| !is_owned(task, owner_id, id));
        Ok(tasks.len() < before)
    }
}
