use async_trait::async_trait;
use log::info;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::models::{NewTask, NewUser, Role, Task, User};

const USER_COLUMNS: &str = "id, email, password_hash, role, created_at";
const TASK_COLUMNS: &str = "id, description, deadline_date_time, is_completed, user_id, created_at";

/// The ownership predicate. Every statement that addresses a single task
/// binds the task id as `$1` and the owner id as `$2`.
const OWNED_TASK: &str = "id = $1 AND user_id = $2";

/// `UserStore` and `TaskStore` backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url)
            .await?;
        info!(
            "Connected to database (max {} connections)",
            config.max_connections
        );
        Ok(Self::new(pool))
    }

    /// Applies the migrations in `migrations/`.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, role) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::DuplicateEmail(user.email.clone())
                }
                other => other.into(),
            })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_role(&self, email: &str, role: Role) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET role = $1 WHERE email = $2 RETURNING {}",
            USER_COLUMNS
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, owner_id: i64, task: NewTask) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, description, deadline_date_time, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(task.description)
            .bind(task.deadline_date_time)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn list_tasks(&self, owner_id: i64) -> Result<Vec<Task>, AppError> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE user_id = $1
             ORDER BY deadline_date_time ASC NULLS LAST, created_at ASC, id ASC",
            TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_task(&self, owner_id: i64, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE {}", TASK_COLUMNS, OWNED_TASK);
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn mark_completed(&self, owner_id: i64, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!(
            "UPDATE tasks SET is_completed = TRUE WHERE {} RETURNING {}",
            OWNED_TASK, TASK_COLUMNS
        );
        Ok(sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_task(&self, owner_id: i64, id: Uuid) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM tasks WHERE {}", OWNED_TASK);
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
