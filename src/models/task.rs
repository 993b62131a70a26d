use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Request body for creating a task.
///
/// Clients may echo back a full task DTO; `id` and `isCompleted` are ignored
/// because new tasks always start pending and get a server-assigned id.
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Must contain at least one non-whitespace character.
    #[validate(length(min = 1), custom = "not_blank")]
    pub description: String,

    /// Local date-time, e.g. `2025-09-22T12:00:00`.
    #[serde(default)]
    pub deadline_date_time: Option<NaiveDateTime>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("description must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// A task row. The owner reference is fixed at creation.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub description: String,
    pub deadline_date_time: Option<NaiveDateTime>,
    pub is_completed: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// The fields needed to insert a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: Uuid,
    pub description: String,
    pub deadline_date_time: Option<NaiveDateTime>,
}

impl From<TaskInput> for NewTask {
    fn from(input: TaskInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: input.description,
            deadline_date_time: input.deadline_date_time,
        }
    }
}

/// The externally visible shape of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDto {
    pub id: Uuid,
    pub description: String,
    pub deadline_date_time: Option<NaiveDateTime>,
    pub is_completed: bool,
}

impl From<Task> for TaskDto {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            description: task.description,
            deadline_date_time: task.deadline_date_time,
            is_completed: task.is_completed,
        }
    }
}
