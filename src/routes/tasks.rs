use crate::{
    app::AppState,
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskDto, TaskInput},
};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use uuid::Uuid;

/// Lists the authenticated user's tasks.
///
/// Tasks are ordered by `deadlineDateTime` ascending; tasks without a deadline
/// come last.
///
/// ## Responses:
/// - `200 OK`: JSON array of task DTOs.
/// - `401 Unauthorized`: Missing, invalid or expired token.
#[get("")]
pub async fn list_tasks(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tasks: Vec<TaskDto> = state
        .tasks
        .list(&user)
        .await?
        .into_iter()
        .map(TaskDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a pending task owned by the authenticated user.
///
/// ## Request Body:
/// - `description`: required, not blank.
/// - `deadlineDateTime` (optional): local date-time such as `2025-09-22T12:00:00`.
///
/// ## Responses:
/// - `200 OK`: The created task DTO.
/// - `400 Bad Request`: Malformed body or blank description.
/// - `401 Unauthorized`: Missing, invalid or expired token.
#[post("")]
pub async fn create_task(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    let task = state.tasks.create(&user, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskDto::from(task)))
}

/// Fetches one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: The task DTO.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task = state.tasks.get(&user, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskDto::from(task)))
}

/// Marks a task completed.
///
/// ## Responses:
/// - `200 OK`: The task DTO with `isCompleted: true`, also when it already was.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[patch("/{id}")]
pub async fn complete_task(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task = state.tasks.complete(&user, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskDto::from(task)))
}

/// Deletes a task permanently.
///
/// ## Responses:
/// - `200 OK`: Empty body.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    AuthenticatedUser(user): AuthenticatedUser,
    state: web::Data<AppState>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.tasks.delete(&user, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
