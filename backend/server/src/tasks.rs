use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use catalog::{TASKS, Task};
use chrono::Utc;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, response::Envelope, state::AppState, utils::get_task_input};

fn not_found() -> AppError {
    AppError::NotFound("Task not found".to_string())
}

/// Ids that are not UUIDs can never match a stored task.
fn task_key(id: &str) -> Result<String, AppError> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| not_found())
}

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let mut tasks: Vec<Task> = state.store.list(TASKS).await?;
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Envelope::ok(tasks, "Tasks retrieved successfully"))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let key = task_key(&id)?;
    let task: Task = state.store.get(TASKS, &key).await?.ok_or_else(not_found)?;

    Ok(Envelope::ok(task, "Task retrieved successfully"))
}

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = get_task_input(body)?;
    let task = Task::create(input, Uuid::new_v4(), Utc::now())?;

    state.store.insert_new(TASKS, &task.id.to_string(), &task).await?;

    info!("Task created: {}", task.task_name);

    Ok(Envelope::created(task, "Task created successfully"))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let input = get_task_input(body)?;
    let key = task_key(&id)?;

    let existing: Task = state.store.get(TASKS, &key).await?.ok_or_else(not_found)?;
    let updated = existing.apply(input)?;

    state.store.put(TASKS, &key, &updated).await?;

    info!("Task updated: {}", updated.task_name);

    Ok(Envelope::ok(updated, "Task updated successfully"))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let key = task_key(&id)?;
    let task: Task = state.store.remove(TASKS, &key).await?.ok_or_else(not_found)?;

    info!("Task deleted: {}", task.task_name);

    Ok(Envelope::ok(task, "Task deleted successfully"))
}
