use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_helpers::{AuthUser, ErrorResponse, ValidatedJson, ValidatedQuery};
use std::sync::Arc;

use crate::error::TaskResult;
use crate::identity::OwnerId;
use crate::models::{CreateTask, ListTasksQuery, PatchTask, ReplaceTask, TaskResponse};
use crate::pagination::Page;
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// List the caller's tasks, one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = "tasks",
    params(ListTasksQuery),
    responses(
        (status = 200, description = "Page of tasks", body = Page<TaskResponse>),
        (status = 400, description = "Malformed query or page out of range", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    )
)]
pub async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: AuthUser,
    ValidatedQuery(query): ValidatedQuery<ListTasksQuery>,
) -> TaskResult<Json<Page<TaskResponse>>> {
    let (filter, page) = query.into_parts();
    let tasks = service.list_tasks(OwnerId::from(&user), filter, page).await?;
    Ok(Json(tasks))
}

#[utoipa::path(
    get,
    path = "/{task_id}",
    tag = "tasks",
    params(("task_id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 400, description = "Malformed task ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> TaskResult<impl IntoResponse> {
    let task = service.get_task(OwnerId::from(&user), &task_id).await?;
    Ok(Json(task))
}

/// Create a task owned by the caller
#[utoipa::path(
    post,
    path = "",
    tag = "tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse)
    )
)]
pub async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service.create_task(OwnerId::from(&user), input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Replace every mutable field of a task
#[utoipa::path(
    put,
    path = "/{task_id}",
    tag = "tasks",
    params(("task_id" = String, Path, description = "Task ID")),
    request_body = ReplaceTask,
    responses(
        (status = 200, description = "Task replaced", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: AuthUser,
    Path(task_id): Path<String>,
    ValidatedJson(input): ValidatedJson<ReplaceTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service
        .update_task(OwnerId::from(&user), &task_id, input)
        .await?;
    Ok(Json(task))
}

/// Update only the fields present in the body
#[utoipa::path(
    patch,
    path = "/{task_id}",
    tag = "tasks",
    params(("task_id" = String, Path, description = "Task ID")),
    request_body = PatchTask,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn partial_update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: AuthUser,
    Path(task_id): Path<String>,
    ValidatedJson(patch): ValidatedJson<PatchTask>,
) -> TaskResult<impl IntoResponse> {
    let task = service
        .partial_update_task(OwnerId::from(&user), &task_id, patch)
        .await?;
    Ok(Json(task))
}

/// Delete a task and return what was removed
#[utoipa::path(
    delete,
    path = "/{task_id}",
    tag = "tasks",
    params(("task_id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Deleted task snapshot", body = TaskResponse),
        (status = 400, description = "Malformed task ID", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    user: AuthUser,
    Path(task_id): Path<String>,
) -> TaskResult<impl IntoResponse> {
    let task = service.delete_task(OwnerId::from(&user), &task_id).await?;
    Ok(Json(task))
}
