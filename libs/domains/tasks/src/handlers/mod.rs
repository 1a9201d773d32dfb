mod tasks;

use axum::{Router, routing::get};
use axum_helpers::ErrorResponse;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateTask, PatchTask, ReplaceTask, SortOrder, TaskResponse, TaskStatus};
use crate::pagination::PageMeta;
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI documentation for the task endpoints
#[derive(OpenApi)]
#[openapi(
    paths(
        tasks::list_tasks,
        tasks::get_task,
        tasks::create_task,
        tasks::update_task,
        tasks::partial_update_task,
        tasks::delete_task,
    ),
    components(
        schemas(TaskResponse, CreateTask, ReplaceTask, PatchTask, TaskStatus, SortOrder, PageMeta, ErrorResponse)
    ),
    tags(
        (name = "tasks", description = "Tasks owned by the authenticated user")
    )
)]
pub struct TasksApiDoc;

/// Task routes. Expects the bearer-auth middleware to be layered on by the caller.
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    Router::new()
        .route("/", get(tasks::list_tasks::<R>).post(tasks::create_task::<R>))
        .route(
            "/{task_id}",
            get(tasks::get_task::<R>)
                .put(tasks::update_task::<R>)
                .patch(tasks::partial_update_task::<R>)
                .delete(tasks::delete_task::<R>),
        )
        .with_state(Arc::new(service))
}
