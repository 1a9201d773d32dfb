use axum::{Router, middleware::from_fn_with_state};
use axum_helpers::jwt_auth_middleware;
use domain_tasks::{PgTaskRepository, TaskService};

/// Every task route requires a bearer token.
pub fn router(state: &crate::state::AppState) -> Router {
    let service = TaskService::new(PgTaskRepository::new(state.db.clone()));

    domain_tasks::router(service)
        .route_layer(from_fn_with_state(state.jwt_auth.clone(), jwt_auth_middleware))
}
