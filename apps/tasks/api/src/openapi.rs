use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Tasks API",
        version = "0.1.0",
        description = "Multi-tenant task tracking: register, log in, manage your own tasks"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/auth", api = domain_users::UsersApiDoc),
        (path = "/tasks", api = domain_tasks::TasksApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_nests_domain_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in ["/auth/register", "/auth/login", "/tasks", "/tasks/{task_id}"] {
            assert!(paths.contains(&expected), "missing {expected} in {paths:?}");
        }
    }
}
