use observability::TaskMetrics;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{TaskError, TaskResult};
use crate::identity::OwnerId;
use crate::models::{CreateTask, PageRequest, PatchTask, ReplaceTask, Task, TaskFilter, TaskResponse};
use crate::pagination::{Page, build_meta, check_reachable, compute_window};
use crate::repository::{StoreError, TaskQuery, TaskRepository};

/// Owner-scoped task operations.
///
/// Every call takes the authenticated owner first. Tasks belonging to anyone
/// else behave exactly like tasks that do not exist.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

fn record<T>(operation: &'static str, result: &TaskResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    TaskMetrics::record_operation(operation, outcome);
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Count first, reject unreachable pages, then read the window.
    ///
    /// Count and fetch are separate reads, so metadata may lag a concurrent
    /// write by one request.
    #[instrument(skip(self, filter), fields(owner_id = %owner, page = page.page, limit = page.limit))]
    pub async fn list_tasks(
        &self,
        owner: OwnerId,
        filter: TaskFilter,
        page: PageRequest,
    ) -> TaskResult<Page<TaskResponse>> {
        let result = self.list_inner(owner, filter, page).await;
        record("list", &result);
        if let Ok(listed) = &result {
            TaskMetrics::record_page_size(listed.data.len());
        }
        result
    }

    async fn list_inner(
        &self,
        owner: OwnerId,
        filter: TaskFilter,
        page: PageRequest,
    ) -> TaskResult<Page<TaskResponse>> {
        let window = compute_window(page.page, page.limit)?;
        let query = TaskQuery::for_owner(owner).with_filter(filter);

        let item_count = self
            .repository
            .count(&query)
            .await
            .map_err(|e| TaskError::Internal(e.to_string()))?;
        check_reachable(page.page, window, item_count)?;

        let tasks = if item_count == 0 {
            Vec::new()
        } else {
            self.repository
                .find(&query, window, page.order)
                .await
                .map_err(|e| TaskError::Internal(e.to_string()))?
        };

        let listed = Page {
            data: tasks,
            meta: build_meta(page.page, window.limit, item_count),
        };
        Ok(listed.map(TaskResponse::from))
    }

    #[instrument(skip(self), fields(owner_id = %owner))]
    pub async fn get_task(&self, owner: OwnerId, task_id: &str) -> TaskResult<TaskResponse> {
        let result = self.resolve(owner, task_id).await.map(TaskResponse::from);
        record("get", &result);
        result
    }

    /// Status defaults to `TO_DO`; the owner is always `owner`.
    #[instrument(skip(self, input), fields(owner_id = %owner, task_title = %input.title))]
    pub async fn create_task(&self, owner: OwnerId, input: CreateTask) -> TaskResult<TaskResponse> {
        let result = self.create_inner(owner, input).await;
        record("create", &result);
        result
    }

    async fn create_inner(&self, owner: OwnerId, input: CreateTask) -> TaskResult<TaskResponse> {
        input.validate()?;

        let task = self
            .repository
            .insert(Task::new(owner, input))
            .await
            .map_err(|e| match e {
                StoreError::ReferenceViolation(detail) => {
                    tracing::warn!(owner_id = %owner, %detail, "Task owner rejected by store");
                    TaskError::InvalidReference(owner)
                }
                other => TaskError::Internal(other.to_string()),
            })?;

        tracing::info!(task_id = %task.id, "Created task");
        Ok(task.into())
    }

    /// Full replace. Never creates.
    #[instrument(skip(self, input), fields(owner_id = %owner))]
    pub async fn update_task(
        &self,
        owner: OwnerId,
        task_id: &str,
        input: ReplaceTask,
    ) -> TaskResult<TaskResponse> {
        let result: TaskResult<TaskResponse> = async {
            input.validate()?;
            let mut task = self.resolve(owner, task_id).await?;
            task.apply_replace(input);
            self.persist(task, task_id).await
        }
        .await;
        record("update", &result);
        result
    }

    /// Merges present fields; an empty patch returns the task untouched.
    #[instrument(skip(self, patch), fields(owner_id = %owner))]
    pub async fn partial_update_task(
        &self,
        owner: OwnerId,
        task_id: &str,
        patch: PatchTask,
    ) -> TaskResult<TaskResponse> {
        let result: TaskResult<TaskResponse> = async {
            patch.validate()?;
            let mut task = self.resolve(owner, task_id).await?;
            if patch.is_empty() {
                return Ok(task.into());
            }
            task.apply_patch(patch);
            self.persist(task, task_id).await
        }
        .await;
        record("partial_update", &result);
        result
    }

    /// Returns the task as it was before removal.
    #[instrument(skip(self), fields(owner_id = %owner))]
    pub async fn delete_task(&self, owner: OwnerId, task_id: &str) -> TaskResult<TaskResponse> {
        let result: TaskResult<TaskResponse> = async {
            let task = self.resolve(owner, task_id).await?;
            self.repository
                .remove(&task)
                .await
                .map_err(|e| TaskError::from_store(e, task_id))?;

            tracing::info!(task_id = %task.id, "Deleted task");
            Ok(task.into())
        }
        .await;
        record("delete", &result);
        result
    }

    async fn resolve(&self, owner: OwnerId, task_id: &str) -> TaskResult<Task> {
        self.repository
            .find_one(task_id, owner)
            .await
            .map_err(|e| TaskError::from_store(e, task_id))?
            .ok_or_else(|| TaskError::NotFound(task_id.to_string()))
    }

    async fn persist(&self, task: Task, task_id: &str) -> TaskResult<TaskResponse> {
        self.repository
            .save(task)
            .await
            .map(TaskResponse::from)
            .map_err(|e| TaskError::from_store(e, task_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SortOrder, TaskStatus};
    use crate::pagination::{PageError, PageWindow};
    use crate::repository::MockTaskRepository;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn owner() -> OwnerId {
        OwnerId::new(Uuid::now_v7())
    }

    fn create_input(title: &str) -> CreateTask {
        CreateTask {
            title: title.to_string(),
            description: "details".to_string(),
            status: None,
            expiration_date: Utc::now() + Duration::days(1),
        }
    }

    fn stored(owner: OwnerId, title: &str) -> Task {
        Task::new(owner, create_input(title))
    }

    fn page(page: u64, limit: u64) -> PageRequest {
        PageRequest {
            page,
            limit,
            order: SortOrder::Desc,
        }
    }

    #[tokio::test]
    async fn test_list_empty_first_page_skips_fetch() {
        let mut mock = MockTaskRepository::new();
        mock.expect_count().times(1).returning(|_| Ok(0));
        mock.expect_find().never();

        let service = TaskService::new(mock);
        let result = service
            .list_tasks(owner(), TaskFilter::default(), page(1, 10))
            .await
            .unwrap();

        assert!(result.data.is_empty());
        assert_eq!(result.meta.page_count, 0);
        assert!(!result.meta.has_next_page);
    }

    #[tokio::test]
    async fn test_list_empty_second_page_is_out_of_range() {
        let mut mock = MockTaskRepository::new();
        mock.expect_count().returning(|_| Ok(0));
        mock.expect_find().never();

        let service = TaskService::new(mock);
        let err = service
            .list_tasks(owner(), TaskFilter::default(), page(2, 10))
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::Page(PageError::NoItems { page: 2 })));
        assert_eq!(err.kind(), "out_of_range");
    }

    #[tokio::test]
    async fn test_list_page_beyond_data_never_reads_window() {
        let mut mock = MockTaskRepository::new();
        mock.expect_count().returning(|_| Ok(25));
        mock.expect_find().never();

        let service = TaskService::new(mock);
        let err = service
            .list_tasks(owner(), TaskFilter::default(), page(4, 10))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "page 4 exceeds maximum page 3");
    }

    #[tokio::test]
    async fn test_list_last_page_uses_window_and_count() {
        let caller = owner();
        let mut mock = MockTaskRepository::new();
        mock.expect_count()
            .withf(move |q| q.owner() == caller)
            .returning(|_| Ok(25));
        mock.expect_find()
            .withf(move |q, window, order| {
                q.owner() == caller
                    && *window == PageWindow { offset: 20, limit: 10 }
                    && *order == SortOrder::Desc
            })
            .returning(move |_, _, _| Ok((0..5).map(|i| stored(caller, &format!("t{i}"))).collect()));

        let service = TaskService::new(mock);
        let result = service
            .list_tasks(caller, TaskFilter::default(), page(3, 10))
            .await
            .unwrap();

        assert_eq!(result.data.len(), 5);
        assert_eq!(result.meta.item_count, 25);
        assert_eq!(result.meta.page_count, 3);
        assert!(result.meta.has_previous_page);
        assert!(!result.meta.has_next_page);
    }

    #[tokio::test]
    async fn test_list_rejects_zero_limit_before_counting() {
        let mut mock = MockTaskRepository::new();
        mock.expect_count().never();

        let service = TaskService::new(mock);
        let err = service
            .list_tasks(owner(), TaskFilter::default(), page(1, 0))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_format");
    }

    #[tokio::test]
    async fn test_list_passes_filters_to_query() {
        let mut mock = MockTaskRepository::new();
        mock.expect_count()
            .withf(|q| q.title_contains() == Some("report") && q.status() == Some(TaskStatus::Done))
            .returning(|_| Ok(0));

        let service = TaskService::new(mock);
        let filter = TaskFilter {
            title: Some("report".to_string()),
            status: Some(TaskStatus::Done),
        };
        assert!(service.list_tasks(owner(), filter, page(1, 10)).await.is_ok());
    }

    #[tokio::test]
    async fn test_get_malformed_id_is_format_error() {
        let mut mock = MockTaskRepository::new();
        mock.expect_find_one()
            .withf(|id, _| id == "xyz")
            .returning(|id, _| Err(StoreError::MalformedId(id.to_string())));

        let service = TaskService::new(mock);
        let err = service.get_task(owner(), "xyz").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid task ID format: xyz");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut mock = MockTaskRepository::new();
        mock.expect_find_one().returning(|_, _| Ok(None));

        let service = TaskService::new(mock);
        let id = Uuid::now_v7().to_string();
        let err = service.get_task(owner(), &id).await.unwrap_err();

        assert!(matches!(err, TaskError::NotFound(ref v) if *v == id));
    }

    #[tokio::test]
    async fn test_create_defaults_status_and_uses_caller_as_owner() {
        let caller = owner();
        let mut mock = MockTaskRepository::new();
        mock.expect_insert()
            .withf(move |t| t.owner_id == caller && t.status == TaskStatus::ToDo)
            .returning(Ok);

        let service = TaskService::new(mock);
        let created = service.create_task(caller, create_input("New")).await.unwrap();

        assert_eq!(created.status, TaskStatus::ToDo);
        assert_eq!(created.owner_id, caller.as_uuid());
    }

    #[tokio::test]
    async fn test_create_reference_violation() {
        let mut mock = MockTaskRepository::new();
        mock.expect_insert().returning(|_| {
            Err(StoreError::ReferenceViolation(
                "violates foreign key constraint".to_string(),
            ))
        });

        let service = TaskService::new(mock);
        let err = service.create_task(owner(), create_input("x")).await.unwrap_err();

        assert!(matches!(err, TaskError::InvalidReference(_)));
        assert!(!err.to_string().contains("foreign key"));
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let mut mock = MockTaskRepository::new();
        mock.expect_insert().never();

        let service = TaskService::new(mock);
        let err = service.create_task(owner(), create_input("")).await.unwrap_err();

        assert!(matches!(err, TaskError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_of_foreign_task_is_not_found_and_never_saves() {
        let mut mock = MockTaskRepository::new();
        mock.expect_find_one().returning(|_, _| Ok(None));
        mock.expect_save().never();

        let service = TaskService::new(mock);
        let input = ReplaceTask {
            title: "Taken over".to_string(),
            description: String::new(),
            status: TaskStatus::Done,
            expiration_date: Utc::now(),
        };
        let err = service
            .update_task(owner(), &Uuid::now_v7().to_string(), input)
            .await
            .unwrap_err();

        assert!(matches!(err, TaskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_patch_returns_task_without_saving() {
        let caller = owner();
        let task = stored(caller, "Unchanged");
        let id = task.id.to_string();
        let expected = TaskResponse::from(task.clone());

        let mut mock = MockTaskRepository::new();
        mock.expect_find_one()
            .returning(move |_, _| Ok(Some(task.clone())));
        mock.expect_save().never();

        let service = TaskService::new(mock);
        let result = service
            .partial_update_task(caller, &id, PatchTask::default())
            .await
            .unwrap();

        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_patch_merges_and_saves() {
        let caller = owner();
        let task = stored(caller, "Draft");
        let id = task.id.to_string();

        let mut mock = MockTaskRepository::new();
        mock.expect_find_one()
            .returning(move |_, _| Ok(Some(task.clone())));
        mock.expect_save()
            .withf(|t| t.status == TaskStatus::InProgress && t.title == "Draft")
            .returning(Ok);

        let service = TaskService::new(mock);
        let patch = PatchTask {
            status: Some(TaskStatus::InProgress),
            ..Default::default()
        };
        let result = service.partial_update_task(caller, &id, patch).await.unwrap();

        assert_eq!(result.status, TaskStatus::InProgress);
        assert_eq!(result.title, "Draft");
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot() {
        let caller = owner();
        let task = stored(caller, "Old");
        let id = task.id.to_string();
        let expected = TaskResponse::from(task.clone());

        let mut mock = MockTaskRepository::new();
        mock.expect_find_one()
            .returning(move |_, _| Ok(Some(task.clone())));
        mock.expect_remove().times(1).returning(|_| Ok(()));

        let service = TaskService::new(mock);
        assert_eq!(service.delete_task(caller, &id).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_delete_race_maps_to_not_found() {
        let caller = owner();
        let task = stored(caller, "Racy");
        let id = task.id.to_string();

        let mut mock = MockTaskRepository::new();
        mock.expect_find_one()
            .returning(move |_, _| Ok(Some(task.clone())));
        mock.expect_remove().returning(|_| Err(StoreError::NotFound));

        let service = TaskService::new(mock);
        let err = service.delete_task(caller, &id).await.unwrap_err();
        assert!(matches!(err, TaskError::NotFound(_)));
    }
}
