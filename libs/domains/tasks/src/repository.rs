use async_trait::async_trait;
use thiserror::Error;

use crate::identity::OwnerId;
use crate::models::{SortOrder, Task, TaskFilter, TaskStatus};
use crate::pagination::PageWindow;

/// Failure categories every store must keep apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("malformed identifier: {0}")]
    MalformedId(String),

    #[error("referential constraint violated: {0}")]
    ReferenceViolation(String),

    #[error("record not found")]
    NotFound,

    #[error("storage failure: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owner-scoped selection. There is no way to build one without an owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    owner: OwnerId,
    title_contains: Option<String>,
    status: Option<TaskStatus>,
}

impl TaskQuery {
    pub fn for_owner(owner: OwnerId) -> Self {
        Self {
            owner,
            title_contains: None,
            status: None,
        }
    }

    pub fn with_filter(mut self, filter: TaskFilter) -> Self {
        self.title_contains = filter.title;
        self.status = filter.status;
        self
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn title_contains(&self) -> Option<&str> {
        self.title_contains.as_deref()
    }

    pub fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    pub fn matches(&self, task: &Task) -> bool {
        task.owner_id == self.owner
            && self
                .title_contains
                .as_deref()
                .is_none_or(|needle| task.title.contains(needle))
            && self.status.is_none_or(|status| task.status == status)
    }
}

/// Data access for tasks.
///
/// Lookups by id always carry the owner; a task owned by someone else is
/// indistinguishable from a missing one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Window of matching tasks ordered by `created_at`, then `id`.
    async fn find(
        &self,
        query: &TaskQuery,
        window: PageWindow,
        order: SortOrder,
    ) -> StoreResult<Vec<Task>>;

    async fn count(&self, query: &TaskQuery) -> StoreResult<u64>;

    /// `id` is passed through unparsed; a malformed one is `MalformedId`.
    async fn find_one(&self, id: &str, owner: OwnerId) -> StoreResult<Option<Task>>;

    async fn insert(&self, task: Task) -> StoreResult<Task>;

    /// Overwrites the stored row with the same id and owner.
    async fn save(&self, task: Task) -> StoreResult<Task>;

    async fn remove(&self, task: &Task) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTask;
    use chrono::Utc;
    use uuid::Uuid;

    fn task(owner: OwnerId, title: &str, status: TaskStatus) -> Task {
        Task::new(
            owner,
            CreateTask {
                title: title.to_string(),
                description: String::new(),
                status: Some(status),
                expiration_date: Utc::now(),
            },
        )
    }

    #[test]
    fn test_query_is_owner_scoped() {
        let alice = OwnerId::new(Uuid::now_v7());
        let bob = OwnerId::new(Uuid::now_v7());
        let query = TaskQuery::for_owner(alice);

        assert!(query.matches(&task(alice, "a", TaskStatus::ToDo)));
        assert!(!query.matches(&task(bob, "a", TaskStatus::ToDo)));
    }

    #[test]
    fn test_filters_intersect() {
        let owner = OwnerId::new(Uuid::now_v7());
        let query = TaskQuery::for_owner(owner).with_filter(TaskFilter {
            title: Some("report".to_string()),
            status: Some(TaskStatus::Done),
        });

        assert!(query.matches(&task(owner, "weekly report", TaskStatus::Done)));
        assert!(!query.matches(&task(owner, "weekly report", TaskStatus::ToDo)));
        assert!(!query.matches(&task(owner, "groceries", TaskStatus::Done)));
    }

    #[test]
    fn test_title_match_is_case_sensitive() {
        let owner = OwnerId::new(Uuid::now_v7());
        let query = TaskQuery::for_owner(owner).with_filter(TaskFilter {
            title: Some("Report".to_string()),
            status: None,
        });

        assert!(query.matches(&task(owner, "Monthly Report", TaskStatus::ToDo)));
        assert!(!query.matches(&task(owner, "monthly report", TaskStatus::ToDo)));
    }
}
