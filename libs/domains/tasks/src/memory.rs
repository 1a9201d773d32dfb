use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::identity::OwnerId;
use crate::models::{SortOrder, Task};
use crate::pagination::PageWindow;
use crate::repository::{StoreError, StoreResult, TaskQuery, TaskRepository};

/// In-process store for tests and local runs.
///
/// When built with [`with_owners`](Self::with_owners), inserts for unknown
/// owners fail like a foreign-key violation would.
#[derive(Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
    owners: Option<Arc<RwLock<HashSet<OwnerId>>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owners(owners: impl IntoIterator<Item = OwnerId>) -> Self {
        Self {
            tasks: Arc::default(),
            owners: Some(Arc::new(RwLock::new(owners.into_iter().collect()))),
        }
    }

    /// No-op unless owner checks are enabled.
    pub async fn register_owner(&self, owner: OwnerId) {
        if let Some(owners) = &self.owners {
            owners.write().await.insert(owner);
        }
    }

    async fn check_owner(&self, owner: OwnerId) -> StoreResult<()> {
        match &self.owners {
            Some(owners) if !owners.read().await.contains(&owner) => Err(
                StoreError::ReferenceViolation(format!("owner {owner} does not exist")),
            ),
            _ => Ok(()),
        }
    }
}

fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find(
        &self,
        query: &TaskQuery,
        window: PageWindow,
        order: SortOrder,
    ) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;
        let mut matching: Vec<&Task> = tasks.values().filter(|t| query.matches(t)).collect();

        matching.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        if order == SortOrder::Desc {
            matching.reverse();
        }

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, query: &TaskQuery) -> StoreResult<u64> {
        let tasks = self.tasks.read().await;
        Ok(tasks.values().filter(|t| query.matches(t)).count() as u64)
    }

    async fn find_one(&self, id: &str, owner: OwnerId) -> StoreResult<Option<Task>> {
        let id = parse_id(id)?;
        let tasks = self.tasks.read().await;
        Ok(tasks.get(&id).filter(|t| t.owner_id == owner).cloned())
    }

    async fn insert(&self, task: Task) -> StoreResult<Task> {
        self.check_owner(task.owner_id).await?;

        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(StoreError::Other(format!("duplicate task id {}", task.id)));
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn save(&self, task: Task) -> StoreResult<Task> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(stored) if stored.owner_id == task.owner_id => {
                *stored = task.clone();
                Ok(task)
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn remove(&self, task: &Task) -> StoreResult<()> {
        let mut tasks = self.tasks.write().await;
        match tasks.get(&task.id) {
            Some(stored) if stored.owner_id == task.owner_id => {
                tasks.remove(&task.id);
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }
}
