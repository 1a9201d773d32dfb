use async_trait::async_trait;
use database::postgres::{DbFailure, classify};
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::entity::{self, Column, Entity};
use crate::identity::OwnerId;
use crate::models::{SortOrder, Task};
use crate::pagination::PageWindow;
use crate::repository::{StoreError, StoreResult, TaskQuery, TaskRepository};

pub struct PgTaskRepository {
    db: DatabaseConnection,
}

impl PgTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn store_error(err: DbErr) -> StoreError {
    match classify(&err) {
        DbFailure::ForeignKeyViolation(detail) => StoreError::ReferenceViolation(detail),
        DbFailure::InvalidTextRepresentation(detail) => StoreError::MalformedId(detail),
        DbFailure::UniqueViolation(_) | DbFailure::Other => StoreError::Other(err.to_string()),
    }
}

fn parse_id(id: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn scoped(query: &TaskQuery) -> Select<Entity> {
    let mut select = Entity::find().filter(Column::UserId.eq(query.owner().as_uuid()));

    if let Some(title) = query.title_contains() {
        let pattern = format!("%{}%", escape_like(title));
        select = select.filter(Column::Title.like(LikeExpr::new(pattern).escape('\\')));
    }
    if let Some(status) = query.status() {
        select = select.filter(Column::Status.eq(status));
    }

    select
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn find(
        &self,
        query: &TaskQuery,
        window: PageWindow,
        order: SortOrder,
    ) -> StoreResult<Vec<Task>> {
        let models = scoped(query)
            .order_by(Column::CreatedAt, order.into())
            .order_by(Column::Id, order.into())
            .offset(window.offset)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, query: &TaskQuery) -> StoreResult<u64> {
        scoped(query).count(&self.db).await.map_err(store_error)
    }

    async fn find_one(&self, id: &str, owner: OwnerId) -> StoreResult<Option<Task>> {
        let id = parse_id(id)?;
        let model = Entity::find_by_id(id)
            .filter(Column::UserId.eq(owner.as_uuid()))
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(Into::into))
    }

    async fn insert(&self, task: Task) -> StoreResult<Task> {
        let model = entity::ActiveModel::from(&task)
            .insert(&self.db)
            .await
            .map_err(store_error)?;

        tracing::info!(task_id = %model.id, owner_id = %model.user_id, "Inserted task");
        Ok(model.into())
    }

    async fn save(&self, task: Task) -> StoreResult<Task> {
        let result = Entity::update_many()
            .set(entity::ActiveModel::from(&task))
            .filter(Column::Id.eq(task.id))
            .filter(Column::UserId.eq(task.owner_id.as_uuid()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::info!(task_id = %task.id, owner_id = %task.owner_id, "Updated task");
        Ok(task)
    }

    async fn remove(&self, task: &Task) -> StoreResult<()> {
        let result = Entity::delete_many()
            .filter(Column::Id.eq(task.id))
            .filter(Column::UserId.eq(task.owner_id.as_uuid()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        tracing::info!(task_id = %task.id, owner_id = %task.owner_id, "Deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateTask, TaskStatus};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, RuntimeErr};
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn exec_ok() -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }
    }

    fn sample_task() -> Task {
        Task::new(
            OwnerId::new(Uuid::now_v7()),
            CreateTask {
                title: "Pay rent".to_string(),
                description: String::new(),
                status: Some(TaskStatus::InProgress),
                expiration_date: Utc::now(),
            },
        )
    }

    fn query_err(message: &str) -> DbErr {
        DbErr::Query(RuntimeErr::Internal(message.to_string()))
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
    }

    #[test]
    fn test_store_error_translation() {
        assert!(matches!(
            store_error(query_err(
                "insert or update on table \"tasks\" violates foreign key constraint \"fk_tasks_user_id\""
            )),
            StoreError::ReferenceViolation(_)
        ));
        assert!(matches!(
            store_error(query_err("invalid input syntax for type uuid: \"x\"")),
            StoreError::MalformedId(_)
        ));
        assert!(matches!(
            store_error(DbErr::Custom("pool timed out".into())),
            StoreError::Other(_)
        ));
    }

    #[tokio::test]
    async fn test_find_one_rejects_malformed_id_before_querying() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo
            .find_one("42", OwnerId::new(Uuid::now_v7()))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::MalformedId("42".to_string()));
    }

    #[tokio::test]
    async fn test_find_one_maps_model() {
        let task = sample_task();
        let model = entity::Model {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            created_at: task.created_at.into(),
            expiration_date: task.expiration_date.into(),
            user_id: task.owner_id.as_uuid(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model]])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let found = repo
            .find_one(&task.id.to_string(), task.owner_id)
            .await
            .unwrap();
        assert_eq!(found, Some(task));
    }

    #[tokio::test]
    async fn test_insert_foreign_key_violation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([query_err(
                "insert or update on table \"tasks\" violates foreign key constraint \"fk_tasks_user_id\"",
            )])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let err = repo.insert(sample_task()).await.unwrap_err();
        assert!(matches!(err, StoreError::ReferenceViolation(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        assert_eq!(
            repo.remove(&sample_task()).await.unwrap_err(),
            StoreError::NotFound
        );
    }

    #[tokio::test]
    async fn test_save_reports_updated_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = PgTaskRepository::new(db);

        let task = sample_task();
        assert_eq!(repo.save(task.clone()).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_mutations_log_at_info() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(), exec_ok()])
            .into_connection();
        let repo = PgTaskRepository::new(db);
        let task = sample_task();

        repo.save(task.clone()).await.unwrap();
        repo.remove(&task).await.unwrap();

        let output = logs.text();
        let task_id = task.id.to_string();
        for message in ["Updated task", "Deleted task"] {
            let line = output
                .lines()
                .find(|line| line.contains(message))
                .unwrap_or_else(|| panic!("no log line for {message}: {output}"));
            assert!(line.contains("INFO"), "{line}");
            assert!(line.contains(&task_id), "{line}");
        }
    }
}
