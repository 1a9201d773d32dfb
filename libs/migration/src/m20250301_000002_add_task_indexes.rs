use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// Listing always filters by owner first; the trigram index serves the
// `title LIKE '%..%'` filter within one owner's rows.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS pg_trgm")
            .await?;
        db.execute_unprepared("CREATE EXTENSION IF NOT EXISTS btree_gin")
            .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_tasks_user_status ON tasks (user_id, status)",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_tasks_user_created_at ON tasks (user_id, created_at DESC, id DESC)",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_tasks_user_id_title_trgm ON tasks USING GIN (user_id, title gin_trgm_ops)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for index in [
            "idx_tasks_user_id_title_trgm",
            "idx_tasks_user_created_at",
            "idx_tasks_user_status",
        ] {
            db.execute_unprepared(&format!("DROP INDEX IF EXISTS {index}"))
                .await?;
        }

        Ok(())
    }
}
