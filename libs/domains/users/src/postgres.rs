use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::postgres::{DbFailure, classify};
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository using raw statements
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

fn internal(err: DbErr) -> UserError {
    UserError::Internal(format!("Database error: {err}"))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let sql = r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, created_at
        "#;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                user.id.into(),
                user.username.clone().into(),
                user.password_hash.clone().into(),
                user.created_at.into(),
            ],
        );

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| match classify(&e) {
                DbFailure::UniqueViolation(_) => UserError::UsernameTaken(user.username.clone()),
                _ => internal(e),
            })?
            .ok_or_else(|| UserError::Internal("Insert returned no row".to_string()))?;

        tracing::info!(user_id = %row.id, "Created user");
        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let sql = "SELECT id, username, password_hash, created_at FROM users WHERE id = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()]);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(row.map(User::from))
    }

    async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let sql = "SELECT id, username, password_hash, created_at FROM users WHERE username = $1";
        let stmt = Statement::from_sql_and_values(DbBackend::Postgres, sql, [username.into()]);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(internal)?;

        Ok(row.map(User::from))
    }
}
