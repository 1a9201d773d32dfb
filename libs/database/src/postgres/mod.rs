//! PostgreSQL connection management, migrations and error classification.

mod config;
mod connector;
mod errors;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect_from_config_with_retry, run_migrations};
pub use errors::{DbFailure, classify};
pub use health::check_health;

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
pub use sea_orm_migration::MigratorTrait;
