//! Postgres connectivity shared by the task service crates.
//!
//! - `postgres` (default): SeaORM connector, pool config, health probe and
//!   constraint-violation classification.
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`].
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "tasks_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};
