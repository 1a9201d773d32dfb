//! Tasks Domain
//!
//! Owner-scoped task storage with page-window listing.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routes, AuthUser → OwnerId
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← ownership checks, pagination, error translation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← TaskRepository (Postgres, in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Task, DTOs, TaskStatus
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{OwnerId, PageRequest, PgTaskRepository, TaskFilter, TaskService};
//! use sea_orm::Database;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! let service = TaskService::new(PgTaskRepository::new(db));
//!
//! let owner = OwnerId::new(Uuid::now_v7());
//! let page = service
//!     .list_tasks(owner, TaskFilter::default(), PageRequest::default())
//!     .await?;
//! println!("{} of {} tasks", page.data.len(), page.meta.item_count);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TaskError, TaskResult};
pub use handlers::{TasksApiDoc, router};
pub use identity::OwnerId;
pub use memory::InMemoryTaskRepository;
pub use models::{
    CreateTask, ListTasksQuery, PageRequest, PatchTask, ReplaceTask, SortOrder, Task, TaskFilter,
    TaskResponse, TaskStatus,
};
pub use pagination::{Page, PageMeta};
pub use postgres::PgTaskRepository;
pub use repository::{StoreError, TaskQuery, TaskRepository};
pub use service::TaskService;
