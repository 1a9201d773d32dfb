use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter, sea_query::StringLen};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::identity::OwnerId;
use crate::pagination::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Task status. Any value may follow any other.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
    TS,
)]
#[ts(export)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "TO_DO")]
    ToDo,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "DONE")]
    Done,
}

/// Ordering by creation time. Ties break on id in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "ASC")]
    Asc,
    #[default]
    #[serde(alias = "DESC")]
    Desc,
}

impl From<SortOrder> for sea_orm::Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => sea_orm::Order::Asc,
            SortOrder::Desc => sea_orm::Order::Desc,
        }
    }
}

/// Stored task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub expiration_date: DateTime<Utc>,
}

impl Task {
    /// Server-assigned id and creation time; owner comes from the caller identity.
    ///
    /// Timestamps are kept at microsecond precision so they survive a
    /// round-trip through `timestamptz` unchanged.
    pub fn new(owner_id: OwnerId, input: CreateTask) -> Self {
        Self {
            id: Uuid::now_v7(),
            owner_id,
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            created_at: Utc::now().trunc_subsecs(6),
            expiration_date: input.expiration_date.trunc_subsecs(6),
        }
    }

    pub fn apply_replace(&mut self, input: ReplaceTask) {
        self.title = input.title;
        self.description = input.description;
        self.status = input.status;
        self.expiration_date = input.expiration_date.trunc_subsecs(6);
    }

    /// Merges only the fields present in `patch`.
    pub fn apply_patch(&mut self, patch: PatchTask) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(expiration_date) = patch.expiration_date {
            self.expiration_date = expiration_date.trunc_subsecs(6);
        }
    }
}

/// Postgres text columns cannot hold U+0000.
fn reject_nul(value: &str) -> Result<(), ValidationError> {
    if value.contains('\0') {
        return Err(ValidationError::new("nul_character")
            .with_message("must not contain NUL characters".into()));
    }
    Ok(())
}

/// Body for creating a task. Unknown fields, including any owner, are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 256), custom(function = "reject_nul"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 512), custom(function = "reject_nul"))]
    pub description: String,
    /// Defaults to `TO_DO`
    pub status: Option<TaskStatus>,
    #[ts(as = "String")]
    pub expiration_date: DateTime<Utc>,
}

/// Full replacement. Omitted description becomes empty, omitted status `TO_DO`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct ReplaceTask {
    #[validate(length(min = 1, max = 256), custom(function = "reject_nul"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 512), custom(function = "reject_nul"))]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[ts(as = "String")]
    pub expiration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema, TS)]
#[ts(export)]
pub struct PatchTask {
    #[validate(length(min = 1, max = 256), custom(function = "reject_nul"))]
    pub title: Option<String>,
    #[validate(length(max = 512), custom(function = "reject_nul"))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[ts(as = "Option<String>")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl PatchTask {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.expiration_date.is_none()
    }
}

/// Predicates ANDed onto the owner scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Case-sensitive substring
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            order: SortOrder::default(),
        }
    }
}

/// Query string of `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// 1-based page number, default 1
    pub page: Option<u64>,
    /// Page size, default 10, clamped to 50
    pub limit: Option<u64>,
    /// Creation-time order, default `desc`
    pub order: Option<SortOrder>,
    /// Case-sensitive title substring
    #[validate(length(max = 256), custom(function = "reject_nul"))]
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
}

impl ListTasksQuery {
    pub fn into_parts(self) -> (TaskFilter, PageRequest) {
        let defaults = PageRequest::default();
        let filter = TaskFilter {
            title: self.title.filter(|t| !t.is_empty()),
            status: self.status,
        };
        let page = PageRequest {
            page: self.page.unwrap_or(defaults.page),
            limit: self.limit.unwrap_or(defaults.limit),
            order: self.order.unwrap_or(defaults.order),
        };
        (filter, page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, TS)]
#[ts(export)]
pub struct TaskResponse {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub expiration_date: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            owner_id: task.owner_id.as_uuid(),
            title: task.title,
            description: task.description,
            status: task.status,
            created_at: task.created_at,
            expiration_date: task.expiration_date,
        }
    }
}
