use crate::identity::OwnerId;
use crate::models::{Task, TaskStatus};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

/// Sea-ORM entity for the `tasks` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTimeWithTimeZone,
    pub expiration_date: DateTimeWithTimeZone,
    pub user_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Task {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: OwnerId::new(model.user_id),
            title: model.title,
            description: model.description,
            status: model.status,
            created_at: model.created_at.into(),
            expiration_date: model.expiration_date.into(),
        }
    }
}

impl From<&Task> for ActiveModel {
    fn from(task: &Task) -> Self {
        ActiveModel {
            id: Set(task.id),
            title: Set(task.title.clone()),
            description: Set(task.description.clone()),
            status: Set(task.status),
            created_at: Set(task.created_at.into()),
            expiration_date: Set(task.expiration_date.into()),
            user_id: Set(task.owner_id.as_uuid()),
        }
    }
}
