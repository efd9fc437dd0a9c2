//! Operations: a single income or expense booked against a category.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CreateOperationCmd, MoneyCents, UpdateOperationCmd, util::normalize_optional_text,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Uuid,
    pub category_id: Uuid,
    pub money_sum: MoneyCents,
    pub description: Option<String>,
    /// Set once at creation.
    pub date_time: DateTime<Utc>,
    pub version: i32,
}

impl Operation {
    /// Build a not yet persisted operation from a validated command.
    pub fn new(cmd: &CreateOperationCmd) -> Self {
        Self {
            id: Uuid::nil(),
            category_id: cmd.category_id,
            money_sum: cmd.money_sum,
            description: normalize_optional_text(cmd.description.as_deref()),
            date_time: cmd.date_time,
            version: 1,
        }
    }

    /// Apply the fields present in `cmd` over `existing`.
    ///
    /// `id`, `date_time` and `version` always come from `existing`.
    pub fn merge(existing: &Operation, cmd: &UpdateOperationCmd) -> Operation {
        let description = match cmd.description.as_deref() {
            None => existing.description.clone(),
            Some(value) => normalize_optional_text(Some(value)),
        };
        Operation {
            id: existing.id,
            category_id: cmd.category_id.unwrap_or(existing.category_id),
            money_sum: cmd.money_sum.unwrap_or(existing.money_sum),
            description,
            date_time: existing.date_time,
            version: existing.version,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub money_sum_minor: i64,
    pub description: Option<String>,
    pub date_time: DateTimeUtc,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Operation> for ActiveModel {
    fn from(operation: &Operation) -> Self {
        Self {
            id: ActiveValue::Set(operation.id),
            category_id: ActiveValue::Set(operation.category_id),
            money_sum_minor: ActiveValue::Set(operation.money_sum.cents()),
            description: ActiveValue::Set(operation.description.clone()),
            date_time: ActiveValue::Set(operation.date_time),
            version: ActiveValue::Set(operation.version),
        }
    }
}

impl From<Model> for Operation {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            money_sum: MoneyCents::new(model.money_sum_minor),
            description: model.description,
            date_time: model.date_time,
            version: model.version,
        }
    }
}
