//! Categories: the classification every operation points to.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CreateCategoryCmd, EngineError, UpdateCategoryCmd};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            _ => Err(EngineError::Validation(
                "category type must be 'Income' or 'Expense'".to_string(),
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// Owner of the category; `None` for global categories.
    pub user_id: Option<Uuid>,
    pub name: String,
    /// Fixed at creation.
    pub kind: CategoryKind,
    /// Bumped by every successful write.
    pub version: i32,
}

impl Category {
    /// Build a not yet persisted category from a validated command and its
    /// parsed kind.
    ///
    /// The id stays nil until the repository inserts it.
    pub fn new(cmd: &CreateCategoryCmd, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::nil(),
            user_id: cmd.user_id,
            name: cmd.name.clone(),
            kind,
            version: 1,
        }
    }

    /// Apply the fields present in `cmd` over `existing`.
    ///
    /// `id`, `user_id`, `kind` and `version` always come from `existing`.
    pub fn merge(existing: &Category, cmd: &UpdateCategoryCmd) -> Category {
        Category {
            id: existing.id,
            user_id: existing.user_id,
            name: cmd.name.clone().unwrap_or_else(|| existing.name.clone()),
            kind: existing.kind,
            version: existing.version,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub name_norm: String,
    pub kind: String,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operations::Entity")]
    Operations,
}

impl Related<super::operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_category(category: &Category, name_norm: String) -> Self {
        Self {
            id: ActiveValue::Set(category.id),
            user_id: ActiveValue::Set(category.user_id),
            name: ActiveValue::Set(category.name.clone()),
            name_norm: ActiveValue::Set(name_norm),
            kind: ActiveValue::Set(category.kind.as_str().to_string()),
            version: ActiveValue::Set(category.version),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = CategoryKind::try_from(model.kind.as_str()).map_err(|_| {
            tracing::error!("category {} has unknown kind {:?}", model.id, model.kind);
            EngineError::Storage("category storage failure".to_string())
        })?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind,
            version: model.version,
        })
    }
}
