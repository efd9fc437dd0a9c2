//! Command structs for engine operations.
//!
//! Commands are the decoded form of a client request. Create commands carry
//! every field of the new entity; update commands carry only the fields the
//! client sent (`None` means "keep the stored value").

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::MoneyCents;

/// Create a category.
///
/// `kind` is the raw type name as received; the service decides whether it is
/// one of the known kinds.
#[derive(Clone, Debug)]
pub struct CreateCategoryCmd {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub kind: String,
}

impl CreateCategoryCmd {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            user_id: None,
            name: name.into(),
            kind: kind.into(),
        }
    }

    #[must_use]
    pub fn user_id(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Partially update a category. Only the name can change.
#[derive(Clone, Debug)]
pub struct UpdateCategoryCmd {
    pub category_id: Uuid,
    pub name: Option<String>,
    pub expected_version: Option<i32>,
}

impl UpdateCategoryCmd {
    #[must_use]
    pub fn new(category_id: Uuid) -> Self {
        Self {
            category_id,
            name: None,
            expected_version: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn expected_version(mut self, version: i32) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// Create an operation.
#[derive(Clone, Debug)]
pub struct CreateOperationCmd {
    pub category_id: Uuid,
    pub money_sum: MoneyCents,
    pub description: Option<String>,
    pub date_time: DateTime<Utc>,
}

impl CreateOperationCmd {
    #[must_use]
    pub fn new(category_id: Uuid, money_sum: MoneyCents, date_time: DateTime<Utc>) -> Self {
        Self {
            category_id,
            money_sum,
            description: None,
            date_time,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partially update an operation.
///
/// A present empty `description` clears it; a present zero `money_sum` sets
/// the amount to zero.
#[derive(Clone, Debug)]
pub struct UpdateOperationCmd {
    pub operation_id: Uuid,
    pub category_id: Option<Uuid>,
    pub money_sum: Option<MoneyCents>,
    pub description: Option<String>,
    pub expected_version: Option<i32>,
}

impl UpdateOperationCmd {
    #[must_use]
    pub fn new(operation_id: Uuid) -> Self {
        Self {
            operation_id,
            category_id: None,
            money_sum: None,
            description: None,
            expected_version: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn money_sum(mut self, money_sum: MoneyCents) -> Self {
        self.money_sum = Some(money_sum);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn expected_version(mut self, version: i32) -> Self {
        self.expected_version = Some(version);
        self
    }
}
