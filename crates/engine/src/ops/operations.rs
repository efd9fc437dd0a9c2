use uuid::Uuid;

use crate::{
    CreateOperationCmd, EngineError, Operation, QueryContext, ResultEngine, UpdateOperationCmd,
    repo::{CategoryRepository, OperationRepository},
};

use super::ensure_version;

/// Business rules for operations.
///
/// This is the one place where two repositories meet: every operation must
/// point to a category that exists when it is written.
#[derive(Clone, Debug)]
pub struct OperationService<O, C> {
    operations: O,
    categories: C,
}

impl<O: OperationRepository, C: CategoryRepository> OperationService<O, C> {
    pub fn new(operations: O, categories: C) -> Self {
        Self {
            operations,
            categories,
        }
    }

    /// Creates an operation and returns its id.
    ///
    /// The amount must be > 0 and the category must exist; otherwise nothing
    /// is written.
    pub async fn create(&self, ctx: &QueryContext, cmd: CreateOperationCmd) -> ResultEngine<Uuid> {
        let step = "failed to create operation";
        if !cmd.money_sum.is_positive() {
            return Err(EngineError::Validation(
                "money sum can not be negative or zero".to_string(),
            )
            .context(step));
        }

        self.categories
            .find_by_uuid(ctx, cmd.category_id)
            .await
            .map_err(|err| err.context("failed to find category by uuid"))?;

        let operation = Operation::new(&cmd);
        self.operations
            .create(ctx, &operation)
            .await
            .map_err(|err| err.context(step))
    }

    pub async fn get_by_uuid(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<Operation> {
        self.operations
            .find_by_uuid(ctx, id)
            .await
            .map_err(|err| err.context("failed to find operation by uuid"))
    }

    /// Partially updates an operation.
    ///
    /// The amount may become zero but not negative. A changed category is
    /// checked again before the write. An update that changes nothing is
    /// accepted without a write.
    pub async fn update(&self, ctx: &QueryContext, cmd: UpdateOperationCmd) -> ResultEngine<()> {
        let step = "failed to update operation";
        if cmd.money_sum.is_some_and(|sum| sum.is_negative()) {
            return Err(
                EngineError::Validation("money sum can not be negative".to_string()).context(step),
            );
        }

        let existing = self
            .operations
            .find_by_uuid(ctx, cmd.operation_id)
            .await
            .map_err(|err| err.context("failed to find operation by uuid"))?;
        ensure_version("operation", existing.version, cmd.expected_version)
            .map_err(|err| err.context(step))?;

        let updated = Operation::merge(&existing, &cmd);
        if updated == existing {
            tracing::debug!("operation {} unchanged, skipping write", existing.id);
            return Ok(());
        }

        if updated.category_id != existing.category_id {
            self.categories
                .find_by_uuid(ctx, updated.category_id)
                .await
                .map_err(|err| err.context("failed to find category by uuid"))?;
        }

        self.operations
            .update(ctx, &updated, existing.version)
            .await
            .map_err(|err| err.context(step))
    }

    pub async fn delete(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<()> {
        self.operations
            .find_by_uuid(ctx, id)
            .await
            .map_err(|err| err.context("failed to find operation by uuid"))?;

        self.operations
            .delete(ctx, id)
            .await
            .map_err(|err| err.context("failed to delete operation by uuid"))
    }
}
