use std::time::Duration;

use sea_orm::{ActiveModelTrait, DatabaseConnection, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Operation, QueryContext, ResultEngine, error::classify_db_error, operations,
};

use super::OperationRepository;

const ENTITY: &str = "operation";

/// [`OperationRepository`] over a sea-orm connection pool.
#[derive(Clone, Debug)]
pub struct SeaOperationRepository {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl SeaOperationRepository {
    pub fn new(db: DatabaseConnection, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }
}

impl OperationRepository for SeaOperationRepository {
    async fn create(&self, ctx: &QueryContext, operation: &Operation) -> ResultEngine<Uuid> {
        let stored = Operation {
            id: Uuid::new_v4(),
            version: 1,
            ..operation.clone()
        };
        let active = operations::ActiveModel::from(&stored);

        tracing::debug!(
            "inserting operation {} for category {}",
            stored.id,
            stored.category_id
        );
        ctx.run(self.query_timeout, "create operation", async {
            active
                .insert(&self.db)
                .await
                .map_err(|err| classify_db_error(err, ENTITY))
        })
        .await?;

        Ok(stored.id)
    }

    async fn find_by_uuid(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<Operation> {
        let model = ctx
            .run(self.query_timeout, "find operation", async {
                operations::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("operation not exists".to_string()))?;
        Ok(Operation::from(model))
    }

    async fn update(
        &self,
        ctx: &QueryContext,
        operation: &Operation,
        expected_version: i32,
    ) -> ResultEngine<()> {
        tracing::debug!(
            "updating operation {} at version {expected_version}",
            operation.id
        );
        let result = ctx
            .run(self.query_timeout, "update operation", async {
                operations::Entity::update_many()
                    .col_expr(
                        operations::Column::CategoryId,
                        Expr::value(operation.category_id),
                    )
                    .col_expr(
                        operations::Column::MoneySumMinor,
                        Expr::value(operation.money_sum.cents()),
                    )
                    .col_expr(
                        operations::Column::Description,
                        Expr::value(operation.description.clone()),
                    )
                    .col_expr(
                        operations::Column::Version,
                        Expr::col(operations::Column::Version).add(1),
                    )
                    .filter(operations::Column::Id.eq(operation.id))
                    .filter(operations::Column::Version.eq(expected_version))
                    .exec(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(
                "operation was modified or removed concurrently".to_string(),
            ));
        }
        Ok(())
    }

    async fn delete(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<()> {
        let result = ctx
            .run(self.query_timeout, "delete operation", async {
                operations::Entity::delete_by_id(id)
                    .exec(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("operation not exists".to_string()));
        }
        Ok(())
    }
}
