use std::time::Duration;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, PaginatorTrait, QueryFilter, QueryOrder, prelude::*,
};
use uuid::Uuid;

use crate::{
    Category, EngineError, QueryContext, ResultEngine, categories, operations,
    error::classify_db_error,
    util::{normalize_category_display, normalize_category_key},
};

use super::CategoryRepository;

const ENTITY: &str = "category";

/// [`CategoryRepository`] over a sea-orm connection pool.
#[derive(Clone, Debug)]
pub struct SeaCategoryRepository {
    db: DatabaseConnection,
    query_timeout: Duration,
}

impl SeaCategoryRepository {
    pub fn new(db: DatabaseConnection, query_timeout: Duration) -> Self {
        Self { db, query_timeout }
    }
}

fn to_categories(models: Vec<categories::Model>) -> ResultEngine<Vec<Category>> {
    models.into_iter().map(Category::try_from).collect()
}

impl CategoryRepository for SeaCategoryRepository {
    async fn create(&self, ctx: &QueryContext, category: &Category) -> ResultEngine<Uuid> {
        let name_norm = normalize_category_key(&category.name)?;
        let stored = Category {
            id: Uuid::new_v4(),
            version: 1,
            ..category.clone()
        };
        let active = categories::ActiveModel::from_category(&stored, name_norm);

        tracing::debug!("inserting category {}", stored.id);
        ctx.run(self.query_timeout, "create category", async {
            active
                .insert(&self.db)
                .await
                .map_err(|err| classify_db_error(err, ENTITY))
        })
        .await?;

        Ok(stored.id)
    }

    async fn find_all(&self, ctx: &QueryContext) -> ResultEngine<Vec<Category>> {
        let models = ctx
            .run(self.query_timeout, "find categories", async {
                categories::Entity::find()
                    .order_by_asc(categories::Column::Name)
                    .all(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?;
        to_categories(models)
    }

    async fn find_by_uuid(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<Category> {
        let model = ctx
            .run(self.query_timeout, "find category", async {
                categories::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        Category::try_from(model)
    }

    async fn find_by_user_uuid(
        &self,
        ctx: &QueryContext,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Category>> {
        let models = ctx
            .run(self.query_timeout, "find categories by user", async {
                categories::Entity::find()
                    .filter(categories::Column::UserId.eq(user_id))
                    .order_by_asc(categories::Column::Name)
                    .all(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?;
        to_categories(models)
    }

    async fn find_by_name(
        &self,
        ctx: &QueryContext,
        user_id: Option<Uuid>,
        name: &str,
    ) -> ResultEngine<Category> {
        let display = normalize_category_display(name)?;
        let name_norm = normalize_category_key(&display)?;
        let owner = match user_id {
            Some(user_id) => categories::Column::UserId.eq(user_id),
            None => categories::Column::UserId.is_null(),
        };

        let model = ctx
            .run(self.query_timeout, "find category by name", async {
                categories::Entity::find()
                    .filter(owner)
                    .filter(categories::Column::NameNorm.eq(name_norm))
                    .one(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;
        Category::try_from(model)
    }

    async fn update(
        &self,
        ctx: &QueryContext,
        category: &Category,
        expected_version: i32,
    ) -> ResultEngine<()> {
        let name_norm = normalize_category_key(&category.name)?;

        tracing::debug!(
            "updating category {} at version {expected_version}",
            category.id
        );
        let result = ctx
            .run(self.query_timeout, "update category", async {
                categories::Entity::update_many()
                    .col_expr(categories::Column::Name, Expr::value(category.name.clone()))
                    .col_expr(categories::Column::NameNorm, Expr::value(name_norm))
                    .col_expr(
                        categories::Column::Version,
                        Expr::col(categories::Column::Version).add(1),
                    )
                    .filter(categories::Column::Id.eq(category.id))
                    .filter(categories::Column::Version.eq(expected_version))
                    .exec(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::Conflict(
                "category was modified or removed concurrently".to_string(),
            ));
        }
        Ok(())
    }

    async fn count_operations(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<u64> {
        ctx.run(self.query_timeout, "count category operations", async {
            operations::Entity::find()
                .filter(operations::Column::CategoryId.eq(id))
                .count(&self.db)
                .await
                .map_err(|err| classify_db_error(err, ENTITY))
        })
        .await
    }

    async fn delete(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<()> {
        let result = ctx
            .run(self.query_timeout, "delete category", async {
                categories::Entity::delete_by_id(id)
                    .exec(&self.db)
                    .await
                    .map_err(|err| classify_db_error(err, ENTITY))
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        Ok(())
    }
}
