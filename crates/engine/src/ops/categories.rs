use uuid::Uuid;

use crate::{
    Category, CategoryKind, CreateCategoryCmd, EngineError, QueryContext, ResultEngine,
    UpdateCategoryCmd,
    repo::CategoryRepository, util::normalize_category_display,
};

use super::ensure_version;

/// Business rules for categories.
#[derive(Clone, Debug)]
pub struct CategoryService<R> {
    repository: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Creates a category and returns its id.
    ///
    /// The type must be `Income` or `Expense` and the name must contain at
    /// least one letter or digit. Names are unique per owner, ignoring case
    /// and accents.
    pub async fn create(
        &self,
        ctx: &QueryContext,
        mut cmd: CreateCategoryCmd,
    ) -> ResultEngine<Uuid> {
        let step = "failed to create category";
        let kind = CategoryKind::try_from(cmd.kind.as_str()).map_err(|err| err.context(step))?;
        cmd.name = normalize_category_display(&cmd.name).map_err(|err| err.context(step))?;

        let category = Category::new(&cmd, kind);
        self.repository
            .create(ctx, &category)
            .await
            .map_err(|err| err.context(step))
    }

    pub async fn get_all(&self, ctx: &QueryContext) -> ResultEngine<Vec<Category>> {
        self.repository
            .find_all(ctx)
            .await
            .map_err(|err| err.context("failed to get all categories"))
    }

    pub async fn get_by_uuid(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<Category> {
        self.repository
            .find_by_uuid(ctx, id)
            .await
            .map_err(|err| err.context("failed to get category by uuid"))
    }

    /// Categories owned by `user_id`. No categories is not an error.
    pub async fn get_by_user_uuid(
        &self,
        ctx: &QueryContext,
        user_id: Uuid,
    ) -> ResultEngine<Vec<Category>> {
        self.repository
            .find_by_user_uuid(ctx, user_id)
            .await
            .map_err(|err| err.context("failed to get categories by user uuid"))
    }

    pub async fn get_by_name(
        &self,
        ctx: &QueryContext,
        user_id: Option<Uuid>,
        name: &str,
    ) -> ResultEngine<Category> {
        self.repository
            .find_by_name(ctx, user_id, name)
            .await
            .map_err(|err| err.context("failed to get category by name"))
    }

    /// Renames a category. The type never changes.
    ///
    /// An update that changes nothing is accepted without a write.
    pub async fn update(&self, ctx: &QueryContext, mut cmd: UpdateCategoryCmd) -> ResultEngine<()> {
        let step = "failed to update category";
        if let Some(name) = cmd.name.as_deref() {
            let name = normalize_category_display(name).map_err(|err| err.context(step))?;
            cmd.name = Some(name);
        }

        let existing = self
            .repository
            .find_by_uuid(ctx, cmd.category_id)
            .await
            .map_err(|err| err.context("failed to find category by uuid"))?;
        ensure_version("category", existing.version, cmd.expected_version)
            .map_err(|err| err.context(step))?;

        let updated = Category::merge(&existing, &cmd);
        if updated == existing {
            tracing::debug!("category {} unchanged, skipping write", existing.id);
            return Ok(());
        }

        self.repository
            .update(ctx, &updated, existing.version)
            .await
            .map_err(|err| err.context(step))
    }

    /// Deletes a category. Fails while operations still reference it.
    pub async fn delete(&self, ctx: &QueryContext, id: Uuid) -> ResultEngine<()> {
        let step = "failed to delete category";
        self.repository
            .find_by_uuid(ctx, id)
            .await
            .map_err(|err| err.context("failed to find category by uuid"))?;

        let referenced = self
            .repository
            .count_operations(ctx, id)
            .await
            .map_err(|err| err.context(step))?;
        if referenced > 0 {
            tracing::warn!("category {id} is still used by {referenced} operations");
            return Err(EngineError::DomainLogic(format!(
                "category is still referenced by {referenced} operations"
            ))
            .context(step));
        }

        // A reference added after the count is caught by the foreign key.
        self.repository
            .delete(ctx, id)
            .await
            .map_err(|err| err.context(step))
    }
}
