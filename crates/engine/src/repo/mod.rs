//! Persistence contracts, one per entity.
//!
//! Repositories are the only place that issues queries. Each method is a
//! single statement run under a [`QueryContext`] deadline, and every storage
//! failure comes back already classified as an [`EngineError`].
//!
//! [`EngineError`]: crate::EngineError

use std::future::Future;

use uuid::Uuid;

use crate::{Category, Operation, QueryContext, ResultEngine};

mod categories;
mod operations;

pub use categories::SeaCategoryRepository;
pub use operations::SeaOperationRepository;

pub trait CategoryRepository: Send + Sync {
    /// Insert a new category and return its generated id.
    fn create(
        &self,
        ctx: &QueryContext,
        category: &Category,
    ) -> impl Future<Output = ResultEngine<Uuid>> + Send;

    fn find_all(&self, ctx: &QueryContext) -> impl Future<Output = ResultEngine<Vec<Category>>> + Send;

    fn find_by_uuid(
        &self,
        ctx: &QueryContext,
        id: Uuid,
    ) -> impl Future<Output = ResultEngine<Category>> + Send;

    /// Categories owned by `user_id`; empty when there are none.
    fn find_by_user_uuid(
        &self,
        ctx: &QueryContext,
        user_id: Uuid,
    ) -> impl Future<Output = ResultEngine<Vec<Category>>> + Send;

    /// Look a category up by name within an owner scope (`None` = global).
    fn find_by_name(
        &self,
        ctx: &QueryContext,
        user_id: Option<Uuid>,
        name: &str,
    ) -> impl Future<Output = ResultEngine<Category>> + Send;

    /// Write `category` if the stored row still has `expected_version`.
    fn update(
        &self,
        ctx: &QueryContext,
        category: &Category,
        expected_version: i32,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Number of operations booked against the category.
    fn count_operations(
        &self,
        ctx: &QueryContext,
        id: Uuid,
    ) -> impl Future<Output = ResultEngine<u64>> + Send;

    fn delete(&self, ctx: &QueryContext, id: Uuid) -> impl Future<Output = ResultEngine<()>> + Send;
}

pub trait OperationRepository: Send + Sync {
    /// Insert a new operation and return its generated id.
    fn create(
        &self,
        ctx: &QueryContext,
        operation: &Operation,
    ) -> impl Future<Output = ResultEngine<Uuid>> + Send;

    fn find_by_uuid(
        &self,
        ctx: &QueryContext,
        id: Uuid,
    ) -> impl Future<Output = ResultEngine<Operation>> + Send;

    /// Write `operation` if the stored row still has `expected_version`.
    fn update(
        &self,
        ctx: &QueryContext,
        operation: &Operation,
        expected_version: i32,
    ) -> impl Future<Output = ResultEngine<()>> + Send;

    fn delete(&self, ctx: &QueryContext, id: Uuid) -> impl Future<Output = ResultEngine<()>> + Send;
}
