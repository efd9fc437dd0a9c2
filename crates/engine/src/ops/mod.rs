use std::time::Duration;

use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine,
    context::DEFAULT_QUERY_TIMEOUT,
    repo::{SeaCategoryRepository, SeaOperationRepository},
};

mod categories;
mod operations;

pub use categories::CategoryService;
pub use operations::OperationService;

/// Services wired over the sea-orm repositories.
#[derive(Debug)]
pub struct Engine {
    categories: CategoryService<SeaCategoryRepository>,
    operations: OperationService<SeaOperationRepository, SeaCategoryRepository>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn categories(&self) -> &CategoryService<SeaCategoryRepository> {
        &self.categories
    }

    pub fn operations(&self) -> &OperationService<SeaOperationRepository, SeaCategoryRepository> {
        &self.operations
    }
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    query_timeout: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Upper bound of every single query (5 seconds if not set).
    pub fn query_timeout(mut self, timeout: Duration) -> EngineBuilder {
        self.query_timeout = timeout;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        if self.query_timeout.is_zero() {
            return Err(EngineError::Validation(
                "query timeout must be greater than zero".to_string(),
            ));
        }

        let categories = SeaCategoryRepository::new(self.database.clone(), self.query_timeout);
        let operations = SeaOperationRepository::new(self.database, self.query_timeout);

        Ok(Engine {
            categories: CategoryService::new(categories.clone()),
            operations: OperationService::new(operations, categories),
        })
    }
}

/// Reject a write when the client's version is not the stored one.
fn ensure_version(entity: &str, stored: i32, expected: Option<i32>) -> ResultEngine<()> {
    match expected {
        Some(expected) if expected != stored => {
            tracing::warn!("{entity} version {expected} is stale, current is {stored}");
            Err(EngineError::Conflict(format!(
                "{entity} version {expected} is stale, current is {stored}"
            )))
        }
        _ => Ok(()),
    }
}
