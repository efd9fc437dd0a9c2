//! Domain core of the operation service.
//!
//! - entity model: [`Category`], [`Operation`] and their merge rules
//! - [`repo`]: per-entity persistence over sea-orm
//! - services: [`CategoryService`], [`OperationService`]
//! - [`Engine`]: the services wired over one database connection pool

pub use categories::{Category, CategoryKind};
pub use commands::{CreateCategoryCmd, CreateOperationCmd, UpdateCategoryCmd, UpdateOperationCmd};
pub use context::{DEFAULT_QUERY_TIMEOUT, QueryContext};
pub use error::EngineError;
pub use money::MoneyCents;
pub use operations::Operation;
pub use ops::{CategoryService, Engine, EngineBuilder, OperationService};

pub mod categories;
mod commands;
mod context;
mod error;
mod money;
pub mod operations;
mod ops;
pub mod repo;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
