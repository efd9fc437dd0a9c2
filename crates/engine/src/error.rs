//! The module contains the errors the engine can return.
//!
//! Every storage failure is classified here into one of the engine's kinds,
//! so callers never see a raw driver error:
//!
//! - [`ExistingKey`] for uniqueness violations,
//! - [`DomainLogic`] for foreign key violations,
//! - [`KeyNotFound`] when a row is missing,
//! - [`Storage`] for everything else, with a sanitized message.
//!
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`DomainLogic`]: EngineError::DomainLogic
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Storage`]: EngineError::Storage
use sea_orm::{
    DbErr, RuntimeErr, SqlErr,
    sqlx::{self, error::ErrorKind},
};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    KeyNotFound(String),
    #[error("Already present: {0}")]
    ExistingKey(String),
    #[error("Domain logic error: {0}")]
    DomainLogic(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Prefix the message with the step that failed, keeping the kind.
    #[must_use]
    pub fn context(self, step: &str) -> Self {
        match self {
            Self::Validation(msg) => Self::Validation(format!("{step}: {msg}")),
            Self::KeyNotFound(msg) => Self::KeyNotFound(format!("{step}: {msg}")),
            Self::ExistingKey(msg) => Self::ExistingKey(format!("{step}: {msg}")),
            Self::DomainLogic(msg) => Self::DomainLogic(format!("{step}: {msg}")),
            Self::Conflict(msg) => Self::Conflict(format!("{step}: {msg}")),
            Self::Timeout(msg) => Self::Timeout(format!("{step}: {msg}")),
            Self::Storage(msg) => Self::Storage(format!("{step}: {msg}")),
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::KeyNotFound(msg)
            | Self::ExistingKey(msg)
            | Self::DomainLogic(msg)
            | Self::Conflict(msg)
            | Self::Timeout(msg)
            | Self::Storage(msg) => msg,
        }
    }

    /// Short machine readable name of the kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::ExistingKey(_) => "validation",
            Self::KeyNotFound(_) => "not_found",
            Self::DomainLogic(_) => "domain_logic",
            Self::Conflict(_) => "conflict",
            Self::Timeout(_) => "timeout",
            Self::Storage(_) => "internal",
        }
    }
}

/// Map a sea-orm error to an [`EngineError`].
///
/// `entity` names the table the statement touched and ends up in the
/// user-facing message; the raw driver error is only logged.
pub(crate) fn classify_db_error(err: DbErr, entity: &str) -> EngineError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        tracing::debug!("unique violation on {entity}: {detail}");
        return EngineError::ExistingKey(format!("{entity} name already exists"));
    }
    if is_foreign_key_violation(&err) {
        tracing::debug!("foreign key violation on {entity}: {err}");
        return EngineError::DomainLogic(format!(
            "{entity} references a missing row or is still referenced"
        ));
    }

    match err {
        DbErr::RecordNotFound(_) => EngineError::KeyNotFound(format!("{entity} not exists")),
        other => {
            tracing::error!("database error on {entity}: {other}");
            EngineError::Storage(format!("{entity} storage failure"))
        }
    }
}

/// `SqlErr` does not tag sqlite foreign key failures, so the driver error
/// kind is checked as well.
fn is_foreign_key_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = err.sql_err() {
        return true;
    }
    let (DbErr::Exec(runtime) | DbErr::Query(runtime) | DbErr::Conn(runtime)) = err else {
        return false;
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => {
            matches!(db_err.kind(), ErrorKind::ForeignKeyViolation)
                || db_err.message().contains("FOREIGN KEY constraint failed")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_keeps_kind() {
        let err = EngineError::KeyNotFound("category not exists".to_string())
            .context("failed to update category");
        assert_eq!(
            err,
            EngineError::KeyNotFound("failed to update category: category not exists".to_string())
        );
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn record_not_found_maps_to_key_not_found() {
        let err = classify_db_error(DbErr::RecordNotFound("x".to_string()), "operation");
        assert_eq!(err, EngineError::KeyNotFound("operation not exists".to_string()));
    }

    #[test]
    fn other_errors_are_sanitized() {
        let err = classify_db_error(
            DbErr::Custom("secret driver detail".to_string()),
            "category",
        );
        assert_eq!(err, EngineError::Storage("category storage failure".to_string()));
        assert!(!err.to_string().contains("secret"));
    }
}
