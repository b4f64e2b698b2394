//! Store error classification
//!
//! Every sqlx failure is sorted into a connection failure or a query failure
//! before it leaves this layer. Query failures carry the severity the server
//! reported, which the HTTP layer turns into 500 (fatal) or 400.

use sqlx::postgres::{PgDatabaseError, PgSeverity};

/// How bad a failed query was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Server reported FATAL or PANIC
    Fatal,
    /// Anything else on an open connection, including driver I/O errors
    Error,
}

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not check a connection out of the pool
    #[error("store connection failed: {message}")]
    Connection { message: String },

    /// A statement failed on an open connection
    #[error("store query failed: {message}")]
    Query { severity: Severity, message: String },

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl StoreError {
    /// Classify a failure to acquire a connection.
    pub fn connection(err: sqlx::Error) -> Self {
        Self::Connection {
            message: err.to_string(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Whether the HTTP layer should report this as a server-side failure.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Connection { .. } => true,
            Self::Query { severity, .. } => *severity == Severity::Fatal,
            Self::NotFound { .. } => false,
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                let severity = match db_err.try_downcast_ref::<PgDatabaseError>() {
                    Some(pg) if matches!(pg.severity(), PgSeverity::Fatal | PgSeverity::Panic) => {
                        Severity::Fatal
                    }
                    _ => Severity::Error,
                };
                Self::Query {
                    severity,
                    message: db_err.message().to_owned(),
                }
            }
            _ => Self::Query {
                severity: Severity::Error,
                message: err.to_string(),
            },
        }
    }
}
