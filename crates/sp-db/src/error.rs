//! Error types for sp-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002).
    ///
    /// Carries whichever error codes the backend could determine so callers
    /// can classify the failure.
    #[error("[D002] SQL execution failed: {message}")]
    ExecutionError {
        /// Driver message
        message: String,
        /// Portable SQLSTATE code
        sqlstate: Option<String>,
        /// Engine-specific numeric code
        native_code: Option<i64>,
    },

    /// Mutex poisoned (D003)
    #[error("[D003] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

impl DbError {
    /// Execution error without codes
    pub fn execution(message: impl Into<String>) -> Self {
        DbError::ExecutionError {
            message: message.into(),
            sqlstate: None,
            native_code: None,
        }
    }

    /// SQLSTATE of an execution error
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            DbError::ExecutionError { sqlstate, .. } => sqlstate.as_deref(),
            _ => None,
        }
    }

    /// Native code of an execution error
    pub fn native_code(&self) -> Option<i64> {
        match self {
            DbError::ExecutionError { native_code, .. } => *native_code,
            _ => None,
        }
    }

    /// Driver message without the error-code prefix
    pub fn message(&self) -> &str {
        match self {
            DbError::ConnectionError(m) | DbError::MutexPoisoned(m) => m,
            DbError::ExecutionError { message, .. } => message,
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

/// Derive a SQLSTATE from a DuckDB error message.
///
/// duckdb::Error does not expose structured codes, so the message text is
/// the only source. Patterns are kept narrow to avoid misclassifying
/// unrelated catalog errors.
pub(crate) fn duckdb_sqlstate(msg: &str) -> Option<&'static str> {
    let lower = msg.to_ascii_lowercase();
    if lower.contains("parser error") {
        Some("42601")
    } else if lower.contains("already exists") {
        if lower.contains("column with name") {
            Some("42701")
        } else {
            Some("42P07")
        }
    } else if lower.contains("duplicate key")
        || lower.contains("violates primary key")
        || lower.contains("violates unique")
    {
        Some("23505")
    } else if lower.contains("does not have a column")
        || (lower.contains("column") && lower.contains("not found"))
        || (lower.contains("column with name") && lower.contains("does not exist"))
    {
        Some("42703")
    } else if lower.contains("table with name") && lower.contains("does not exist") {
        Some("42P01")
    } else if lower.contains("index with name") && lower.contains("does not exist") {
        Some("42704")
    } else {
        None
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        let message = err.to_string();
        let sqlstate = duckdb_sqlstate(&message).map(str::to_string);
        DbError::ExecutionError {
            message,
            sqlstate,
            native_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duckdb_sqlstate_patterns() {
        assert_eq!(
            duckdb_sqlstate("Catalog Error: Column with name age already exists!"),
            Some("42701")
        );
        assert_eq!(
            duckdb_sqlstate("Catalog Error: Table with name users already exists!"),
            Some("42P07")
        );
        assert_eq!(
            duckdb_sqlstate("Catalog Error: Index with name ix_guid already exists!"),
            Some("42P07")
        );
        assert_eq!(
            duckdb_sqlstate(
                "Constraint Error: Duplicate key \"id: 1\" violates primary key constraint."
            ),
            Some("23505")
        );
        assert_eq!(
            duckdb_sqlstate(
                "Catalog Error: Table \"users\" does not have a column with name \"x\""
            ),
            Some("42703")
        );
        assert_eq!(
            duckdb_sqlstate("Catalog Error: Table with name nope does not exist!"),
            Some("42P01")
        );
        assert_eq!(
            duckdb_sqlstate("Catalog Error: Index with name ix_missing does not exist!"),
            Some("42704")
        );
        assert_eq!(
            duckdb_sqlstate("Catalog Error: Column with name zip does not exist!"),
            Some("42703")
        );
        assert_eq!(
            duckdb_sqlstate("Parser Error: syntax error at or near \"THIS\""),
            Some("42601")
        );
        assert_eq!(duckdb_sqlstate("Out of Memory Error"), None);
    }

    #[test]
    fn test_accessors() {
        let err = DbError::ExecutionError {
            message: "Duplicate column name 'age'".to_string(),
            sqlstate: Some("42S21".to_string()),
            native_code: Some(1060),
        };
        assert_eq!(err.sqlstate(), Some("42S21"));
        assert_eq!(err.native_code(), Some(1060));
        assert_eq!(err.message(), "Duplicate column name 'age'");
        assert!(err.to_string().starts_with("[D002]"));

        let conn = DbError::ConnectionError("refused".to_string());
        assert_eq!(conn.sqlstate(), None);
        assert_eq!(conn.native_code(), None);
    }
}
