//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use sp_core::DbFamily;

/// Database abstraction trait for sqlpatch
///
/// Implementations must be Send + Sync for async operation. Calls are
/// issued one at a time; a patch run never has two statements in flight.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute several `;`-separated statements in one call
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return the first column of the first row as text.
    ///
    /// Returns `None` when the query yields no rows or a NULL value.
    async fn query_optional_string(&self, sql: &str) -> DbResult<Option<String>>;

    /// Code space the backend reports errors in
    fn family(&self) -> DbFamily;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
