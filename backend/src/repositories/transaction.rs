//! Transaction management utilities for repositories.

use sqlx::postgres::PgTransaction;
use sqlx::PgPool;

/// Begin a new database transaction.
///
/// Returns a transaction handle that can be used for multiple database
/// operations. On success the transaction is finished via
/// [`commit_transaction`], on failure via [`rollback_transaction`].
pub async fn begin_transaction(db: &PgPool) -> Result<PgTransaction<'_>, sqlx::Error> {
    db.begin().await
}

/// Commit a transaction, making all changes within it durable.
pub async fn commit_transaction(tx: PgTransaction<'_>) -> Result<(), sqlx::Error> {
    tx.commit().await
}

/// Rollback a transaction, undoing all changes made since it began.
pub async fn rollback_transaction(tx: PgTransaction<'_>) -> Result<(), sqlx::Error> {
    tx.rollback().await
}
