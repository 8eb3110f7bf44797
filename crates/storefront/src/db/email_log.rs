//! Email audit log writes for the storefront.
//!
//! The storefront only ever appends (order confirmations); listing is the
//! admin panel's job.

use sqlx::PgPool;

use soundhaus_core::OrderId;

use super::RepositoryError;

/// Append-only email log repository.
pub struct EmailLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EmailLogRepository<'a> {
    /// Create a new email log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append an entry for an email that was just dispatched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        order_id: OrderId,
        recipient: &str,
        subject: &str,
        content: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO shop.email_log (order_id, recipient, subject, content)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(order_id.as_i32())
        .bind(recipient)
        .bind(subject)
        .bind(content)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
