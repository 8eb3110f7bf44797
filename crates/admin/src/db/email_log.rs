//! Email audit log repository.
//!
//! Strictly append-and-read: there is no update or delete path, matching
//! the log's immutability guarantee.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use soundhaus_core::{EmailLogId, OrderId};

use super::RepositoryError;
use crate::models::email_log::EmailLogEntry;

/// Internal row type for `PostgreSQL` email log queries.
#[derive(Debug, sqlx::FromRow)]
struct EmailLogRow {
    id: i32,
    order_id: i32,
    recipient: String,
    subject: String,
    content: String,
    sent_at: DateTime<Utc>,
}

impl From<EmailLogRow> for EmailLogEntry {
    fn from(row: EmailLogRow) -> Self {
        Self {
            id: EmailLogId::new(row.id),
            order_id: OrderId::new(row.order_id),
            recipient: row.recipient,
            subject: row.subject,
            content: row.content,
            sent_at: row.sent_at,
        }
    }
}

/// Repository for the outbound email audit log.
pub struct EmailLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EmailLogRepository<'a> {
    /// Create a new email log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All log entries for an order, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<EmailLogEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, EmailLogRow>(
            r"
            SELECT id, order_id, recipient, subject, content, sent_at
            FROM shop.email_log
            WHERE order_id = $1
            ORDER BY sent_at DESC
            ",
        )
        .bind(order_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
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
    ) -> Result<EmailLogEntry, RepositoryError> {
        let row = sqlx::query_as::<_, EmailLogRow>(
            r"
            INSERT INTO shop.email_log (order_id, recipient, subject, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, recipient, subject, content, sent_at
            ",
        )
        .bind(order_id.as_i32())
        .bind(recipient)
        .bind(subject)
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }
}
