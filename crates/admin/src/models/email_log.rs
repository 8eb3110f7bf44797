//! Email audit log domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use soundhaus_core::{EmailLogId, OrderId};

/// Number of characters shown in a log entry preview.
pub const PREVIEW_CHARS: usize = 200;

/// One outbound email tied to an order.
///
/// Entries are append-only: written when a notification is dispatched and
/// never updated or deleted afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct EmailLogEntry {
    /// Unique entry ID.
    pub id: EmailLogId,
    /// Order the email was about.
    pub order_id: OrderId,
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Full message body as sent.
    pub content: String,
    /// When the email was dispatched.
    pub sent_at: DateTime<Utc>,
}

impl EmailLogEntry {
    /// First [`PREVIEW_CHARS`] characters of the content.
    ///
    /// Counted in characters, not bytes, so multi-byte content never splits
    /// mid-character.
    #[must_use]
    pub fn preview(&self) -> String {
        self.content.chars().take(PREVIEW_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str) -> EmailLogEntry {
        EmailLogEntry {
            id: EmailLogId::new(1),
            order_id: OrderId::new(1),
            recipient: "buyer@example.com".to_string(),
            subject: "Your order".to_string(),
            content: content.to_string(),
            sent_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_content_previews_whole() {
        let e = entry("Thanks for your order!");
        assert_eq!(e.preview(), "Thanks for your order!");
    }

    #[test]
    fn test_long_content_truncates_to_200_chars() {
        let e = entry(&"x".repeat(500));
        assert_eq!(e.preview().chars().count(), PREVIEW_CHARS);
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let e = entry(&"ü".repeat(300));
        let preview = e.preview();
        assert_eq!(preview.chars().count(), PREVIEW_CHARS);
        assert!(preview.chars().all(|c| c == 'ü'));
    }
}
