//! Session-stored types for the storefront.

/// Session keys for storefront data.
pub mod session_keys {
    /// Key for the in-progress custom-service quote draft.
    pub const QUOTE_DRAFT: &str = "quote_draft";
}
