//! Custom-service quote draft.
//!
//! Working state for a customer's in-progress service request (turntable
//! setup, amp repair, install work) gathered across a multi-step form. The
//! draft has no identity of its own: it lives inside a single quoting
//! session, is mutated one field at a time, and only becomes real when
//! checkout turns it into an order's service line.
//!
//! No cross-field validation happens here - price and date formats are
//! checked at submission by the checkout flow.

use serde::{Deserialize, Serialize};

/// Service address for on-site work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Partial address update. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

/// A quote-in-progress.
///
/// All scalar fields start as empty strings and return to empty strings on
/// [`reset`](Self::reset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQuoteDraft {
    /// Customer-proposed price as typed, may be empty.
    pub custom_price: String,
    /// Free-text description of the requested work.
    pub notes: String,
    /// Preferred service date as typed.
    pub preferred_date: String,
    /// Preferred time window as typed.
    pub preferred_time: String,
    /// Service address.
    pub address: QuoteAddress,
}

impl ServiceQuoteDraft {
    /// A blank draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_custom_price(&mut self, price: impl Into<String>) {
        self.custom_price = price.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_preferred_date(&mut self, date: impl Into<String>) {
        self.preferred_date = date.into();
    }

    pub fn set_preferred_time(&mut self, time: impl Into<String>) {
        self.preferred_time = time.into();
    }

    /// Merge an address patch: supplied sub-fields replace, omitted
    /// sub-fields keep their previous values.
    pub fn set_address(&mut self, patch: AddressPatch) {
        if let Some(street) = patch.street {
            self.address.street = street;
        }
        if let Some(city) = patch.city {
            self.address.city = city;
        }
        if let Some(state) = patch.state {
            self.address.state = state;
        }
        if let Some(zip) = patch.zip {
            self.address.zip = zip;
        }
    }

    /// Restore the exact initial blank state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether every field is still at its initial blank value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_is_blank() {
        let draft = ServiceQuoteDraft::new();
        assert!(draft.is_blank());
        assert_eq!(draft.custom_price, "");
        assert_eq!(draft.address.street, "");
    }

    #[test]
    fn test_setters_touch_only_their_field() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_custom_price("150.00");
        draft.set_notes("Replace tonearm belt");

        assert_eq!(draft.custom_price, "150.00");
        assert_eq!(draft.notes, "Replace tonearm belt");
        assert_eq!(draft.preferred_date, "");
        assert_eq!(draft.preferred_time, "");
    }

    #[test]
    fn test_address_merges_rather_than_replaces() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_address(AddressPatch {
            street: Some("1 Main St".to_string()),
            ..AddressPatch::default()
        });
        draft.set_address(AddressPatch {
            city: Some("Metropolis".to_string()),
            ..AddressPatch::default()
        });

        assert_eq!(draft.address.street, "1 Main St");
        assert_eq!(draft.address.city, "Metropolis");
        assert_eq!(draft.address.state, "");
        assert_eq!(draft.address.zip, "");
    }

    #[test]
    fn test_reset_restores_blank_state() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_custom_price("99.99");
        draft.set_preferred_date("2026-09-01");
        draft.set_preferred_time("morning");
        draft.set_address(AddressPatch {
            street: Some("1 Main St".to_string()),
            city: Some("Metropolis".to_string()),
            state: Some("NY".to_string()),
            zip: Some("10001".to_string()),
        });

        draft.reset();

        assert!(draft.is_blank());
        assert_eq!(draft, ServiceQuoteDraft::new());
        assert_eq!(draft.address, QuoteAddress::default());
    }

    #[test]
    fn test_serde_camel_case_shape() {
        let mut draft = ServiceQuoteDraft::new();
        draft.set_custom_price("25.00");
        let json = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(json["customPrice"], "25.00");
        assert_eq!(json["preferredDate"], "");
        assert_eq!(json["address"]["street"], "");
    }
}
