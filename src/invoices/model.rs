//! Internal accounting-document model.

use crate::clients::mirakl::{MiraklDocumentType, PaymentStatus};
use chrono::{DateTime, Utc};

/// An invoice or credit note flowing through the pipeline.
///
/// Immutable value: reconciliation produces a new record through
/// [`AccountingDocument::with_destination`], it never mutates in place. The
/// destination token and program stay empty until reconciliation fills them
/// in from the shop mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountingDocument {
    pub invoice_number: String,
    /// Owning shop; platform-level documents have none and can never be
    /// mapped.
    pub shop_id: Option<String>,
    pub document_type: MiraklDocumentType,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub destination_token: Option<String>,
    pub hyperwallet_program: Option<String>,
}

impl AccountingDocument {
    /// Copy of this document with the routing pair filled in; every other
    /// field is preserved unchanged.
    pub fn with_destination(&self, destination_token: &str, program: &str) -> Self {
        Self {
            destination_token: Some(destination_token.to_string()),
            hyperwallet_program: Some(program.to_string()),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> AccountingDocument {
        AccountingDocument {
            invoice_number: "inv-1".to_string(),
            shop_id: Some("2000".to_string()),
            document_type: MiraklDocumentType::Invoice,
            payment_status: PaymentStatus::Pending,
            total_amount: 125.5,
            currency: "EUR".to_string(),
            created_at: Utc::now(),
            destination_token: None,
            hyperwallet_program: None,
        }
    }

    #[test]
    fn with_destination_preserves_all_other_fields() {
        let original = document();

        let mapped = original.with_destination("trm-1", "DEFAULT");

        assert_eq!(mapped.destination_token.as_deref(), Some("trm-1"));
        assert_eq!(mapped.hyperwallet_program.as_deref(), Some("DEFAULT"));
        assert_eq!(mapped.invoice_number, original.invoice_number);
        assert_eq!(mapped.shop_id, original.shop_id);
        assert_eq!(mapped.total_amount, original.total_amount);
        assert_eq!(mapped.created_at, original.created_at);
        // The original is untouched.
        assert!(original.destination_token.is_none());
    }
}
