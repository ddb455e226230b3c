//! # Reconciliation & Filter
//!
//! Joins extracted accounting documents with the resolved shop mapping.
//! Documents whose shop is absent from the mapping are unmappable: they are
//! dropped from the output and reported once, as a single batch warning
//! listing their document numbers, not as one alert per record. Mappable
//! documents are rewritten with the destination token and program copied
//! from the mapping; all other fields are preserved.

use crate::invoices::model::AccountingDocument;
use crate::shops::ShopToken;
use std::collections::HashMap;
use tracing::warn;

/// Reconcile `documents` against the resolved shop mapping. Pure and
/// idempotent: same inputs, same output set.
pub fn reconcile(
    documents: Vec<AccountingDocument>,
    mapping: &HashMap<String, ShopToken>,
) -> Vec<AccountingDocument> {
    let (mappable, unmappable): (Vec<_>, Vec<_>) = documents.into_iter().partition(|doc| {
        doc.shop_id
            .as_ref()
            .map(|shop_id| mapping.contains_key(shop_id))
            .unwrap_or(false)
    });

    if !unmappable.is_empty() {
        let skipped: Vec<&str> = unmappable
            .iter()
            .map(|doc| doc.invoice_number.as_str())
            .collect();
        warn!(
            "Accounting documents with ids [{}] skipped because their shop lacks a program or bank account token",
            skipped.join(",")
        );
    }

    mappable
        .into_iter()
        .map(|doc| {
            // Membership was just checked; the shop id is present.
            let shop_id = doc.shop_id.as_ref().unwrap();
            let token = &mapping[shop_id];
            doc.with_destination(&token.destination_token, &token.program)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mirakl::{MiraklDocumentType, PaymentStatus};
    use chrono::Utc;

    fn document(invoice_number: &str, shop_id: Option<&str>) -> AccountingDocument {
        AccountingDocument {
            invoice_number: invoice_number.to_string(),
            shop_id: shop_id.map(str::to_string),
            document_type: MiraklDocumentType::Invoice,
            payment_status: PaymentStatus::Pending,
            total_amount: 99.0,
            currency: "EUR".to_string(),
            created_at: Utc::now(),
            destination_token: None,
            hyperwallet_program: None,
        }
    }

    fn mapping(entries: &[(&str, &str, &str)]) -> HashMap<String, ShopToken> {
        entries
            .iter()
            .map(|(shop_id, token, program)| {
                (
                    shop_id.to_string(),
                    ShopToken {
                        destination_token: token.to_string(),
                        program: program.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn unmappable_documents_are_dropped_and_mappable_rewritten() {
        let documents = vec![document("A", Some("1")), document("B", Some("2"))];
        let tokens = mapping(&[("1", "tokenX", "progY")]);

        let reconciled = reconcile(documents, &tokens);

        assert_eq!(reconciled.len(), 1);
        assert_eq!(reconciled[0].invoice_number, "A");
        assert_eq!(reconciled[0].destination_token.as_deref(), Some("tokenX"));
        assert_eq!(reconciled[0].hyperwallet_program.as_deref(), Some("progY"));
    }

    #[test]
    fn documents_without_a_shop_id_are_unmappable() {
        let documents = vec![document("A", None)];
        let tokens = mapping(&[("1", "tokenX", "progY")]);

        let reconciled = reconcile(documents, &tokens);

        assert!(reconciled.is_empty());
    }

    #[test]
    fn output_is_complete_and_duplicate_free_for_the_mappable_subset() {
        let documents = vec![
            document("A", Some("1")),
            document("B", Some("1")),
            document("C", Some("2")),
        ];
        let tokens = mapping(&[("1", "t1", "p1"), ("2", "t2", "p2")]);

        let reconciled = reconcile(documents, &tokens);

        let mut numbers: Vec<&str> = reconciled
            .iter()
            .map(|doc| doc.invoice_number.as_str())
            .collect();
        numbers.sort();
        assert_eq!(numbers, vec!["A", "B", "C"]);
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let documents = vec![document("A", Some("1")), document("B", Some("2"))];
        let tokens = mapping(&[("1", "tokenX", "progY")]);

        let first = reconcile(documents.clone(), &tokens);
        let second = reconcile(documents, &tokens);

        assert_eq!(first, second);
    }

    #[test]
    fn empty_mapping_drops_everything() {
        let documents = vec![document("A", Some("1"))];

        let reconciled = reconcile(documents, &HashMap::new());

        assert!(reconciled.is_empty());
    }
}
