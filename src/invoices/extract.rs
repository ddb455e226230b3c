//! # Accounting-Document Extractor
//!
//! One extraction pipeline for both document flavours. The per-type
//! behaviour (which listing to query, how to convert a raw record) is a
//! small capability set supplied through [`DocumentTypeAdapter`], so adding
//! a document type means adding an adapter, not a subclass.
//!
//! `extract` runs the full pipeline (fetch, convert, resolve, reconcile);
//! `extract_by_ids` serves the on-demand path: it searches within the
//! configured maximum lookback window and keeps only the requested
//! identifiers, returning the converted documents without reconciliation.

use crate::clients::mirakl::{GetInvoicesRequest, MiraklClient, MiraklDocumentType, MiraklInvoice};
use crate::constants::MIRAKL_MAX_RESULTS_PER_PAGE;
use crate::error::Result;
use crate::extraction::fetch_all_invoices;
use crate::invoices::model::AccountingDocument;
use crate::invoices::reconcile::reconcile;
use crate::shops::ShopTokenResolver;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Per-document-type capabilities: the listing tag and the record converter.
pub trait DocumentTypeAdapter: Send + Sync {
    fn document_type(&self) -> MiraklDocumentType;

    fn convert(&self, invoice: &MiraklInvoice) -> AccountingDocument;
}

fn convert_raw(invoice: &MiraklInvoice, document_type: MiraklDocumentType) -> AccountingDocument {
    AccountingDocument {
        invoice_number: invoice.id.clone(),
        shop_id: invoice.shop_id.clone(),
        document_type,
        payment_status: invoice.payment_status,
        total_amount: invoice.total_charged_amount,
        currency: invoice.currency_iso_code.clone(),
        created_at: invoice.date_created,
        destination_token: None,
        hyperwallet_program: None,
    }
}

/// Adapter for seller invoices.
pub struct InvoiceAdapter;

impl DocumentTypeAdapter for InvoiceAdapter {
    fn document_type(&self) -> MiraklDocumentType {
        MiraklDocumentType::Invoice
    }

    fn convert(&self, invoice: &MiraklInvoice) -> AccountingDocument {
        convert_raw(invoice, MiraklDocumentType::Invoice)
    }
}

/// Adapter for credit notes.
pub struct CreditNoteAdapter;

impl DocumentTypeAdapter for CreditNoteAdapter {
    fn document_type(&self) -> MiraklDocumentType {
        MiraklDocumentType::CreditNote
    }

    fn convert(&self, invoice: &MiraklInvoice) -> AccountingDocument {
        convert_raw(invoice, MiraklDocumentType::CreditNote)
    }
}

/// Extraction pipeline for one accounting-document flavour.
pub struct AccountingDocumentExtractor<A: DocumentTypeAdapter> {
    mirakl: Arc<dyn MiraklClient>,
    resolver: ShopTokenResolver,
    adapter: A,
    id_search_max_lookback: Duration,
}

impl<A: DocumentTypeAdapter> AccountingDocumentExtractor<A> {
    pub fn new(
        mirakl: Arc<dyn MiraklClient>,
        resolver: ShopTokenResolver,
        adapter: A,
        id_search_max_lookback_minutes: i64,
    ) -> Self {
        Self {
            mirakl,
            resolver,
            adapter,
            id_search_max_lookback: Duration::minutes(id_search_max_lookback_minutes),
        }
    }

    /// Full extraction: every matching document modified since `delta`,
    /// reconciled against the resolved shop mapping. Documents whose shop
    /// cannot be mapped are dropped (and reported) by reconciliation.
    pub async fn extract(
        &self,
        delta: Option<DateTime<Utc>>,
    ) -> Result<Vec<AccountingDocument>> {
        let documents = self.fetch_documents(delta).await?;

        let shop_ids: HashSet<String> = documents
            .iter()
            .filter_map(|doc| doc.shop_id.clone())
            .collect();
        info!(
            document_type = self.adapter.document_type().as_str(),
            documents = documents.len(),
            shops = shop_ids.len(),
            "Extracted accounting documents, resolving shop tokens"
        );

        let mapping = self.resolver.resolve(&shop_ids).await;
        Ok(reconcile(documents, &mapping))
    }

    /// On-demand extraction of specific documents. The listing is searched
    /// within the configured maximum lookback window, which must be wide
    /// enough to contain the requested identifiers.
    pub async fn extract_by_ids(&self, ids: &[String]) -> Result<Vec<AccountingDocument>> {
        let window_start = Utc::now() - self.id_search_max_lookback;
        let request = GetInvoicesRequest::new(
            Some(window_start),
            self.adapter.document_type(),
            MIRAKL_MAX_RESULTS_PER_PAGE,
        );

        let wanted: HashSet<&String> = ids.iter().collect();
        let raw = fetch_all_invoices(self.mirakl.as_ref(), &request).await?;
        Ok(raw
            .iter()
            .filter(|invoice| wanted.contains(&invoice.id))
            .map(|invoice| self.adapter.convert(invoice))
            .collect())
    }

    async fn fetch_documents(
        &self,
        delta: Option<DateTime<Utc>>,
    ) -> Result<Vec<AccountingDocument>> {
        let request = GetInvoicesRequest::new(
            delta,
            self.adapter.document_type(),
            MIRAKL_MAX_RESULTS_PER_PAGE,
        );
        let raw = fetch_all_invoices(self.mirakl.as_ref(), &request).await?;
        Ok(raw.iter().map(|invoice| self.adapter.convert(invoice)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::fixture::FixtureMiraklClient;
    use crate::clients::mirakl::{
        AdditionalFieldValue, DocumentState, MiraklShop, PaymentStatus,
    };
    use crate::constants::custom_fields;
    use crate::notifications::RecordingNotifier;

    fn invoice(id: &str, shop_id: &str, document_type: MiraklDocumentType) -> MiraklInvoice {
        MiraklInvoice {
            id: id.to_string(),
            shop_id: Some(shop_id.to_string()),
            document_type,
            payment_status: PaymentStatus::Pending,
            state: DocumentState::Complete,
            total_charged_amount: 10.0,
            currency_iso_code: "EUR".to_string(),
            date_created: Utc::now() - Duration::minutes(5),
        }
    }

    fn mappable_shop(id: &str) -> MiraklShop {
        MiraklShop {
            id: id.to_string(),
            name: format!("shop-{id}"),
            email: format!("shop-{id}@example.com"),
            currency_iso_code: "EUR".to_string(),
            iso_country_code: "FR".to_string(),
            last_updated_date: None,
            bank_account: None,
            additional_field_values: vec![
                AdditionalFieldValue::new(
                    custom_fields::HYPERWALLET_BANK_ACCOUNT_TOKEN,
                    format!("trm-{id}"),
                ),
                AdditionalFieldValue::new(custom_fields::HYPERWALLET_PROGRAM, "DEFAULT"),
            ],
        }
    }

    fn extractor(
        mirakl: Arc<FixtureMiraklClient>,
    ) -> AccountingDocumentExtractor<InvoiceAdapter> {
        let notifier = Arc::new(RecordingNotifier::new());
        let resolver = ShopTokenResolver::new(mirakl.clone(), notifier);
        AccountingDocumentExtractor::new(mirakl, resolver, InvoiceAdapter, 15)
    }

    #[tokio::test]
    async fn extract_reconciles_documents_with_shop_tokens() {
        let mirakl = Arc::new(
            FixtureMiraklClient::new()
                .with_invoices(vec![
                    invoice("inv-1", "1", MiraklDocumentType::Invoice),
                    invoice("inv-2", "2", MiraklDocumentType::Invoice),
                ])
                .with_shops(vec![mappable_shop("1")]),
        );

        let documents = extractor(mirakl).extract(None).await.unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].invoice_number, "inv-1");
        assert_eq!(documents[0].destination_token.as_deref(), Some("trm-1"));
        assert_eq!(documents[0].hyperwallet_program.as_deref(), Some("DEFAULT"));
    }

    #[tokio::test]
    async fn extract_ignores_other_document_types() {
        let mirakl = Arc::new(
            FixtureMiraklClient::new()
                .with_invoices(vec![invoice("cn-1", "1", MiraklDocumentType::CreditNote)])
                .with_shops(vec![mappable_shop("1")]),
        );

        let documents = extractor(mirakl).extract(None).await.unwrap();

        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn extract_by_ids_filters_to_the_requested_documents() {
        let mirakl = Arc::new(FixtureMiraklClient::new().with_invoices(vec![
            invoice("inv-1", "1", MiraklDocumentType::Invoice),
            invoice("inv-2", "1", MiraklDocumentType::Invoice),
            invoice("inv-3", "1", MiraklDocumentType::Invoice),
        ]));

        let documents = extractor(mirakl)
            .extract_by_ids(&["inv-1".to_string(), "inv-3".to_string()])
            .await
            .unwrap();

        let mut numbers: Vec<&str> = documents
            .iter()
            .map(|doc| doc.invoice_number.as_str())
            .collect();
        numbers.sort();
        assert_eq!(numbers, vec!["inv-1", "inv-3"]);
        // The by-id path does not reconcile.
        assert!(documents.iter().all(|doc| doc.destination_token.is_none()));
    }

    #[tokio::test]
    async fn extract_by_ids_excludes_documents_outside_the_lookback_window() {
        let mut stale = invoice("inv-old", "1", MiraklDocumentType::Invoice);
        stale.date_created = Utc::now() - Duration::minutes(60);
        let mirakl = Arc::new(FixtureMiraklClient::new().with_invoices(vec![
            stale,
            invoice("inv-new", "1", MiraklDocumentType::Invoice),
        ]));

        let documents = extractor(mirakl)
            .extract_by_ids(&["inv-old".to_string(), "inv-new".to_string()])
            .await
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].invoice_number, "inv-new");
    }
}
