//! Accounting-document extraction jobs.

use crate::error::Result;
use crate::invoices::extract::{
    AccountingDocumentExtractor, CreditNoteAdapter, DocumentTypeAdapter, InvoiceAdapter,
};
use crate::invoices::model::AccountingDocument;
use crate::jobs::JobContext;
use chrono::{DateTime, Utc};
use tracing::info;

/// Scheduled extraction of one accounting-document flavour.
pub struct DocumentExtractJob<A: DocumentTypeAdapter> {
    extractor: AccountingDocumentExtractor<A>,
}

pub type InvoiceExtractJob = DocumentExtractJob<InvoiceAdapter>;
pub type CreditNoteExtractJob = DocumentExtractJob<CreditNoteAdapter>;

impl<A: DocumentTypeAdapter> DocumentExtractJob<A> {
    pub fn new(extractor: AccountingDocumentExtractor<A>) -> Self {
        Self { extractor }
    }

    /// Delta run: every matching document modified since `delta`, mapped to
    /// its destination token. A listing failure aborts the run.
    pub async fn run(
        &self,
        context: JobContext,
        delta: Option<DateTime<Utc>>,
    ) -> Result<Vec<AccountingDocument>> {
        info!(run_id = %context.run_id, ?delta, "Starting accounting document extraction");
        let documents = self.extractor.extract(delta).await?;
        info!(
            run_id = %context.run_id,
            documents = documents.len(),
            "Finished accounting document extraction"
        );
        Ok(documents)
    }

    /// On-demand run for specific document identifiers.
    pub async fn run_for_ids(
        &self,
        context: JobContext,
        ids: &[String],
    ) -> Result<Vec<AccountingDocument>> {
        info!(
            run_id = %context.run_id,
            requested = ids.len(),
            "Starting on-demand accounting document extraction"
        );
        let documents = self.extractor.extract_by_ids(ids).await?;
        info!(
            run_id = %context.run_id,
            documents = documents.len(),
            "Finished on-demand accounting document extraction"
        );
        Ok(documents)
    }
}
