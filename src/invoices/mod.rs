//! # Accounting-Document Extraction
//!
//! Extraction pipeline for Mirakl accounting documents (invoices and credit
//! notes): paginated listing fetch, conversion to the internal model,
//! destination-token resolution and reconciliation. The invoice/credit-note
//! split is a small capability set ([`extract::DocumentTypeAdapter`])
//! injected into one shared extractor, not a class hierarchy.

pub mod extract;
pub mod model;
pub mod reconcile;

pub use extract::{
    AccountingDocumentExtractor, CreditNoteAdapter, DocumentTypeAdapter, InvoiceAdapter,
};
pub use model::AccountingDocument;
pub use reconcile::reconcile;
