//! # KYC Document Pipeline
//!
//! Moves seller verification documents from Mirakl to Hyperwallet: shops
//! flagged as requiring KYC since the last run are extracted and converted
//! to document models, and their documents are pushed with the same retry
//! and alerting discipline as the other pipelines. A successful push resets
//! the shop's KYC-required flag on the marketplace side.

pub mod extract;
pub mod model;
pub mod upload;

pub use extract::KycDocumentsExtractor;
pub use model::{kyc_document_from_shop, KycDocumentInfo, ProofOfBusiness, ProofOfIdentity};
pub use upload::KycDocumentUploadService;
