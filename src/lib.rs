//! # Hyperwallet Mirakl Connector
//!
//! Batch connector between a Mirakl marketplace and the Hyperwallet payout
//! platform. Accounting documents (invoices and credit notes) are extracted
//! from the Mirakl operator API, mapped to Hyperwallet transfer-method
//! tokens through the sellers' shop custom fields, and sellers themselves
//! are kept in step on the Hyperwallet side (user, bank account, KYC
//! verification documents).
//!
//! ## Module Organization
//!
//! - [`clients`]: trait seams and reqwest implementations for the Mirakl
//!   and Hyperwallet APIs, plus in-memory fixtures
//! - [`extraction`]: pagination and id-partitioning primitives
//! - [`invoices`]: accounting-document model, extraction pipeline and
//!   shop-token reconciliation
//! - [`shops`]: batched shop lookup and destination-token resolution
//! - [`sellers`]: seller model, user synchronization and the bank-account
//!   strategy executor
//! - [`kyc`]: verification-document extraction and upload
//! - [`jobs`]: scheduled entry points wiring the services together
//! - [`config`], [`logging`], [`notifications`], [`resilience`]: ambient
//!   concerns shared by every pipeline

pub mod clients;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod invoices;
pub mod jobs;
pub mod kyc;
pub mod logging;
pub mod notifications;
pub mod resilience;
pub mod sellers;
pub mod shops;

pub use config::ConnectorConfig;
pub use error::{ConnectorError, Result};
pub use invoices::model::AccountingDocument;
pub use jobs::JobContext;
pub use sellers::model::SellerModel;
