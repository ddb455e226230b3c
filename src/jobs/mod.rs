//! # Scheduled Jobs
//!
//! Entry points the scheduler (or an operator endpoint) drives. Each job
//! wires the extraction and synchronization services together, stamps the
//! run with a correlation id, and reports a summary. Per-item failures are
//! isolated inside the services; a job only fails as a whole when its
//! initial listing cannot be fetched.

pub mod documents;
pub mod kyc;
pub mod sellers;

pub use documents::{CreditNoteExtractJob, DocumentExtractJob, InvoiceExtractJob};
pub use kyc::{KycSyncJob, KycSyncSummary};
pub use sellers::{SellerSyncJob, SellerSyncSummary};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Correlation data for one job run.
#[derive(Debug, Clone, Copy)]
pub struct JobContext {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
}

impl JobContext {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }
}

impl Default for JobContext {
    fn default() -> Self {
        Self::new()
    }
}
