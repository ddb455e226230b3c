//! # Extraction Primitives
//!
//! Building blocks shared by every extraction pipeline: the page-walking
//! listing fetcher and the bounded-size identifier partitioner.

pub mod pagination;
pub mod partition;

pub use pagination::fetch_all_invoices;
pub use partition::partition_ids;
