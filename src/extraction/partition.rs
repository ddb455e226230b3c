//! # Batch Partitioner
//!
//! Splits large identifier sets into bounded-size sub-lists so batched
//! lookups stay under the upstream page-size ceiling
//! (`MIRAKL_MAX_RESULTS_PER_PAGE` for shop lookups).

/// Partition `ids` into groups of at most `limit` elements. Every input
/// element appears in exactly one group; `ceil(N / limit)` groups are
/// produced.
pub fn partition_ids<T: Clone>(ids: &[T], limit: usize) -> Vec<Vec<T>> {
    assert!(limit > 0, "partition limit must be positive");
    ids.chunks(limit).map(<[T]>::to_vec).collect()
}
