//! Search orchestration: chunk computation, concurrent fan-out, ordered merge.
//!
//! The first page is a blocking prerequisite — it reports the total match
//! count that determines how many further pages exist. Remaining pages are
//! fetched concurrently and merged strictly in chunk order, so the final
//! sequence is deterministic regardless of which response arrives first.

use crate::config::CrawlerConfig;
use crate::error::CepError;
use crate::fetch::{PageFetch, PAGE_SIZE};
use crate::query::SearchQuery;
use crate::types::{AddressRecord, PageResult};
use futures::StreamExt;
use std::time::Instant;

/// Run a full search: fetch every results page and concatenate the records.
///
/// # Pipeline
///
/// 1. Fetch offset 0; its reported total is authoritative
/// 2. Compute page-aligned offsets for the remaining chunks
/// 3. Fan out the remaining fetches concurrently — unbounded by default,
///    capped by `config.max_concurrency` when set
/// 4. Clamp each chunk to [`PAGE_SIZE`] records and concatenate in
///    ascending chunk order (dispatch order, not completion order)
/// 5. Log total elapsed wall-clock time
///
/// # Errors
///
/// Propagates the first-page failure directly. Any remaining-chunk failure
/// fails the whole run (all-or-nothing, no partial results); outstanding
/// fetches are left to settle before the error for the lowest failing chunk
/// index is returned.
pub async fn run<F: PageFetch>(
    fetcher: &F,
    query: &SearchQuery,
    config: &CrawlerConfig,
) -> Result<Vec<AddressRecord>, CepError> {
    let started = Instant::now();

    // Blocking prerequisite: one fetch to learn the number of results.
    let first = fetcher.fetch(query, 0).await?;
    let total = first.total_count;

    let mut records = first.records;
    records.truncate(PAGE_SIZE as usize);

    let offsets = remaining_offsets(total);
    if !offsets.is_empty() {
        tracing::debug!(total, chunks = offsets.len() + 1, "fanning out remaining pages");

        for (i, outcome) in fetch_chunks(fetcher, query, config, &offsets)
            .await
            .into_iter()
            .enumerate()
        {
            let page = outcome?;
            let mut chunk = page.records;
            // Defensive clamp against a page returning more rows than asked.
            chunk.truncate(PAGE_SIZE as usize);
            tracing::debug!(
                chunk = i + 1,
                offset = page.offset,
                count = chunk.len(),
                "chunk merged"
            );
            records.extend(chunk);
        }
    }

    tracing::info!(
        total,
        count = records.len(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "search completed"
    );

    Ok(records)
}

/// Fetch every remaining chunk, preserving dispatch order in the output.
///
/// Both paths settle all futures before returning: `join_all` for the
/// default unbounded fan-out, `buffered` (which also yields in dispatch
/// order) when a concurrency cap is configured.
async fn fetch_chunks<F: PageFetch>(
    fetcher: &F,
    query: &SearchQuery,
    config: &CrawlerConfig,
    offsets: &[u64],
) -> Vec<Result<PageResult, CepError>> {
    let fetches = offsets.iter().map(|&offset| fetcher.fetch(query, offset));

    match config.max_concurrency {
        Some(cap) => futures::stream::iter(fetches).buffered(cap).collect().await,
        None => futures::future::join_all(fetches).await,
    }
}

/// Page-aligned offsets of every chunk after the first.
///
/// `total` records span `ceil(total / PAGE_SIZE)` chunks; chunk 0 is always
/// fetched up front, so this returns `PAGE_SIZE * i` for `i` in
/// `1..chunk_count`. Empty when the first page already covers everything.
pub(crate) fn remaining_offsets(total: u64) -> Vec<u64> {
    if total <= PAGE_SIZE {
        return Vec::new();
    }
    let chunk_count = total.div_ceil(PAGE_SIZE);
    (1..chunk_count).map(|i| i * PAGE_SIZE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_remaining_offsets_when_first_page_covers_total() {
        assert!(remaining_offsets(0).is_empty());
        assert!(remaining_offsets(1).is_empty());
        assert!(remaining_offsets(50).is_empty());
    }

    #[test]
    fn one_extra_chunk_just_past_page_size() {
        assert_eq!(remaining_offsets(51), vec![50]);
        assert_eq!(remaining_offsets(100), vec![50]);
    }

    #[test]
    fn total_120_yields_offsets_50_and_100() {
        assert_eq!(remaining_offsets(120), vec![50, 100]);
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_chunk() {
        assert_eq!(remaining_offsets(150), vec![50, 100]);
        assert_eq!(remaining_offsets(151), vec![50, 100, 150]);
    }

    #[test]
    fn offsets_are_page_aligned() {
        for offset in remaining_offsets(237) {
            assert_eq!(offset % PAGE_SIZE, 0);
        }
        assert_eq!(remaining_offsets(237).len(), 4);
    }
}
