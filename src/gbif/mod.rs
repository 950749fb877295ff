//! GBIF lookup boundary
//!
//! Two read-only calls: resolve a free-text name to a taxon, and search
//! occurrences of a taxon with region/geometry filters.

mod client;
mod rate_limit;
mod types;

pub use client::GbifClient;
pub use rate_limit::{RateLimiter, RetryPolicy};
pub use types::{NameMatch, OccurrencePage, OccurrenceQuery, OccurrenceRecord};

use crate::error::Result;
use species_map_common::OccurrencePoint;
use std::future::Future;
use tracing::warn;

/// GBIF's maximum page size for occurrence search
pub const MAX_PAGE_SIZE: u32 = 300;

/// Remote taxonomy/occurrence database
pub trait SpeciesLookup: Send + Sync {
    /// Resolve a scientific name
    fn match_name(&self, name: &str) -> impl Future<Output = Result<NameMatch>> + Send;

    /// One page of occurrence search results
    fn search_occurrences(
        &self,
        query: &OccurrenceQuery,
    ) -> impl Future<Output = Result<OccurrencePage>> + Send;
}

/// Page through occurrences until `cap` records or the total is reached.
///
/// Records without both coordinates are skipped. A failing page stops the
/// paging; what was collected so far is returned.
pub async fn fetch_occurrences<L: SpeciesLookup>(
    lookup: &L,
    species: &str,
    query: &OccurrenceQuery,
    cap: u32,
) -> Vec<OccurrencePoint> {
    let mut points = Vec::new();
    let mut offset = 0u32;

    while offset < cap {
        let page_query = OccurrenceQuery {
            limit: (cap - offset).min(MAX_PAGE_SIZE),
            offset,
            ..query.clone()
        };

        let page = match lookup.search_occurrences(&page_query).await {
            Ok(page) => page,
            Err(e) => {
                warn!(species, offset, error = %e, "occurrence search failed");
                break;
            }
        };

        if page.results.is_empty() {
            break;
        }

        offset = offset.saturating_add(page.results.len() as u32);
        points.extend(page.results.iter().filter_map(|r| r.to_point(species)));

        if page.end_of_records || u64::from(offset) >= page.count {
            break;
        }
    }

    points
}
