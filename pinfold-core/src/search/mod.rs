use async_trait::async_trait;
use pinfold_model::BoundingBox;
use rand::Rng;
use tracing::debug;

use crate::error::Result;

mod flickr;

pub use flickr::FlickrSearchClient;

/// Pages beyond this return page 1's content upstream, so they are excluded
/// from the random draw.
pub const MAX_REACHABLE_PAGE: u32 = 40;

/// One raw result record from the search service. `url` is the
/// medium-resolution image location and may be absent from the upstream
/// payload; the materializer decides what a missing URL means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// One page of search results plus the service's declared total page count.
/// Transient: owned by the in-flight acquisition and discarded after
/// materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultPage {
    pub pages: u32,
    pub records: Vec<PhotoRecord>,
}

/// Port to the photo-search service.
///
/// With `page` omitted the service is queried for page 1 and the response
/// carries the total page count for the query; with `page` supplied that
/// specific page is returned.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(
        &self,
        bbox: &BoundingBox,
        limit: Option<u32>,
        page: Option<u32>,
    ) -> Result<SearchResultPage>;
}

/// Draws the page to fetch for a query that reported `total_pages`.
///
/// Returns `None` when the already-fetched page 1 should be used directly.
/// The drawn value is passed to the service as-is; see DESIGN.md for the
/// page-indexing decision.
pub fn random_page(total_pages: u32, rng: &mut impl Rng) -> Option<u32> {
    if total_pages <= 1 {
        return None;
    }
    let clamped = total_pages.min(MAX_REACHABLE_PAGE);
    Some(rng.random_range(0..clamped))
}

/// Runs the at-most-two-call search sequence: an unpaged query, then, when
/// the service reports more than one page, exactly one follow-up for a
/// randomly drawn page. Errors from either call propagate unchanged; there
/// is no fallback to the unpaged results.
pub async fn fetch_spread_page(
    client: &dyn SearchClient,
    bbox: &BoundingBox,
    limit: Option<u32>,
) -> Result<SearchResultPage> {
    let first = client.search(bbox, limit, None).await?;
    let drawn = random_page(first.pages, &mut rand::rng());
    match drawn {
        None => Ok(first),
        Some(page) => {
            debug!(total_pages = first.pages, page, "fetching random page");
            client.search(bbox, limit, Some(page)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn single_page_needs_no_follow_up() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_page(1, &mut rng), None);
        assert_eq!(random_page(0, &mut rng), None);
    }

    #[test]
    fn draw_is_bounded_by_the_reported_page_count() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let page = random_page(5, &mut rng).expect("draw");
            assert!(page < 5);
        }
    }

    #[test]
    fn draw_is_clamped_to_the_reachable_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let page = random_page(75, &mut rng).expect("draw");
            assert!(page < MAX_REACHABLE_PAGE);
        }
    }

    #[test]
    fn draw_eventually_covers_the_whole_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let page = random_page(3, &mut rng).expect("draw");
            seen[page as usize] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }
}
