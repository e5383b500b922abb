use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AssetSource;

/// Progress of the multi-page fetch for one episode.
/// Reset whenever a new source is chosen; otherwise mutated only by the
/// pagination engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    /// None when no episode is active
    pub source: Option<AssetSource>,

    /// Identifies the episode that issued the in-flight requests
    pub episode: Uuid,

    /// Last page folded in (0 before the first response)
    pub current_page: u32,

    pub total_assets: u64,

    pub loaded_assets: u64,

    pub has_more_pages: bool,

    pub is_loading_more: bool,

    /// Safety cap on the number of assets fetched per episode
    pub max_assets_to_fetch: u64,

    pub page_size: u32,
}

impl PaginationState {
    /// An idle state with no source
    pub fn idle(page_size: u32, max_assets_to_fetch: u64) -> Self {
        Self {
            source: None,
            episode: Uuid::nil(),
            current_page: 0,
            total_assets: 0,
            loaded_assets: 0,
            has_more_pages: false,
            is_loading_more: false,
            max_assets_to_fetch,
            page_size,
        }
    }

    /// Fresh state for a new episode over `source`
    pub fn for_source(source: AssetSource, page_size: u32, max_assets_to_fetch: u64) -> Self {
        Self {
            source: Some(source),
            episode: Uuid::new_v4(),
            ..Self::idle(page_size, max_assets_to_fetch)
        }
    }

    /// Pagination stopped at the safety cap while the server has more
    pub fn is_partial(&self) -> bool {
        !self.has_more_pages
            && self.loaded_assets >= self.max_assets_to_fetch
            && self.total_assets > self.loaded_assets
    }

    /// The page a response is expected for
    pub fn expected_page(&self) -> u32 {
        self.current_page + 1
    }
}
